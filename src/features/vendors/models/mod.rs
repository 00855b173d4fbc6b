pub mod vendor;

pub use vendor::{PaymentMethod, PaymentOptions, ServiceMap, Vendor};
