pub mod catalog_handler;
pub mod vendor_handler;

pub use catalog_handler::*;
pub use vendor_handler::*;
