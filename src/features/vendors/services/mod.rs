pub mod vendor_service;

pub use vendor_service::VendorService;
