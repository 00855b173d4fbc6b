pub mod vendor_dto;

pub use vendor_dto::*;
