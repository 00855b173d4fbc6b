pub mod discovery_dto;

pub use discovery_dto::*;
