pub mod discovery_handler;

pub use discovery_handler::*;
