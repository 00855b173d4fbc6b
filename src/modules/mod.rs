//! Infrastructure clients for external services.

pub mod storage;
