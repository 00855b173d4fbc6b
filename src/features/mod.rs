pub mod auth;
pub mod discovery;
pub mod profiles;
pub mod reviews;
pub mod vendors;
