pub mod clients;
pub mod dtos;
pub mod guards;
pub mod handlers;
mod jwks;
pub mod model;
pub mod routes;
pub mod services;
mod validator;

pub use clients::PhoneAuthClient;
pub use jwks::JwksClient;
pub use services::AuthService;
pub use validator::JwtValidator;
