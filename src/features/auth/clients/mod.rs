pub mod phone_auth_client;
#[cfg(test)]
pub mod testing;

pub use phone_auth_client::{PhoneAuthClient, PhoneAuthProvider, PhoneSignIn};
