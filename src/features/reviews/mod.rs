//! Append-only customer reviews per vendor.
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | GET | `/api/vendors/{id}/reviews` | public |
//! | POST | `/api/vendors/{id}/reviews` | public, stored unverified |
//! | POST | `/api/vendors/{id}/reviews/verified` | bearer, stored phone-verified |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReviewService;
