//! Vendor directory records.
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | GET | `/api/vendors` | public |
//! | GET | `/api/vendors/featured` | public |
//! | GET | `/api/vendors/{id}` | public |
//! | GET | `/api/catalog/services` | public |
//! | POST | `/api/vendors` | bearer |
//! | PUT | `/api/vendors/{id}` | owner or admin |
//! | PUT | `/api/vendors/{id}/services/{category}/{service_id}` | owner or admin |
//! | POST | `/api/vendors/{id}/images` | owner or admin |
//! | DELETE | `/api/vendors/{id}/images` | owner or admin |

pub mod catalog;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod social;
pub mod tags;

pub use services::VendorService;
