//! Vendor discovery: filtering, geocoding and the list/map view.
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | GET | `/api/discovery/search` | public |
//! | GET | `/api/discovery/geocode` | public |
//! | GET | `/api/discovery/geocode-cache` | admin |
//! | DELETE | `/api/discovery/geocode-cache` | admin |

pub mod address;
pub mod distance;
pub mod dtos;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;

pub use services::{DiscoveryService, GeocodingService};
