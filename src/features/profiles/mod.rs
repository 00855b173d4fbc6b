//! User profiles keyed by the auth provider uid.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/profiles/me` | Current user's profile |
//! | PATCH | `/api/profiles/me` | Update email and username |
//! | GET | `/api/profiles/username-availability` | Check whether a username is free |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ProfileService, ProfileStore};
