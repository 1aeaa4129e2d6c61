//! Request extractors.
//!
//! - [`auth::AuthUser`] -- resolves the bearer token to the acting user.

pub mod auth;
