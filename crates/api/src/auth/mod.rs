//! Bearer-token identity.
//!
//! - [`jwt`] -- access-token generation and validation.

pub mod jwt;
