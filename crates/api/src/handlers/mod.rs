//! HTTP handlers, one module per resource.
//!
//! Every handler resolves the caller through [`AuthUser`](crate::middleware::auth::AuthUser),
//! makes exactly one engine call and wraps the result in a
//! [`DataResponse`](crate::response::DataResponse).

pub mod admin;
pub mod auth;
pub mod comments;
pub mod events;
pub mod issues;
pub mod projects;
pub mod reports;
