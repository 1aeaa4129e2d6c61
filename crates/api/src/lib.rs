//! IV&V report center HTTP API.
//!
//! A thin JSON surface over [`ivv_workflow::ProjectWorkflowEngine`]:
//! handlers authenticate the caller, call one engine operation and map the
//! result. No policy lives here.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
