//! Domain rules of the IV&V report center.
//!
//! Pure logic only: identifiers, the error taxonomy, roles and the actor
//! context, authorization primitives, the review-status lifecycle, closed
//! enums with their total string mappings, and field validation. No I/O.

pub mod lookup;

pub mod authz;
pub mod error;
pub mod issue;
pub mod period;
pub mod review;
pub mod roles;
pub mod types;
pub mod validation;
