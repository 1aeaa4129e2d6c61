//! Actor roles and the authenticated actor context.
//!
//! Role ids must match the seed data in `20260301000001_create_lookup_tables.sql`.

use serde::Serialize;

use crate::lookup::define_lookup_enum;
use crate::types::DbId;

define_lookup_enum! {
    /// The two mutually exclusive actor roles.
    Role (field = "role") {
        /// Submits and owns projects, reports, issues and events.
        Vendor = 1 => "VENDOR",
        /// Oversight staff: approves, denies and administers users.
        Ets = 2 => "ETS",
    }
}

/// An authenticated actor, resolved by the identity provider and passed
/// explicitly into every engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: DbId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_ets(&self) -> bool {
        self.role == Role::Ets
    }

    pub fn is_vendor(&self) -> bool {
        self.role == Role::Vendor
    }
}
