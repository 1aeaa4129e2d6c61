//! The project workflow engine.
//!
//! [`ProjectWorkflowEngine`] is the single authority for deciding whether an
//! [`Actor`](ivv_core::roles::Actor) may mutate a project, report, issue,
//! event, comment or user, and for advancing project and report review
//! status together with the audit comment each transition leaves behind.
//!
//! Persistence sits behind the [`WorkflowStore`] trait:
//! - [`PgStore`] runs against Postgres through the `ivv-db` repositories.
//! - [`MemoryStore`] keeps everything in process (tests and local demos).

pub mod credentials;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod store;

pub use engine::reports::ReportPage;
pub use engine::users::CreatedUser;
pub use engine::{EngineConfig, ProjectDetail, ProjectWorkflowEngine};
pub use error::{StoreError, WorkflowError, WorkflowResult};
pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::WorkflowStore;
