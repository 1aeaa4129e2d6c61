//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-statement operations
//! (status transitions, cascades, reassignment) run in a transaction that
//! rolls back when dropped before commit.

pub mod comment_repo;
pub mod event_repo;
pub mod issue_repo;
pub mod project_repo;
pub mod report_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use event_repo::EventRepo;
pub use issue_repo::IssueRepo;
pub use project_repo::ProjectRepo;
pub use report_repo::ReportRepo;
pub use user_repo::UserRepo;
