/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Currency amounts are stored as whole cents.
pub type Cents = i64;

/// Owner id that records are reassigned to when their author is deleted.
///
/// Must match the "Deleted User" row seeded in `20260301000002_create_users.sql`.
pub const SENTINEL_USER_ID: DbId = 0;
