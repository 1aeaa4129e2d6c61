use ivv_core::error::CoreError;

/// Failure reported by a [`WorkflowStore`](crate::WorkflowStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match ivv_db::unique_violation(&err).map(str::to_owned) {
            Some(constraint) => StoreError::UniqueViolation { constraint },
            None => StoreError::Database(err),
        }
    }
}

impl StoreError {
    /// Whether this is a unique violation on the named constraint.
    pub fn violates(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

/// Error returned by every engine operation.
///
/// Domain rejections surface as [`WorkflowError::Core`]; anything the store
/// could not do surfaces as [`WorkflowError::Store`].
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorkflowError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            WorkflowError::Core(err) => Some(err),
            WorkflowError::Store(_) => None,
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
