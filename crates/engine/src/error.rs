use fintrack_core::error::CoreError;

use crate::metrics::MetricsError;

/// Error type for engine operations.
///
/// Wraps [`CoreError`] for domain validation and adds the persistence
/// and metrics-provider failure paths.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `fintrack_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The metrics provider failed. Recoverable: the trigger left no
    /// state behind and is expected to be retried.
    #[error("Metrics provider error: {0}")]
    Metrics(String),
}

impl From<MetricsError> for EngineError {
    fn from(err: MetricsError) -> Self {
        EngineError::Metrics(err.0)
    }
}

/// Convenience type alias for engine return values.
pub type EngineResult<T> = Result<T, EngineError>;
