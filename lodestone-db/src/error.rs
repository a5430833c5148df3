//! Error types for lodestone-db

use crate::models::ValidationError;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Acquisition or stop attempted on a manager that is not started
    #[error("connection manager is not initialized")]
    NotInitialized,

    /// `start` called on a manager that is already started
    #[error("connection manager is already started")]
    AlreadyStarted,

    /// Malformed connection string, or the liveness check failed at startup
    #[error("database is unreachable: {0}")]
    Connectivity(#[source] sqlx::Error),

    /// Any driver failure while a connection or session is in use
    #[error("database error: {0}")]
    Transaction(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl DbError {
    /// Reclassify a driver failure as a connectivity failure.
    ///
    /// Lifecycle errors pass through unchanged.
    pub fn into_connectivity(self) -> Self {
        match self {
            Self::Transaction(e) | Self::Connectivity(e) => Self::Connectivity(e),
            other => other,
        }
    }
}
