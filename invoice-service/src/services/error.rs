//! Store failures with their cause kept for logs and metrics.

use dashboard_core::error::AppError;
use thiserror::Error;

/// Coarse classification of a failed store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Constraint,
    InvalidInput,
    Connectivity,
    Timeout,
    Other,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorKind::Constraint => "constraint",
            StoreErrorKind::InvalidInput => "invalid_input",
            StoreErrorKind::Connectivity => "connectivity",
            StoreErrorKind::Timeout => "timeout",
            StoreErrorKind::Other => "other",
        }
    }

    pub fn classify(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(code) if code.starts_with("23") => StoreErrorKind::Constraint,
                Some(code) if code.starts_with("22") => StoreErrorKind::InvalidInput,
                Some(code) if code.starts_with("08") => StoreErrorKind::Connectivity,
                Some("57014") => StoreErrorKind::Timeout,
                _ => StoreErrorKind::Other,
            },
            sqlx::Error::PoolTimedOut => StoreErrorKind::Timeout,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreErrorKind::Connectivity,
            _ => StoreErrorKind::Other,
        }
    }
}

#[derive(Debug, Error)]
#[error("{} failed ({}): {}", .operation, .kind.as_str(), .source)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub operation: &'static str,
    #[source]
    pub source: anyhow::Error,
}

impl StoreError {
    pub fn new(
        kind: StoreErrorKind,
        operation: &'static str,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self {
            kind,
            operation,
            source: source.into(),
        }
    }

    pub fn from_sqlx(operation: &'static str, err: sqlx::Error) -> Self {
        Self::new(StoreErrorKind::classify(&err), operation, err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err.kind {
            StoreErrorKind::Connectivity | StoreErrorKind::Timeout => {
                tracing::warn!(error = %err, "Store unavailable");
                AppError::ServiceUnavailable
            }
            _ => AppError::DatabaseError(anyhow::Error::new(err)),
        }
    }
}
