//! Error types for the detailing core

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Caller-facing error categories. The presentation layer translates these
/// into its own failure representation; the hints below follow HTTP
/// conventions without depending on any transport crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Authorization,
    Integrity,
    Store,
}

impl ErrorKind {
    /// HTTP-style status hint for boundary translation
    pub fn status_hint(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 400,
            ErrorKind::Authorization => 403,
            ErrorKind::Integrity => 500,
            ErrorKind::Store => 500,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// A required reference record (named role or status) is missing from
    /// the store. Server-side data precondition, not a caller fault.
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Authorization(_) => ErrorKind::Authorization,
            AppError::Integrity(_) => ErrorKind::Integrity,
            AppError::Store(_) => ErrorKind::Store,
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Authorization(msg)
            | AppError::Integrity(msg) => msg.clone(),
            AppError::Store(e) => e.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
