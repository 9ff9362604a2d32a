//! Facade Errors
//!
//! One error type for every data-access operation and for query snapshots.

use std::fmt;
use std::time::Duration;

use ledger_store::StoreError;
use thiserror::Error;

/// A single failed form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors surfaced by the facade
///
/// `Clone` so a `QuerySnapshot` can hand out copies of the last failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("could not decode row: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Field names of a validation failure, empty for other errors
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ApiError::Validation(errors) => errors.iter().map(|e| e.field).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { table, id } => ApiError::NotFound(format!("{table} {id}")),
            StoreError::Decode(message) => ApiError::Decode(message),
            StoreError::Remote { status, message } => {
                ApiError::Remote(format!("status {status}: {message}"))
            }
            StoreError::Transport(message) | StoreError::InvalidInput(message) => {
                ApiError::Remote(message)
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
