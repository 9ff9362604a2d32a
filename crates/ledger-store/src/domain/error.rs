//! Store Errors

use thiserror::Error;

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by a table store.
///
/// Payloads are plain strings so the error stays `Clone` and can be held by
/// consumers that keep the last failure around.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{table} row not found: {id}")]
    NotFound { table: String, id: String },

    #[error("remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode store payload: {0}")]
    Decode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StoreError {
    pub fn not_found(table: &str, id: &str) -> Self {
        StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}
