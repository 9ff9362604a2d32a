//! Core Entity Trait
//!
//! Every typed row the facade reads maps onto one remote table.

use ledger_store::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Contract for typed table rows
pub trait Entity: DeserializeOwned + Send + Sync + Clone {
    /// Remote table name
    const TABLE: &'static str;

    /// `true` when deletion flips `is_active` instead of removing the row
    const SOFT_DELETE: bool;

    /// Returns the row's unique identifier
    fn id(&self) -> &str;
}

/// Serialize a payload into an untyped row
pub fn to_row<P: Serialize>(payload: &P) -> ApiResult<Row> {
    match serde_json::to_value(payload)? {
        Value::Object(row) => Ok(row),
        other => Err(ApiError::Decode(format!("expected an object payload, got {other}"))),
    }
}

pub fn from_row<T: DeserializeOwned>(row: Row) -> ApiResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

pub(crate) fn default_true() -> bool {
    true
}
