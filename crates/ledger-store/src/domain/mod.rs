//! Domain Layer
//!
//! Row representation shared by every backend, plus the store error type.

mod error;
mod row;

pub use error::{StoreError, StoreResult};
pub use row::{row_id, value_key, Row};
