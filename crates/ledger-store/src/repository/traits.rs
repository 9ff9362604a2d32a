//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for table access.
//! Implementations can use an in-memory map, a PostgREST endpoint, etc.

use async_trait::async_trait;

use super::query::ListQuery;
use crate::domain::{Row, StoreResult};

/// Relational table client with the primitives the facade needs
///
/// Tables are addressed by name, rows are untyped JSON objects and ids are
/// compared in their string form. All operations are async to support remote
/// backends.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Rows matching every filter, in the requested order. Embeds are ignored.
    async fn list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>>;

    /// Like `list`, with each embed resolved into the row under its alias
    async fn join_list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>>;

    /// Exactly one row by id, `StoreError::NotFound` otherwise
    async fn get_by_id(&self, table: &str, id: &str) -> StoreResult<Row>;

    /// Insert a row and return it as stored (generated id and timestamps included)
    async fn insert(&self, table: &str, row: Row) -> StoreResult<Row>;

    /// Apply a partial update by id and return the updated row
    async fn update(&self, table: &str, id: &str, patch: Row) -> StoreResult<Row>;

    /// Remove a row by id. Removing an unknown id is not an error.
    async fn delete(&self, table: &str, id: &str) -> StoreResult<()>;
}
