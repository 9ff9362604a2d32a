//! Ledger Store
//!
//! Layered architecture:
//! - domain: row representation and store errors
//! - repository: the `TableStore` abstraction and its backends
//!
//! Every backend speaks the same narrow vocabulary (list, join-list,
//! get-by-id, insert, update, delete) over untyped JSON rows. Typed entities
//! live one layer up, in the facade crate.

pub mod domain;
pub mod repository;

pub use domain::{row_id, value_key, Row, StoreError, StoreResult};
pub use repository::{
    Embed, Filter, ListQuery, MemoryStore, OrderBy, RestStore, TableStore,
};
