//! Repository Layer
//!
//! Table-store abstraction and implementations.

mod traits;
mod query;
mod memory;
mod rest;

#[cfg(test)]
mod tests;

pub use traits::TableStore;
pub use query::{Embed, Filter, ListQuery, OrderBy};
pub use memory::MemoryStore;
pub use rest::RestStore;
