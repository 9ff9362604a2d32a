//! Data-Access Facade
//!
//! Typed async operations over the injected table store, organized by
//! domain. Every call acts as the session's owner and returns `ApiResult`.

mod account;
mod category;
mod transaction;
mod saving_goal;
mod wishlist;
mod budget;
mod recurring;
mod settings;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use ledger_store::{Embed, ListQuery, TableStore};
use serde::Serialize;
use serde_json::Value;

use crate::context::Session;
use crate::error::{ApiError, ApiResult};
use crate::models::{from_row, to_row, Entity};

pub use saving_goal::SavingContribution;

/// Facade over a `TableStore`, scoped to one owner
#[derive(Clone)]
pub struct Api {
    store: Arc<dyn TableStore>,
    session: Session,
}

impl Api {
    pub fn new(store: Arc<dyn TableStore>, session: Session) -> Self {
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying store, for callers that need raw row access
    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    // ========================
    // Generic helpers
    // ========================

    /// Base query restricted to the owner's rows
    fn owned(&self) -> ListQuery {
        ListQuery::new().eq("user_id", self.session.user_id())
    }

    /// Owned rows that have not been soft-deleted
    fn active(&self) -> ListQuery {
        self.owned().eq("is_active", true)
    }

    async fn list_rows<T: Entity>(&self, query: ListQuery) -> ApiResult<Vec<T>> {
        let rows = self.store.list(T::TABLE, &query).await?;
        rows.into_iter().map(from_row).collect()
    }

    async fn join_rows<T: Entity>(&self, query: ListQuery) -> ApiResult<Vec<T>> {
        let rows = self.store.join_list(T::TABLE, &query).await?;
        rows.into_iter().map(from_row).collect()
    }

    async fn fetch<T: Entity>(&self, id: &str) -> ApiResult<T> {
        let row = self.store.get_by_id(T::TABLE, id).await?;
        self.ensure_owned(T::TABLE, id, row.get("user_id"))?;
        from_row(row)
    }

    /// Single joined row by id
    async fn fetch_joined<T: Entity>(&self, id: &str, embeds: Vec<Embed>) -> ApiResult<T> {
        let query = embeds
            .into_iter()
            .fold(self.owned().eq("id", id), ListQuery::embed);
        self.join_rows::<T>(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("{} {id}", T::TABLE)))
    }

    /// Insert a payload stamped with the owner's `user_id`
    async fn insert_owned<T: Entity, P: Serialize>(&self, payload: &P) -> ApiResult<T> {
        let mut row = to_row(payload)?;
        row.insert("user_id".into(), Value::from(self.session.user_id()));
        let stored = self.store.insert(T::TABLE, row).await?;
        let entity: T = from_row(stored)?;
        tracing::debug!(table = T::TABLE, id = entity.id(), "created row");
        Ok(entity)
    }

    async fn patch<T: Entity, P: Serialize>(&self, id: &str, patch: &P) -> ApiResult<T> {
        self.fetch::<T>(id).await?;
        let row = to_row(patch)?;
        let updated = self.store.update(T::TABLE, id, row).await?;
        from_row(updated)
    }

    /// Soft or hard delete depending on the entity's table
    ///
    /// Unknown ids and rows of another owner are left untouched.
    async fn remove<T: Entity>(&self, id: &str) -> ApiResult<()> {
        let owned = match self.store.get_by_id(T::TABLE, id).await {
            Ok(row) => self.ensure_owned(T::TABLE, id, row.get("user_id")),
            Err(err) => Err(err.into()),
        };
        match owned {
            Ok(()) => {}
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err),
        }

        if T::SOFT_DELETE {
            let mut row = ledger_store::Row::new();
            row.insert("is_active".into(), Value::Bool(false));
            self.store.update(T::TABLE, id, row).await?;
        } else {
            self.store.delete(T::TABLE, id).await?;
        }
        tracing::info!(table = T::TABLE, id, soft = T::SOFT_DELETE, "deleted row");
        Ok(())
    }

    /// Rows of another owner are reported as missing
    fn ensure_owned(&self, table: &str, id: &str, owner: Option<&Value>) -> ApiResult<()> {
        match owner.and_then(Value::as_str) {
            Some(user_id) if user_id != self.session.user_id() => {
                tracing::warn!(table, id, "row belongs to another owner");
                Err(ApiError::NotFound(format!("{table} {id}")))
            }
            _ => Ok(()),
        }
    }
}
