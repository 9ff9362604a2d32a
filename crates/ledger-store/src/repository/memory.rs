//! In-Memory Table Store
//!
//! Process-local implementation of `TableStore`. Used by tests and by the
//! demo mode of the binary; behaves like the hosted store for everything the
//! facade relies on (generated ids and timestamps, filter/order semantics,
//! foreign-key embedding).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::query::{Embed, ListQuery};
use super::traits::TableStore;
use crate::domain::{row_id, value_key, Row, StoreError, StoreResult};

/// Tables keyed by name, rows kept in insertion order
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows in `table`, active or not
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn has_id(row: &Row, id: &str) -> bool {
    row_id(row).as_deref() == Some(id)
}

fn select_rows(rows: Option<&Vec<Row>>, query: &ListQuery) -> Vec<Row> {
    let mut selected: Vec<Row> = rows
        .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
        .unwrap_or_default();
    // stable: equal keys keep insertion order
    selected.sort_by(|a, b| query.compare(a, b));
    selected
}

fn resolve_embed(tables: &HashMap<String, Vec<Row>>, row: &Row, embed: &Embed) -> Value {
    let Some(key) = row.get(&embed.foreign_key).and_then(value_key) else {
        return Value::Null;
    };
    tables
        .get(&embed.table)
        .and_then(|related| related.iter().find(|r| has_id(r, &key)))
        .map(|related| Value::Object(embed.project(related)))
        .unwrap_or(Value::Null)
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read().await;
        Ok(select_rows(tables.get(table), query))
    }

    async fn join_list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read().await;
        let mut rows = select_rows(tables.get(table), query);
        for row in &mut rows {
            for embed in &query.embeds {
                let related = resolve_embed(&tables, row, embed);
                row.insert(embed.alias.clone(), related);
            }
        }
        Ok(rows)
    }

    async fn get_by_id(&self, table: &str, id: &str) -> StoreResult<Row> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| has_id(row, id)))
            .cloned()
            .ok_or_else(|| StoreError::not_found(table, id))
    }

    async fn insert(&self, table: &str, mut row: Row) -> StoreResult<Row> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        let id = match row_id(&row) {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                row.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };
        if rows.iter().any(|existing| has_id(existing, &id)) {
            return Err(StoreError::Remote {
                status: 409,
                message: format!("duplicate key value violates unique constraint on {table}.id"),
            });
        }

        let now = now_timestamp();
        row.entry("created_at").or_insert_with(|| Value::String(now.clone()));
        row.entry("updated_at").or_insert_with(|| Value::String(now));

        rows.push(row.clone());
        tracing::debug!(table, id = %id, "memory store insert");
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> StoreResult<Row> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| has_id(row, id)))
            .ok_or_else(|| StoreError::not_found(table, id))?;

        let mut changed = false;
        for (column, value) in patch {
            if column == "id" {
                continue;
            }
            if row.get(&column) != Some(&value) {
                changed = true;
                row.insert(column, value);
            }
        }
        // Re-applying identical values must leave the row untouched.
        if changed {
            row.insert("updated_at".to_string(), Value::String(now_timestamp()));
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !has_id(row, id));
        }
        Ok(())
    }
}
