//! PostgREST Table Store
//!
//! `TableStore` over a hosted PostgREST endpoint (the `/rest/v1` API of a
//! Supabase project). Filters, ordering and embeds are encoded as query
//! parameters; writes ask for the stored representation back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

use super::query::{Filter, ListQuery};
use super::traits::TableStore;
use crate::domain::{Row, StoreError, StoreResult};

/// Remote store client
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// Build a client for `base_url` (project URL, without `/rest/v1`)
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> StoreResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %message, "remote store rejected request");
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(&self, request: RequestBuilder) -> StoreResult<Vec<Row>> {
        let response = self.send(request).await?;
        response
            .json::<Vec<Row>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Render a filter value the way PostgREST expects it after the operator
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn filter_param(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq(column, Value::Null) => (column.clone(), "is.null".to_string()),
        Filter::Eq(column, value) => (column.clone(), format!("eq.{}", render_value(value))),
    }
}

/// Query-string pairs for a read. Embeds are only emitted when `with_embeds`.
pub(crate) fn query_params(query: &ListQuery, with_embeds: bool) -> Vec<(String, String)> {
    let mut select = String::from("*");
    if with_embeds {
        for embed in &query.embeds {
            let columns = if embed.columns.is_empty() {
                "*".to_string()
            } else {
                embed.columns.join(",")
            };
            select.push_str(&format!(",{}:{}({})", embed.alias, embed.foreign_key, columns));
        }
    }

    let mut params = vec![("select".to_string(), select)];
    params.extend(query.filters.iter().map(filter_param));
    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|key| format!("{}.{}", key.column, if key.ascending { "asc" } else { "desc" }))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("order".to_string(), order));
    }
    params
}

fn id_param(id: &str) -> (String, String) {
    ("id".to_string(), format!("eq.{id}"))
}

#[async_trait]
impl TableStore for RestStore {
    async fn list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        tracing::debug!(table, "rest list");
        let request = self.request(Method::GET, table).query(&query_params(query, false));
        self.rows(request).await
    }

    async fn join_list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        tracing::debug!(table, embeds = query.embeds.len(), "rest join list");
        let request = self.request(Method::GET, table).query(&query_params(query, true));
        self.rows(request).await
    }

    async fn get_by_id(&self, table: &str, id: &str) -> StoreResult<Row> {
        let request = self
            .request(Method::GET, table)
            .query(&[("select".to_string(), "*".to_string()), id_param(id)])
            .query(&[("limit", "1")]);
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(table, id))
    }

    async fn insert(&self, table: &str, row: Row) -> StoreResult<Row> {
        tracing::debug!(table, "rest insert");
        let request = self.request(Method::POST, table).json(&vec![row]);
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode(format!("insert into {table} returned no rows")))
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> StoreResult<Row> {
        tracing::debug!(table, id, "rest update");
        let request = self
            .request(Method::PATCH, table)
            .query(&[id_param(id)])
            .json(&patch);
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(table, id))
    }

    async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        tracing::debug!(table, id, "rest delete");
        let request = self.request(Method::DELETE, table).query(&[id_param(id)]);
        self.send(request).await.map(|_| ())
    }
}
