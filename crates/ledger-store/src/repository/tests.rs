//! Repository Integration Tests
//!
//! Tests for MemoryStore semantics and PostgREST query encoding.

use serde_json::{json, Value};

use super::rest::query_params;
use super::{Embed, ListQuery, MemoryStore, TableStore};
use crate::domain::{Row, StoreError};

fn row(value: Value) -> Row {
    value.as_object().cloned().expect("object literal")
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for (name, kind, budget) in [
        ("Salary", "income", Value::Null),
        ("Rent", "expense", json!(1200)),
        ("Food", "expense", json!(300)),
    ] {
        store
            .insert("categories", row(json!({ "name": name, "type": kind, "budget": budget })))
            .await
            .expect("insert category");
    }
    store
}

#[tokio::test]
async fn test_insert_generates_id_and_timestamps() {
    let store = MemoryStore::new();
    let created = store
        .insert("accounts", row(json!({ "name": "Main" })))
        .await
        .expect("insert");

    let id = created["id"].as_str().expect("string id");
    assert!(!id.is_empty());
    assert!(created["created_at"].is_string());
    assert_eq!(created["created_at"], created["updated_at"]);

    let fetched = store.get_by_id("accounts", id).await.expect("get");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_insert_keeps_supplied_id_and_rejects_duplicates() {
    let store = MemoryStore::new();
    store
        .insert("settings", row(json!({ "id": 1, "darkMode": false })))
        .await
        .expect("insert");

    let found = store.get_by_id("settings", "1").await.expect("numeric id lookup");
    assert_eq!(found["darkMode"], json!(false));

    let err = store
        .insert("settings", row(json!({ "id": 1 })))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Remote { status: 409, .. }));
}

#[tokio::test]
async fn test_get_missing_row_is_not_found() {
    let store = seeded_store().await;
    let err = store.get_by_id("categories", "nope").await.unwrap_err();
    assert_eq!(err, StoreError::not_found("categories", "nope"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_filters_and_orders() {
    let store = seeded_store().await;
    let query = ListQuery::new().eq("type", "expense").asc("name");
    let names: Vec<_> = store
        .list("categories", &query)
        .await
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Food", "Rent"]);

    let empty = store.list("missing_table", &ListQuery::new()).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_nulls_sort_last_ascending_and_first_descending() {
    let store = seeded_store().await;

    let ascending = store
        .list("categories", &ListQuery::new().asc("budget"))
        .await
        .unwrap();
    assert_eq!(ascending.last().unwrap()["name"], json!("Salary"));
    assert_eq!(ascending[0]["name"], json!("Food"));

    let descending = store
        .list("categories", &ListQuery::new().desc("budget"))
        .await
        .unwrap();
    assert_eq!(descending[0]["name"], json!("Salary"));
    assert_eq!(descending[1]["name"], json!("Rent"));
}

#[tokio::test]
async fn test_numeric_filter_ignores_integer_float_distinction() {
    let store = seeded_store().await;
    let rows = store
        .list("categories", &ListQuery::new().eq("budget", 300.0))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Food"));
}

#[tokio::test]
async fn test_join_list_embeds_related_rows() {
    let store = MemoryStore::new();
    let account = store
        .insert("accounts", row(json!({ "name": "Visa", "type": "visa", "balance": 10 })))
        .await
        .unwrap();
    store
        .insert(
            "transactions",
            row(json!({ "amount": 5, "to_account_id": account["id"], "from_account_id": null })),
        )
        .await
        .unwrap();

    let query = ListQuery::new()
        .embed(Embed::new("to_account", "to_account_id", "accounts", &["id", "name"]))
        .embed(Embed::new("from_account", "from_account_id", "accounts", &["id", "name"]));
    let rows = store.join_list("transactions", &query).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["to_account"], json!({ "id": account["id"], "name": "Visa" }));
    assert_eq!(rows[0]["from_account"], Value::Null);

    // plain list leaves embeds out
    let plain = store.list("transactions", &query).await.unwrap();
    assert!(plain[0].get("to_account").is_none());
}

#[tokio::test]
async fn test_update_patches_and_keeps_row_stable_when_unchanged() {
    let store = MemoryStore::new();
    let created = store
        .insert("accounts", row(json!({ "name": "Main", "balance": 100 })))
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let first = store
        .update("accounts", id, row(json!({ "balance": 100 })))
        .await
        .unwrap();
    assert_eq!(first, created);

    let renamed = store
        .update("accounts", id, row(json!({ "name": "Daily", "id": "hijack" })))
        .await
        .unwrap();
    assert_eq!(renamed["name"], json!("Daily"));
    assert_eq!(renamed["id"], created["id"]);
    assert_eq!(renamed["balance"], json!(100));
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let store = MemoryStore::new();
    let err = store
        .update("accounts", "ghost", row(json!({ "name": "x" })))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_removes_row() {
    let store = seeded_store().await;
    let rows = store.list("categories", &ListQuery::new()).await.unwrap();
    let id = rows[0]["id"].as_str().unwrap().to_string();

    store.delete("categories", &id).await.expect("delete");
    store.delete("categories", &id).await.expect("second delete is a no-op");

    assert_eq!(store.row_count("categories").await, 2);
    assert!(store.get_by_id("categories", &id).await.unwrap_err().is_not_found());
}

#[test]
fn test_query_params_encode_filters_order_and_embeds() {
    let query = ListQuery::new()
        .eq("is_active", true)
        .eq("user_id", "u-1")
        .eq("parent_id", Value::Null)
        .desc("transaction_date")
        .asc("name")
        .embed(Embed::new("category", "category_id", "categories", &["id", "name"]));

    let params = query_params(&query, true);
    let expected: Vec<(String, String)> = vec![
        ("select", "*,category:category_id(id,name)"),
        ("is_active", "eq.true"),
        ("user_id", "eq.u-1"),
        ("parent_id", "is.null"),
        ("order", "transaction_date.desc,name.asc"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(params, expected);

    let without_embeds = query_params(&query, false);
    assert_eq!(without_embeds[0], ("select".to_string(), "*".to_string()));
}

#[test]
fn test_rest_store_builds_table_urls() {
    let store = super::RestStore::new("https://demo.supabase.co/", "anon", None).unwrap();
    assert_eq!(
        store.table_url("accounts"),
        "https://demo.supabase.co/rest/v1/accounts"
    );
}
