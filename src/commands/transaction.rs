//! Transaction Commands
//!
//! Reads and writes return rows joined with their accounts and category.

use ledger_store::{Embed, ListQuery};

use super::Api;
use crate::error::ApiResult;
use crate::models::{Transaction, TransactionDraft, TransactionKind, TransactionPatch};

pub(super) fn account_embed(alias: &str, foreign_key: &str) -> Embed {
    Embed::new(alias, foreign_key, "accounts", &["id", "name", "type"])
}

pub(super) fn category_embed() -> Embed {
    Embed::new(
        "category",
        "category_id",
        "categories",
        &["id", "name", "type", "icon", "color"],
    )
}

fn transaction_embeds() -> Vec<Embed> {
    vec![
        account_embed("from_account", "from_account_id"),
        account_embed("to_account", "to_account_id"),
        category_embed(),
    ]
}

fn newest_first(query: ListQuery) -> ListQuery {
    transaction_embeds()
        .into_iter()
        .fold(query, ListQuery::embed)
        .desc("transaction_date")
        .desc("created_at")
}

impl Api {
    /// Owner's transactions, newest first
    pub async fn get_transactions(&self) -> ApiResult<Vec<Transaction>> {
        self.join_rows(newest_first(self.owned())).await
    }

    pub async fn get_transaction(&self, id: &str) -> ApiResult<Transaction> {
        self.fetch_joined(id, transaction_embeds()).await
    }

    /// Insert and return the joined row
    pub async fn create_transaction(&self, draft: &TransactionDraft) -> ApiResult<Transaction> {
        let created: Transaction = self.insert_owned(draft).await?;
        self.get_transaction(&created.id).await
    }

    pub async fn update_transaction(
        &self,
        id: &str,
        patch: &TransactionPatch,
    ) -> ApiResult<Transaction> {
        let updated: Transaction = self.patch(id, patch).await?;
        self.get_transaction(&updated.id).await
    }

    pub async fn delete_transaction(&self, id: &str) -> ApiResult<()> {
        self.remove::<Transaction>(id).await
    }

    /// Subscription payments, newest first
    pub async fn get_subscriptions(&self) -> ApiResult<Vec<Transaction>> {
        let query = self
            .owned()
            .eq("type", TransactionKind::Subscription.as_str());
        self.join_rows(newest_first(query)).await
    }
}
