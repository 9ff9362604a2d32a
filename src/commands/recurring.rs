//! Recurring Transaction Commands

use super::transaction::{account_embed, category_embed};
use super::Api;
use crate::error::ApiResult;
use crate::models::{NewRecurringTransaction, RecurringPatch, RecurringTransaction};

impl Api {
    /// Active templates, soonest first
    pub async fn get_recurring_transactions(&self) -> ApiResult<Vec<RecurringTransaction>> {
        let query = self
            .active()
            .embed(account_embed("from_account", "from_account_id"))
            .embed(account_embed("to_account", "to_account_id"))
            .embed(category_embed())
            .asc("next_date");
        self.join_rows(query).await
    }

    pub async fn get_recurring_transaction(&self, id: &str) -> ApiResult<RecurringTransaction> {
        self.fetch(id).await
    }

    pub async fn create_recurring_transaction(
        &self,
        template: &NewRecurringTransaction,
    ) -> ApiResult<RecurringTransaction> {
        self.insert_owned(template).await
    }

    pub async fn update_recurring_transaction(
        &self,
        id: &str,
        patch: &RecurringPatch,
    ) -> ApiResult<RecurringTransaction> {
        self.patch(id, patch).await
    }

    pub async fn delete_recurring_transaction(&self, id: &str) -> ApiResult<()> {
        self.remove::<RecurringTransaction>(id).await
    }
}
