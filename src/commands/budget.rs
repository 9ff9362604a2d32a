//! Budget Commands

use super::transaction::category_embed;
use super::Api;
use crate::error::ApiResult;
use crate::models::{Budget, BudgetPatch, NewBudget};

impl Api {
    /// Active budgets with their category, latest start first
    pub async fn get_budgets(&self) -> ApiResult<Vec<Budget>> {
        let query = self.active().embed(category_embed()).desc("start_date");
        self.join_rows(query).await
    }

    pub async fn get_budget(&self, id: &str) -> ApiResult<Budget> {
        self.fetch_joined(id, vec![category_embed()]).await
    }

    pub async fn create_budget(&self, budget: &NewBudget) -> ApiResult<Budget> {
        self.insert_owned(budget).await
    }

    pub async fn update_budget(&self, id: &str, patch: &BudgetPatch) -> ApiResult<Budget> {
        self.patch(id, patch).await
    }

    pub async fn delete_budget(&self, id: &str) -> ApiResult<()> {
        self.remove::<Budget>(id).await
    }
}
