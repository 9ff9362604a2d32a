//! Saving Goal Commands

use super::Api;
use crate::error::ApiResult;
use crate::models::{
    NewSavingGoal, SavingGoal, SavingGoalPatch, Transaction, TransactionDraft, TransactionKind,
};

/// Name of the category saving transactions are filed under, when it exists
const SAVINGS_CATEGORY: &str = "savings";

/// Outcome of `record_saving`
#[derive(Debug, Clone, PartialEq)]
pub struct SavingContribution {
    pub transaction: Transaction,
    pub goal: SavingGoal,
}

impl Api {
    /// Active goals, highest priority first, then nearest target date
    pub async fn get_saving_goals(&self) -> ApiResult<Vec<SavingGoal>> {
        let mut goals: Vec<SavingGoal> = self
            .list_rows(self.active().desc("priority").asc("target_date"))
            .await?;
        // Stores collate the priority column as text; re-rank by level
        goals.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(goals)
    }

    /// Every goal the owner has, archived ones included
    pub async fn get_savings(&self) -> ApiResult<Vec<SavingGoal>> {
        self.list_rows(self.owned().asc("created_at")).await
    }

    pub async fn get_saving_goal(&self, id: &str) -> ApiResult<SavingGoal> {
        self.fetch(id).await
    }

    pub async fn create_saving_goal(&self, goal: &NewSavingGoal) -> ApiResult<SavingGoal> {
        self.insert_owned(goal).await
    }

    pub async fn update_saving_goal(
        &self,
        id: &str,
        patch: &SavingGoalPatch,
    ) -> ApiResult<SavingGoal> {
        self.patch(id, patch).await
    }

    pub async fn delete_saving_goal(&self, id: &str) -> ApiResult<()> {
        self.remove::<SavingGoal>(id).await
    }

    /// Record a contribution towards a goal
    ///
    /// Creates a `saving` transaction, then raises the goal's
    /// `current_amount` from a fresh read. If the goal update fails the
    /// transaction is deleted again and the update error is returned.
    pub async fn record_saving(
        &self,
        mut draft: TransactionDraft,
        goal_id: &str,
    ) -> ApiResult<SavingContribution> {
        self.get_saving_goal(goal_id).await?;

        draft.kind = TransactionKind::Saving;
        draft.saving_goal_id = Some(goal_id.to_string());
        if draft.category_id.is_none() {
            draft.category_id = self
                .find_category_by_name(SAVINGS_CATEGORY)
                .await?
                .map(|category| category.id);
        }

        let transaction = self.create_transaction(&draft).await?;
        match self.add_to_goal(goal_id, draft.amount).await {
            Ok(goal) => {
                tracing::info!(goal_id, amount = draft.amount, "recorded saving");
                Ok(SavingContribution { transaction, goal })
            }
            Err(err) => {
                tracing::warn!(goal_id, error = %err, "goal update failed, removing transaction");
                if let Err(undo) = self.delete_transaction(&transaction.id).await {
                    tracing::error!(
                        transaction_id = %transaction.id,
                        error = %undo,
                        "could not remove saving transaction"
                    );
                }
                Err(err)
            }
        }
    }

    async fn add_to_goal(&self, goal_id: &str, amount: f64) -> ApiResult<SavingGoal> {
        let goal = self.get_saving_goal(goal_id).await?;
        let patch = SavingGoalPatch {
            current_amount: Some(goal.current_amount + amount),
            ..SavingGoalPatch::default()
        };
        self.update_saving_goal(goal_id, &patch).await
    }
}
