//! Transaction Entity
//!
//! Money movement between accounts. Reads come back joined with the source
//! account, destination account and category projections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::CategoryRef;
use super::entity::Entity;
use crate::error::{ApiError, ApiResult, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
    Subscription,
    Saving,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Subscription => "subscription",
            TransactionKind::Saving => "saving",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
}

/// Repetition unit shared by subscriptions and recurring templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ends {
    Never,
    After,
    OnDate,
}

/// Subscription schedule columns, stored flat on the transaction row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeats: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeats_every: Option<u32>,
    /// Weekday names ("Mon", "Tue", ...) for weekly schedules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeats_on: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends: Option<Ends>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_after_occurrences: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_on_date: Option<NaiveDate>,
}

impl SubscriptionTerms {
    pub fn is_empty(&self) -> bool {
        self.repeats.is_none()
    }
}

/// Account projection embedded in joined transaction reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub transaction_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub from_account_id: Option<String>,
    #[serde(default)]
    pub to_account_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub recurring_transaction_id: Option<String>,
    #[serde(default)]
    pub saving_goal_id: Option<String>,
    #[serde(flatten)]
    pub schedule: SubscriptionTerms,
    #[serde(default)]
    pub from_account: Option<AccountRef>,
    #[serde(default)]
    pub to_account: Option<AccountRef>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Entity for Transaction {
    const TABLE: &'static str = "transactions";
    const SOFT_DELETE: bool = false;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create payload, mirroring the add-transaction form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDraft {
    pub amount: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub transaction_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saving_goal_id: Option<String>,
    #[serde(flatten)]
    pub schedule: SubscriptionTerms,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        description: impl Into<String>,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            description: description.into(),
            notes: None,
            transaction_date,
            kind,
            status: TransactionStatus::Completed,
            from_account_id: None,
            to_account_id: None,
            category_id: None,
            recurring_transaction_id: None,
            saving_goal_id: None,
            schedule: SubscriptionTerms::default(),
        }
    }

    pub fn from_account(mut self, id: impl Into<String>) -> Self {
        self.from_account_id = Some(id.into());
        self
    }

    pub fn to_account(mut self, id: impl Into<String>) -> Self {
        self.to_account_id = Some(id.into());
        self
    }

    pub fn category(mut self, id: impl Into<String>) -> Self {
        self.category_id = Some(id.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn saving_goal(mut self, id: impl Into<String>) -> Self {
        self.saving_goal_id = Some(id.into());
        self
    }

    pub fn schedule(mut self, schedule: SubscriptionTerms) -> Self {
        self.schedule = schedule;
        self
    }

    /// Form checks; every failing field is reported at once
    pub fn validate(&self) -> ApiResult<()> {
        let mut errors = Vec::new();
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        }
        if self.kind != TransactionKind::Saving && blank(&self.category_id) {
            errors.push(FieldError::new("category_id", "Category is required"));
        }
        if self.amount.is_nan() || self.amount <= 0.0 {
            errors.push(FieldError::new("amount", "Amount must be greater than 0"));
        }
        if self.kind == TransactionKind::Saving && blank(&self.saving_goal_id) {
            errors.push(FieldError::new("saving_goal_id", "Saving goal is required"));
        }

        match self.kind {
            TransactionKind::Expense if blank(&self.from_account_id) => {
                errors.push(FieldError::new(
                    "from_account_id",
                    "From account is required for expenses",
                ));
            }
            TransactionKind::Income if blank(&self.to_account_id) => {
                errors.push(FieldError::new(
                    "to_account_id",
                    "To account is required for income",
                ));
            }
            TransactionKind::Transfer => {
                if blank(&self.from_account_id) {
                    errors.push(FieldError::new(
                        "from_account_id",
                        "From account is required for transfers",
                    ));
                }
                if blank(&self.to_account_id) {
                    errors.push(FieldError::new(
                        "to_account_id",
                        "To account is required for transfers",
                    ));
                } else if self.from_account_id == self.to_account_id {
                    errors.push(FieldError::new(
                        "to_account_id",
                        "From and To accounts must be different",
                    ));
                }
            }
            TransactionKind::Subscription => self.validate_schedule(&mut errors),
            _ => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }

    fn validate_schedule(&self, errors: &mut Vec<FieldError>) {
        let terms = &self.schedule;
        if terms.repeats.is_none() {
            return;
        }
        if terms.repeats_every == Some(0) {
            errors.push(FieldError::new("repeats_every", "Must repeat at least every 1 period"));
        }
        match terms.ends {
            Some(Ends::After) if terms.ends_after_occurrences.unwrap_or(0) == 0 => {
                errors.push(FieldError::new(
                    "ends_after_occurrences",
                    "Number of occurrences is required",
                ));
            }
            Some(Ends::OnDate) if terms.ends_on_date.is_none() => {
                errors.push(FieldError::new("ends_on_date", "End date is required"));
            }
            _ => {}
        }
    }
}

/// Partial update; only `Some` fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}
