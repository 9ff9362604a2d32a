//! Recurring Transaction Template
//!
//! A template the recurrence engine turns into concrete transactions each
//! time `next_date` comes due.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::CategoryRef;
use super::entity::{default_true, Entity};
use super::transaction::{AccountRef, Frequency, TransactionKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub from_account_id: Option<String>,
    #[serde(default)]
    pub to_account_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    pub amount: f64,
    pub description: String,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default = "default_true")]
    pub is_active: bool,
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

impl RecurringTransaction {
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active && self.next_date <= today && !self.is_expired(self.next_date)
    }

    /// `true` once `date` lies past the template's end date
    pub fn is_expired(&self, date: NaiveDate) -> bool {
        self.end_date.map_or(false, |end| date > end)
    }
}

impl Entity for RecurringTransaction {
    const TABLE: &'static str = "recurring_transactions";
    const SOFT_DELETE: bool = true;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecurringTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub amount: f64,
    pub description: String,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub is_active: bool,
}

impl NewRecurringTransaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        description: impl Into<String>,
        frequency: Frequency,
        next_date: NaiveDate,
    ) -> Self {
        Self {
            from_account_id: None,
            to_account_id: None,
            category_id: None,
            amount,
            description: description.into(),
            frequency,
            next_date,
            end_date: None,
            kind,
            is_active: true,
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

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecurringPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
