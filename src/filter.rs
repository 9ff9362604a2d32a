//! Transaction Filter
//!
//! Client-side narrowing of a fetched transaction list: free-text search,
//! kind and category selection, amount bounds, a date window and the
//! accounts involved. Every criterion left unset matches everything.

use chrono::{Days, Months, NaiveDate};

use crate::models::{Transaction, TransactionKind};

/// Date window relative to the day the filter is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// The last seven days
    Week,
    /// Since the same day last month
    Month,
    /// Since the same day last year
    Year,
    /// Inclusive on both ends
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        let since = match self {
            DateRange::All => return true,
            DateRange::Today => return date == today,
            DateRange::Custom { start, end } => return start <= date && date <= end,
            DateRange::Week => today.checked_sub_days(Days::new(7)),
            DateRange::Month => today.checked_sub_months(Months::new(1)),
            DateRange::Year => today.checked_sub_months(Months::new(12)),
        };
        since.map_or(true, |since| date >= since)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive match on description or category name
    pub search: String,
    /// Empty means every kind
    pub kinds: Vec<TransactionKind>,
    /// Category names; empty means every category
    pub categories: Vec<String>,
    pub min_amount: Option<f64>,
    /// Compared against the absolute amount
    pub max_amount: Option<f64>,
    pub dates: DateRange,
    pub from_account: Option<String>,
    pub to_account: Option<String>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(name.into());
        self
    }

    pub fn amount_between(mut self, min: f64, max: f64) -> Self {
        self.min_amount = Some(min);
        self.max_amount = Some(max);
        self
    }

    pub fn dates(mut self, range: DateRange) -> Self {
        self.dates = range;
        self
    }

    pub fn from_account(mut self, name: impl Into<String>) -> Self {
        self.from_account = Some(name.into());
        self
    }

    pub fn to_account(mut self, name: impl Into<String>) -> Self {
        self.to_account = Some(name.into());
        self
    }

    /// `true` when the transaction passes every criterion
    pub fn matches(&self, tx: &Transaction, today: NaiveDate) -> bool {
        let category_name = tx.category.as_ref().map_or("", |c| c.name.as_str());

        self.matches_search(&tx.description, category_name)
            && (self.kinds.is_empty() || self.kinds.contains(&tx.kind))
            && (self.categories.is_empty() || self.categories.iter().any(|c| c == category_name))
            && self.min_amount.map_or(true, |min| tx.amount >= min)
            && self.max_amount.map_or(true, |max| tx.amount.abs() <= max)
            && account_matches(self.from_account.as_deref(), tx.from_account.as_ref().map(|a| a.name.as_str()))
            && account_matches(self.to_account.as_deref(), tx.to_account.as_ref().map(|a| a.name.as_str()))
            && self.dates.contains(tx.transaction_date, today)
    }

    /// Matching transactions, in list order
    pub fn apply<'a>(&self, transactions: &'a [Transaction], today: NaiveDate) -> Vec<&'a Transaction> {
        transactions.iter().filter(|tx| self.matches(tx, today)).collect()
    }

    fn matches_search(&self, description: &str, category_name: &str) -> bool {
        let term = self.search.trim().to_lowercase();
        term.is_empty()
            || description.to_lowercase().contains(&term)
            || category_name.to_lowercase().contains(&term)
    }
}

fn account_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.map_or(true, |name| actual == Some(name))
}
