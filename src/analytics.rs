//! Dashboard Analytics
//!
//! Pure aggregations over fetched rows, shaped for the chart views.
//! Cancelled transactions never count.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::{Account, Category, Transaction, TransactionKind, TransactionStatus};

const UNCATEGORIZED: &str = "Uncategorized";
const UNCATEGORIZED_COLOR: &str = "#9CA3AF";

fn counts(tx: &Transaction) -> bool {
    tx.status != TransactionStatus::Cancelled
}

/// Kinds that take money out of an account
fn is_outflow(kind: TransactionKind) -> bool {
    matches!(
        kind,
        TransactionKind::Expense | TransactionKind::Subscription | TransactionKind::Saving
    )
}

/// One pie slice
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category_id: Option<String>,
    pub name: String,
    pub color: String,
    pub value: f64,
    pub percentage: f64,
}

/// Totals per category for one transaction kind, largest first
pub fn category_breakdown(transactions: &[Transaction], kind: TransactionKind) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();

    for tx in transactions.iter().filter(|tx| tx.kind == kind && counts(tx)) {
        let key = tx.category_id.clone();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            let (name, color) = match &tx.category {
                Some(category) => (
                    category.name.clone(),
                    category.color.clone().unwrap_or_else(|| UNCATEGORIZED_COLOR.to_string()),
                ),
                None => (UNCATEGORIZED.to_string(), UNCATEGORIZED_COLOR.to_string()),
            };
            slices.push(CategorySlice {
                category_id: key,
                name,
                color,
                value: 0.0,
                percentage: 0.0,
            });
            slices.len() - 1
        });
        slices[slot].value += tx.amount.abs();
    }

    let total: f64 = slices.iter().map(|slice| slice.value).sum();
    if total > 0.0 {
        for slice in &mut slices {
            slice.percentage = slice.value / total * 100.0;
        }
    }
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    slices
}

/// Totals for one calendar month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthFlow {
    /// 1-based month number
    pub month: u32,
    pub income: f64,
    pub expense: f64,
    pub transfer: f64,
    pub subscription: f64,
    pub saving: f64,
}

impl MonthFlow {
    /// Income minus everything that left the accounts
    pub fn net(&self) -> f64 {
        self.income - self.expense - self.subscription - self.saving
    }
}

/// Twelve monthly buckets for `year`, January first
pub fn monthly_cash_flow(transactions: &[Transaction], year: i32) -> Vec<MonthFlow> {
    let mut months: Vec<MonthFlow> = (1..=12)
        .map(|month| MonthFlow {
            month,
            ..MonthFlow::default()
        })
        .collect();

    for tx in transactions.iter().filter(|tx| counts(tx)) {
        let date = tx.transaction_date;
        if date.year() != year {
            continue;
        }
        let bucket = &mut months[date.month0() as usize];
        let amount = tx.amount.abs();
        match tx.kind {
            TransactionKind::Income => bucket.income += amount,
            TransactionKind::Expense => bucket.expense += amount,
            TransactionKind::Transfer => bucket.transfer += amount,
            TransactionKind::Subscription => bucket.subscription += amount,
            TransactionKind::Saving => bucket.saving += amount,
        }
    }
    months
}

/// Spending against a category's monthly ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub category_id: String,
    pub name: String,
    pub budget: f64,
    pub spent: f64,
}

impl BudgetUsage {
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.budget
    }

    pub fn percentage(&self) -> f64 {
        if self.budget <= 0.0 {
            return 0.0;
        }
        self.spent / self.budget * 100.0
    }
}

/// Usage for every category with a budget, in the month containing `month`
pub fn budget_usage(
    categories: &[Category],
    transactions: &[Transaction],
    month: NaiveDate,
) -> Vec<BudgetUsage> {
    let in_month = |date: NaiveDate| date.year() == month.year() && date.month() == month.month();

    categories
        .iter()
        .filter_map(|category| {
            let budget = category.budget?;
            let spent = transactions
                .iter()
                .filter(|tx| {
                    counts(tx)
                        && is_outflow(tx.kind)
                        && tx.category_id.as_deref() == Some(category.id.as_str())
                        && in_month(tx.transaction_date)
                })
                .map(|tx| tx.amount.abs())
                .sum();
            Some(BudgetUsage {
                category_id: category.id.clone(),
                name: category.name.clone(),
                budget,
                spent,
            })
        })
        .collect()
}

pub fn total_balance(accounts: &[Account]) -> f64 {
    accounts.iter().map(|account| account.balance).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewWindow {
    /// Since the most recent Sunday
    Week,
    Month,
    Year,
}

impl OverviewWindow {
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            OverviewWindow::Week => {
                let offset = u64::from(today.weekday().num_days_from_sunday());
                today.checked_sub_days(Days::new(offset)).unwrap_or(today)
            }
            OverviewWindow::Month => today.with_day(1).unwrap_or(today),
            OverviewWindow::Year => today.with_ordinal(1).unwrap_or(today),
        }
    }
}

/// Per-account card summary
#[derive(Debug, Clone, PartialEq)]
pub struct AccountOverview {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
}

/// Income and outflow touching `account` since the window start
pub fn account_overview(
    account: &Account,
    transactions: &[Transaction],
    window: OverviewWindow,
    today: NaiveDate,
) -> AccountOverview {
    let start = window.start(today);
    let touches = |tx: &&Transaction| {
        tx.from_account_id.as_deref() == Some(account.id.as_str())
            || tx.to_account_id.as_deref() == Some(account.id.as_str())
    };

    let mut overview = AccountOverview {
        balance: account.balance,
        income: 0.0,
        expense: 0.0,
    };
    for tx in transactions
        .iter()
        .filter(touches)
        .filter(|tx| counts(tx) && tx.transaction_date >= start)
    {
        if tx.kind == TransactionKind::Income {
            overview.income += tx.amount;
        } else if is_outflow(tx.kind) {
            overview.expense += tx.amount;
        }
    }
    overview
}
