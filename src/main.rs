//! LedgerDash Entry Point
//!
//! Connects to the configured store and prints a dashboard overview.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use ledger_store::{MemoryStore, RestStore, TableStore};
use ledgerdash::analytics::{category_breakdown, monthly_cash_flow, total_balance};
use ledgerdash::models::{Account, SavingGoal, Transaction, TransactionKind};
use ledgerdash::filter::TransactionFilter;
use ledgerdash::{demo, recurrence, Api, AppConfig, Query, QueryOptions, Session, StoreSettings};

const APP_NAME: &str = "LedgerDash";
const LATEST_TRANSACTIONS: usize = 5;

#[derive(Parser)]
#[command(name = "ledgerdash", about = "Personal-finance dashboard overview.")]
struct Cli {
    /// Use an in-memory store seeded with sample data
    #[arg(long)]
    demo: bool,
    /// Create transactions for recurring templates that are due
    #[arg(long)]
    materialize: bool,
    /// Year of the cash-flow table (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,
    /// Only list transactions whose description or category contains this
    #[arg(long)]
    search: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = if cli.demo {
        AppConfig::demo()
    } else {
        AppConfig::load().context("loading configuration")?
    };
    rolling_logger::init_logger(config.log_dir.clone(), APP_NAME)
        .context("initialising logger")?;

    let store: Arc<dyn TableStore> = match &config.store {
        StoreSettings::Rest { url, anon_key } => Arc::new(
            RestStore::new(url, anon_key, Some(config.request_timeout()))
                .context("building REST client")?,
        ),
        StoreSettings::Memory => Arc::new(MemoryStore::new()),
    };
    let api = Arc::new(Api::new(store, Session::new(config.owner_id.clone())));
    let today = Local::now().date_naive();

    if cli.demo {
        demo::seed(&api, today).await.context("seeding demo data")?;
    }
    if cli.materialize {
        let created = recurrence::materialize_due(&api, today)
            .await
            .context("materializing recurring transactions")?;
        println!("Created {} recurring transaction(s)", created.len());
    }

    let options = QueryOptions {
        timeout: config.query_timeout(),
    };
    let accounts = query(&api, "accounts", options, |api| async move { api.get_accounts().await });
    let transactions = query(&api, "transactions", options, |api| async move {
        api.get_transactions().await
    });
    let goals = query(&api, "saving_goals", options, |api| async move {
        api.get_saving_goals().await
    });
    accounts.mount();
    transactions.mount();
    goals.mount();

    let accounts = accounts.settled().await;
    let transactions = transactions.settled().await;
    let goals = goals.settled().await;
    for error in [&accounts.error, &transactions.error, &goals.error].into_iter().flatten() {
        rolling_logger::error(&format!("dashboard query failed: {error}"));
        eprintln!("warning: {error}");
    }

    print_accounts(accounts.data.as_deref().unwrap_or_default());
    let transactions = transactions.data.unwrap_or_default();
    let filter = TransactionFilter::new().search(cli.search.clone().unwrap_or_default());
    print_transactions(&filter.apply(&transactions, today));
    print_breakdown(&transactions);
    print_cash_flow(&transactions, cli.year.unwrap_or_else(|| today.year()));
    print_goals(goals.data.as_deref().unwrap_or_default());

    rolling_logger::info("overview printed");
    Ok(())
}

fn query<T, F, Fut>(api: &Arc<Api>, key: &str, options: QueryOptions, fetch: F) -> Query<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(Arc<Api>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ledgerdash::ApiResult<T>> + Send + 'static,
{
    let api = Arc::clone(api);
    Query::with_options(key, move |_key| fetch(Arc::clone(&api)), options)
}

fn print_accounts(accounts: &[Account]) {
    println!("Accounts (total {:.2})", total_balance(accounts));
    for account in accounts {
        println!(
            "  {:<20} {:>12.2} {} [{}]",
            account.name, account.balance, account.currency, account.kind
        );
    }
}

fn print_transactions(transactions: &[&Transaction]) {
    println!("Latest transactions");
    for tx in transactions.iter().take(LATEST_TRANSACTIONS) {
        let category = tx.category.as_ref().map_or("-", |c| c.name.as_str());
        println!(
            "  {} {:<13} {:<24} {:>10.2} {}",
            tx.transaction_date,
            tx.kind.as_str(),
            tx.description,
            tx.amount,
            category
        );
    }
}

fn print_breakdown(transactions: &[Transaction]) {
    let slices = category_breakdown(transactions, TransactionKind::Expense);
    if !slices.is_empty() {
        println!("Expenses by category");
        for slice in slices {
            println!("  {:<20} {:>10.2} {:>5.1}%", slice.name, slice.value, slice.percentage);
        }
    }
}

fn print_cash_flow(transactions: &[Transaction], year: i32) {
    println!("Cash flow {year}");
    for month in monthly_cash_flow(transactions, year) {
        if month.income == 0.0 && month.net() == 0.0 {
            continue;
        }
        let label = NaiveDate::from_ymd_opt(year, month.month, 1)
            .map(|date| date.format("%b").to_string())
            .unwrap_or_default();
        println!(
            "  {label} income {:>10.2} out {:>10.2} net {:>10.2}",
            month.income,
            month.expense + month.subscription + month.saving,
            month.net()
        );
    }
}

fn print_goals(goals: &[SavingGoal]) {
    println!("Saving goals");
    for goal in goals {
        println!(
            "  {:<20} {:>10.2} / {:<10.2} {:>5.1}%",
            goal.name,
            goal.current_amount,
            goal.target_amount,
            goal.progress()
        );
    }
}
