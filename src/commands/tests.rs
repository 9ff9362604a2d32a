//! Facade Integration Tests
//!
//! Every operation runs against an in-memory table store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use ledger_store::{ListQuery, MemoryStore, Row, StoreError, StoreResult, TableStore};

use super::Api;
use crate::context::Session;
use crate::error::ApiError;
use crate::models::*;

const OWNER: &str = "user-1";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (Api, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let api = Api::new(store.clone(), Session::new(OWNER));
    (api, store)
}

async fn seed_account(api: &Api, name: &str, balance: f64) -> Account {
    api.create_account(&NewAccount::new(name, "visa", balance))
        .await
        .expect("Failed to create account")
}

async fn seed_category(api: &Api, name: &str, kind: CategoryKind) -> Category {
    api.create_category(&NewCategory::new(name, kind))
        .await
        .expect("Failed to create category")
}

/// Store whose updates to one table can be switched to fail
struct FlakyStore {
    inner: MemoryStore,
    failing_table: &'static str,
    fail: AtomicBool,
}

#[async_trait]
impl TableStore for FlakyStore {
    async fn list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        self.inner.list(table, query).await
    }

    async fn join_list(&self, table: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        self.inner.join_list(table, query).await
    }

    async fn get_by_id(&self, table: &str, id: &str) -> StoreResult<Row> {
        self.inner.get_by_id(table, id).await
    }

    async fn insert(&self, table: &str, row: Row) -> StoreResult<Row> {
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> StoreResult<Row> {
        if table == self.failing_table && self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Remote {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        self.inner.delete(table, id).await
    }
}

// ========================
// Accounts
// ========================

#[tokio::test]
async fn test_create_account_stamps_owner() {
    let (api, _) = setup();

    let account = seed_account(&api, "Main", 100.0).await;

    assert!(!account.id.is_empty());
    assert_eq!(account.user_id, OWNER);
    assert_eq!(account.balance, 100.0);
    assert!(account.is_active);
    assert!(!account.created_at.is_empty());
}

#[tokio::test]
async fn test_get_account_unknown_id_is_not_found() {
    let (api, _) = setup();

    let err = api.get_account("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_empty_table_is_empty_vec() {
    let (api, _) = setup();

    assert!(api.get_accounts().await.unwrap().is_empty());
    assert!(api.get_transactions().await.unwrap().is_empty());
    assert!(api.get_saving_goals().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_accounts_listed_oldest_first() {
    let (api, _) = setup();
    let first = seed_account(&api, "First", 1.0).await;
    let second = seed_account(&api, "Second", 2.0).await;

    let ids: Vec<_> = api.get_accounts().await.unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_lists_are_scoped_to_owner() {
    let (api, store) = setup();
    seed_account(&api, "Mine", 10.0).await;

    let other = Api::new(store.clone(), Session::new("user-2"));
    let theirs = seed_account(&other, "Theirs", 20.0).await;

    let names: Vec<_> = api.get_accounts().await.unwrap().into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["Mine"]);
    assert!(api.get_account(&theirs.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_leaves_other_owners_rows_alone() {
    let (api, store) = setup();
    let other = Api::new(store.clone(), Session::new("user-2"));
    let account = seed_account(&other, "Theirs", 20.0).await;
    let goal = other
        .create_saving_goal(&NewSavingGoal::new("Car", 5000.0))
        .await
        .unwrap();

    api.delete_account(&account.id).await.unwrap();
    api.delete_saving_goal(&goal.id).await.unwrap();

    assert_eq!(other.get_account(&account.id).await.unwrap().name, "Theirs");
    assert!(other.get_saving_goal(&goal.id).await.unwrap().is_active);
}

#[tokio::test]
async fn test_update_account_applies_only_given_fields() {
    let (api, _) = setup();
    let account = seed_account(&api, "Main", 100.0).await;

    let patch = AccountPatch {
        name: Some("Everyday".into()),
        ..AccountPatch::default()
    };
    let updated = api.update_account(&account.id, &patch).await.unwrap();

    assert_eq!(updated.name, "Everyday");
    assert_eq!(updated.balance, 100.0);
    assert_eq!(updated.kind, "visa");
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let (api, _) = setup();
    let account = seed_account(&api, "Main", 100.0).await;
    let patch = AccountPatch {
        balance: Some(250.0),
        ..AccountPatch::default()
    };

    let once = api.update_account(&account.id, &patch).await.unwrap();
    let twice = api.update_account(&account.id, &patch).await.unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (api, _) = setup();

    let err = api
        .update_account("missing", &AccountPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_hard_delete_account_removes_row() {
    let (api, store) = setup();
    let account = seed_account(&api, "Main", 100.0).await;

    api.delete_account(&account.id).await.unwrap();

    assert!(api.get_accounts().await.unwrap().is_empty());
    let err = store.get_by_id("accounts", &account.id).await.unwrap_err();
    assert!(err.is_not_found());
}

// ========================
// Categories
// ========================

#[tokio::test]
async fn test_categories_ordered_by_type_then_name() {
    let (api, _) = setup();
    seed_category(&api, "Rent", CategoryKind::Expense).await;
    seed_category(&api, "Salary", CategoryKind::Income).await;
    seed_category(&api, "Food", CategoryKind::Expense).await;

    let names: Vec<_> = api
        .get_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Food", "Rent", "Salary"]);
}

#[tokio::test]
async fn test_delete_category_is_hard() {
    let (api, store) = setup();
    let category = seed_category(&api, "Food", CategoryKind::Expense).await;

    api.delete_category(&category.id).await.unwrap();

    assert!(store.get_by_id("categories", &category.id).await.is_err());
    assert!(api.get_category(&category.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_find_category_by_name_ignores_case() {
    let (api, _) = setup();
    let savings = seed_category(&api, "Savings", CategoryKind::Saving).await;

    let found = api.find_category_by_name("SAVINGS").await.unwrap();
    assert_eq!(found.map(|c| c.id), Some(savings.id));
    assert_eq!(api.find_category_by_name("Travel").await.unwrap(), None);
}

// ========================
// Transactions
// ========================

#[tokio::test]
async fn test_income_scenario_leaves_balance_untouched() {
    let (api, _) = setup();
    let account = seed_account(&api, "Main", 100.0).await;
    let salary = seed_category(&api, "Salary", CategoryKind::Income).await;

    let draft = TransactionDraft::new(TransactionKind::Income, 50.0, "Paycheck", date(2025, 3, 1))
        .to_account(&account.id)
        .category(&salary.id);
    api.create_transaction(&draft).await.unwrap();

    let transactions = api.get_transactions().await.unwrap();
    assert_eq!(transactions.len(), 1);
    let tx = &transactions[0];
    assert_eq!(tx.kind, TransactionKind::Income);
    assert_eq!(tx.to_account.as_ref().map(|a| a.name.as_str()), Some("Main"));
    assert_eq!(tx.category.as_ref().map(|c| c.name.as_str()), Some("Salary"));
    assert_eq!(tx.from_account, None);

    let account = api.get_account(&account.id).await.unwrap();
    assert_eq!(account.balance, 100.0);
}

#[tokio::test]
async fn test_create_transaction_returns_joined_row() {
    let (api, _) = setup();
    let account = seed_account(&api, "Card", 0.0).await;

    let draft = TransactionDraft::new(TransactionKind::Expense, 12.0, "Lunch", date(2025, 3, 2))
        .from_account(&account.id);
    let created = api.create_transaction(&draft).await.unwrap();

    assert_eq!(created.user_id, OWNER);
    assert_eq!(created.from_account.map(|a| a.id), Some(account.id));
    assert_eq!(created.to_account, None);
    assert_eq!(created.category, None);
}

#[tokio::test]
async fn test_transactions_newest_first() {
    let (api, _) = setup();
    for (day, label) in [(1, "old"), (20, "new"), (10, "mid")] {
        let draft = TransactionDraft::new(TransactionKind::Expense, 1.0, label, date(2025, 3, day));
        api.create_transaction(&draft).await.unwrap();
    }

    let labels: Vec<_> = api
        .get_transactions()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(labels, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn test_update_transaction_keeps_embeds() {
    let (api, _) = setup();
    let account = seed_account(&api, "Card", 0.0).await;
    let draft = TransactionDraft::new(TransactionKind::Expense, 12.0, "Lunch", date(2025, 3, 2))
        .from_account(&account.id);
    let created = api.create_transaction(&draft).await.unwrap();

    let patch = TransactionPatch {
        amount: Some(15.0),
        status: Some(TransactionStatus::Pending),
        ..TransactionPatch::default()
    };
    let updated = api.update_transaction(&created.id, &patch).await.unwrap();

    assert_eq!(updated.amount, 15.0);
    assert_eq!(updated.status, TransactionStatus::Pending);
    assert_eq!(updated.from_account.map(|a| a.name), Some("Card".to_string()));
}

#[tokio::test]
async fn test_delete_transaction_is_hard() {
    let (api, store) = setup();
    let draft = TransactionDraft::new(TransactionKind::Expense, 1.0, "Gum", date(2025, 3, 2));
    let created = api.create_transaction(&draft).await.unwrap();

    api.delete_transaction(&created.id).await.unwrap();

    assert_eq!(store.row_count("transactions").await, 0);
    assert!(api.get_transaction(&created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_subscriptions_only_include_subscription_type() {
    let (api, _) = setup();
    let schedule = SubscriptionTerms {
        repeats: Some(Frequency::Monthly),
        repeats_every: Some(1),
        ends: Some(Ends::Never),
        ..SubscriptionTerms::default()
    };
    let music = TransactionDraft::new(TransactionKind::Subscription, 9.99, "Music", date(2025, 1, 5))
        .schedule(schedule.clone());
    api.create_transaction(&music).await.unwrap();
    let lunch = TransactionDraft::new(TransactionKind::Expense, 8.0, "Lunch", date(2025, 1, 6));
    api.create_transaction(&lunch).await.unwrap();

    let subscriptions = api.get_subscriptions().await.unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].description, "Music");
    assert_eq!(subscriptions[0].schedule, schedule);
}

// ========================
// Soft-deleted tables
// ========================

#[tokio::test]
async fn test_soft_delete_saving_goal_keeps_row() {
    let (api, store) = setup();
    let goal = api
        .create_saving_goal(&NewSavingGoal::new("Car", 5000.0))
        .await
        .unwrap();

    api.delete_saving_goal(&goal.id).await.unwrap();

    assert!(api.get_saving_goals().await.unwrap().is_empty());
    let row = store.get_by_id("saving_goals", &goal.id).await.unwrap();
    assert_eq!(row["is_active"], false);

    let archived = api.get_savings().await.unwrap();
    assert_eq!(archived.len(), 1);
    assert!(!archived[0].is_active);
}

#[tokio::test]
async fn test_soft_delete_unknown_id_is_noop() {
    let (api, _) = setup();

    api.delete_wishlist_item("missing").await.unwrap();
    api.delete_budget("missing").await.unwrap();
}

#[tokio::test]
async fn test_saving_goals_ranked_by_priority_level() {
    let (api, _) = setup();
    let goals = [
        NewSavingGoal::new("Low", 10.0).priority(Priority::Low),
        NewSavingGoal::new("High later", 10.0)
            .priority(Priority::High)
            .target_date(date(2026, 6, 1)),
        NewSavingGoal::new("Medium", 10.0).priority(Priority::Medium),
        NewSavingGoal::new("High soon", 10.0)
            .priority(Priority::High)
            .target_date(date(2025, 6, 1)),
    ];
    for goal in &goals {
        api.create_saving_goal(goal).await.unwrap();
    }

    let names: Vec<_> = api
        .get_saving_goals()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["High soon", "High later", "Medium", "Low"]);
}

#[tokio::test]
async fn test_wishlist_soft_delete_and_progress() {
    let (api, store) = setup();
    let item = api
        .create_wishlist_item(&NewWishlistItem::new("Bike", 400.0, WishlistCategory::Vehicle))
        .await
        .unwrap();
    let patch = WishlistPatch {
        saved_amount: Some(100.0),
        ..WishlistPatch::default()
    };
    let item = api.update_wishlist_item(&item.id, &patch).await.unwrap();
    assert_eq!(item.progress(), 25.0);

    api.delete_wishlist_item(&item.id).await.unwrap();

    assert!(api.get_wishlist_items().await.unwrap().is_empty());
    assert_eq!(store.row_count("wishlist_items").await, 1);
}

#[tokio::test]
async fn test_budgets_join_category_and_soft_delete() {
    let (api, _) = setup();
    let food = seed_category(&api, "Food", CategoryKind::Expense).await;
    let older = api
        .create_budget(&NewBudget::new(&food.id, 300.0, date(2025, 1, 1)))
        .await
        .unwrap();
    let newer = api
        .create_budget(&NewBudget::new(&food.id, 350.0, date(2025, 2, 1)))
        .await
        .unwrap();

    let budgets = api.get_budgets().await.unwrap();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].id, newer.id);
    assert_eq!(budgets[0].category.as_ref().map(|c| c.name.as_str()), Some("Food"));

    api.delete_budget(&older.id).await.unwrap();
    let budgets = api.get_budgets().await.unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(api.get_budget(&older.id).await.unwrap().is_active, false);
}

#[tokio::test]
async fn test_recurring_templates_soonest_first() {
    let (api, _) = setup();
    let rent = NewRecurringTransaction::new(
        TransactionKind::Expense,
        900.0,
        "Rent",
        Frequency::Monthly,
        date(2025, 4, 1),
    );
    let gym = NewRecurringTransaction::new(
        TransactionKind::Expense,
        30.0,
        "Gym",
        Frequency::Monthly,
        date(2025, 3, 15),
    );
    api.create_recurring_transaction(&rent).await.unwrap();
    let gym = api.create_recurring_transaction(&gym).await.unwrap();

    let names: Vec<_> = api
        .get_recurring_transactions()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.description)
        .collect();
    assert_eq!(names, vec!["Gym", "Rent"]);

    api.delete_recurring_transaction(&gym.id).await.unwrap();
    assert_eq!(api.get_recurring_transactions().await.unwrap().len(), 1);
}

// ========================
// Saving contributions
// ========================

#[tokio::test]
async fn test_record_saving_increments_goal() {
    let (api, _) = setup();
    let savings = seed_category(&api, "Savings", CategoryKind::Saving).await;
    let goal = api
        .create_saving_goal(&NewSavingGoal::new("Holiday", 1000.0))
        .await
        .unwrap();

    let draft = TransactionDraft::new(TransactionKind::Expense, 200.0, "Set aside", date(2025, 3, 3));
    let contribution = api.record_saving(draft, &goal.id).await.unwrap();

    assert_eq!(contribution.goal.current_amount, 200.0);
    assert_eq!(contribution.goal.progress(), 20.0);
    assert_eq!(contribution.transaction.kind, TransactionKind::Saving);
    assert_eq!(contribution.transaction.saving_goal_id.as_deref(), Some(goal.id.as_str()));
    assert_eq!(contribution.transaction.category_id, Some(savings.id));
    assert_eq!(api.get_saving_goal(&goal.id).await.unwrap().current_amount, 200.0);
}

#[tokio::test]
async fn test_record_saving_reads_fresh_goal_amount() {
    let (api, _) = setup();
    let goal = api
        .create_saving_goal(&NewSavingGoal::new("Holiday", 1000.0))
        .await
        .unwrap();

    for _ in 0..2 {
        let draft = TransactionDraft::new(TransactionKind::Saving, 150.0, "Set aside", date(2025, 3, 3));
        api.record_saving(draft, &goal.id).await.unwrap();
    }

    assert_eq!(api.get_saving_goal(&goal.id).await.unwrap().current_amount, 300.0);
}

#[tokio::test]
async fn test_record_saving_unknown_goal_writes_nothing() {
    let (api, store) = setup();

    let draft = TransactionDraft::new(TransactionKind::Saving, 10.0, "Set aside", date(2025, 3, 3));
    let err = api.record_saving(draft, "missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.row_count("transactions").await, 0);
}

#[tokio::test]
async fn test_record_saving_rolls_back_transaction_when_goal_update_fails() {
    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(),
        failing_table: "saving_goals",
        fail: AtomicBool::new(false),
    });
    let api = Api::new(store.clone(), Session::new(OWNER));
    let goal = api
        .create_saving_goal(&NewSavingGoal::new("Holiday", 1000.0))
        .await
        .unwrap();
    store.fail.store(true, Ordering::SeqCst);

    let draft = TransactionDraft::new(TransactionKind::Saving, 200.0, "Set aside", date(2025, 3, 3));
    let err = api.record_saving(draft, &goal.id).await.unwrap_err();

    assert!(matches!(err, ApiError::Remote(_)));
    assert_eq!(store.inner.row_count("transactions").await, 0);
    assert_eq!(api.get_saving_goal(&goal.id).await.unwrap().current_amount, 0.0);
}

// ========================
// Settings
// ========================

#[tokio::test]
async fn test_settings_absent_until_written() {
    let (api, _) = setup();

    assert_eq!(api.get_settings().await.unwrap(), None);

    api.update_dark_mode(true).await.unwrap();
    assert_eq!(
        api.get_settings().await.unwrap(),
        Some(Settings { dark_mode: true })
    );

    api.update_dark_mode(false).await.unwrap();
    assert_eq!(
        api.get_settings().await.unwrap(),
        Some(Settings { dark_mode: false })
    );
}
