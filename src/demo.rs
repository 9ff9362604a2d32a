//! Demo Data
//!
//! Seeds a fresh store with a few months of plausible activity, dated
//! relative to `today`.

use chrono::{Datelike, Months, NaiveDate};

use crate::commands::Api;
use crate::error::ApiResult;
use crate::models::{
    CategoryKind, Ends, Frequency, NewAccount, NewBudget, NewCategory, NewRecurringTransaction,
    NewSavingGoal, NewWishlistItem, Priority, SubscriptionTerms, TransactionDraft,
    TransactionKind, WishlistCategory,
};

/// Monthly one-off expenses: (day of month, description, amount)
const GROCERIES: &[(u32, &str, f64)] = &[
    (3, "Farmers market", 42.80),
    (11, "Supermarket", 96.35),
    (19, "Bakery", 12.40),
    (26, "Supermarket", 88.10),
];

const MONTHS_OF_HISTORY: u32 = 3;

fn month_day(month_start: NaiveDate, day: u32) -> NaiveDate {
    month_start.with_day(day).unwrap_or(month_start)
}

pub async fn seed(api: &Api, today: NaiveDate) -> ApiResult<()> {
    let main = api
        .create_account(
            &NewAccount::new("Everyday", "visa", 2450.0)
                .with_bank("First Bank")
                .with_gradient("#9d174d", "#2e1065", "to right"),
        )
        .await?;
    let reserve = api
        .create_account(&NewAccount::new("Reserve", "mastercard", 8200.0).with_bank("First Bank"))
        .await?;

    let salary = api
        .create_category(&NewCategory::new("Salary", CategoryKind::Income).with_style("#16A34A", "briefcase"))
        .await?;
    let food = api
        .create_category(
            &NewCategory::new("Food", CategoryKind::Expense)
                .with_style("#F97316", "utensils")
                .with_budget(400.0),
        )
        .await?;
    let rent = api
        .create_category(&NewCategory::new("Rent", CategoryKind::Expense).with_style("#6366F1", "home"))
        .await?;
    let streaming = api
        .create_category(
            &NewCategory::new("Streaming", CategoryKind::Subscription).with_style("#DC2626", "tv"),
        )
        .await?;
    api.create_category(&NewCategory::new("Savings", CategoryKind::Saving).with_style("#0EA5E9", "piggy-bank"))
        .await?;

    let this_month = today.with_day(1).unwrap_or(today);
    for back in (0..MONTHS_OF_HISTORY).rev() {
        let Some(month_start) = this_month.checked_sub_months(Months::new(back)) else {
            continue;
        };

        let payday = month_day(month_start, 1);
        if payday <= today {
            let draft = TransactionDraft::new(TransactionKind::Income, 4200.0, "Monthly salary", payday)
                .to_account(&main.id)
                .category(&salary.id);
            api.create_transaction(&draft).await?;

            let draft = TransactionDraft::new(TransactionKind::Expense, 1350.0, "Apartment rent", payday)
                .from_account(&main.id)
                .category(&rent.id);
            api.create_transaction(&draft).await?;
        }

        for &(day, description, amount) in GROCERIES {
            let date = month_day(month_start, day);
            if date > today {
                continue;
            }
            let draft = TransactionDraft::new(TransactionKind::Expense, amount, description, date)
                .from_account(&main.id)
                .category(&food.id);
            api.create_transaction(&draft).await?;
        }
    }

    let first_payment = this_month
        .checked_sub_months(Months::new(MONTHS_OF_HISTORY - 1))
        .unwrap_or(this_month);
    let music = TransactionDraft::new(TransactionKind::Subscription, 10.99, "Music streaming", first_payment)
        .from_account(&main.id)
        .category(&streaming.id)
        .schedule(SubscriptionTerms {
            repeats: Some(Frequency::Monthly),
            repeats_every: Some(1),
            starts_on: Some(first_payment),
            ends: Some(Ends::Never),
            ..SubscriptionTerms::default()
        });
    api.create_transaction(&music).await?;

    let transfer = TransactionDraft::new(TransactionKind::Transfer, 500.0, "Top up reserve", this_month)
        .from_account(&main.id)
        .to_account(&reserve.id)
        .category(&salary.id);
    api.create_transaction(&transfer).await?;

    let holiday = api
        .create_saving_goal(
            &NewSavingGoal::new("Summer holiday", 3000.0)
                .priority(Priority::High)
                .target_date(NaiveDate::from_ymd_opt(today.year() + 1, 6, 1).unwrap_or(today)),
        )
        .await?;
    api.create_saving_goal(&NewSavingGoal::new("Emergency fund", 10000.0).priority(Priority::Medium))
        .await?;
    let contribution = TransactionDraft::new(TransactionKind::Saving, 250.0, "Holiday savings", this_month)
        .from_account(&main.id);
    api.record_saving(contribution, &holiday.id).await?;

    api.create_wishlist_item(
        &NewWishlistItem::new("Road bike", 1200.0, WishlistCategory::Vehicle).priority(Priority::High),
    )
    .await?;
    api.create_wishlist_item(&NewWishlistItem::new("Headphones", 250.0, WishlistCategory::Electronics))
        .await?;

    api.create_budget(&NewBudget::new(&food.id, 400.0, this_month)).await?;

    let next_month = this_month.checked_add_months(Months::new(1)).unwrap_or(this_month);
    api.create_recurring_transaction(
        &NewRecurringTransaction::new(
            TransactionKind::Expense,
            1350.0,
            "Apartment rent",
            Frequency::Monthly,
            next_month,
        )
        .from_account(&main.id)
        .category(&rent.id),
    )
    .await?;

    api.update_dark_mode(false).await?;
    tracing::info!(owner = api.session().user_id(), "seeded demo data");
    Ok(())
}
