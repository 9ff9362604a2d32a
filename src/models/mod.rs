//! Models
//!
//! Typed rows for every table, plus the create and patch payloads.

mod entity;
mod account;
mod category;
mod transaction;
mod saving_goal;
mod wishlist;
mod budget;
mod recurring;
mod settings;

pub use entity::{from_row, to_row, Entity};
pub use account::{Account, AccountPatch, NewAccount};
pub use category::{Category, CategoryKind, CategoryPatch, CategoryRef, NewCategory};
pub use transaction::{
    AccountRef, Ends, Frequency, SubscriptionTerms, Transaction, TransactionDraft,
    TransactionKind, TransactionPatch, TransactionStatus,
};
pub use saving_goal::{NewSavingGoal, Priority, SavingGoal, SavingGoalPatch};
pub use wishlist::{NewWishlistItem, WishlistCategory, WishlistItem, WishlistPatch};
pub use budget::{Budget, BudgetPatch, BudgetPeriod, NewBudget};
pub use recurring::{NewRecurringTransaction, RecurringPatch, RecurringTransaction};
pub use settings::{Settings, SETTINGS_ID};
