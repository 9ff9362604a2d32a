//! LedgerDash
//!
//! Data layer of a personal-finance dashboard:
//! - commands: typed async facade over a hosted table store
//! - query: keyed fetch state with stale-response protection
//! - recurrence: subscription schedules and recurring-template execution
//! - analytics: aggregations behind the dashboard charts
//! - filter: client-side narrowing of transaction lists

pub mod analytics;
pub mod commands;
pub mod config;
pub mod context;
pub mod demo;
pub mod error;
pub mod filter;
pub mod models;
pub mod query;
pub mod recurrence;

pub use commands::{Api, SavingContribution};
pub use config::{AppConfig, ConfigError, StoreSettings};
pub use context::Session;
pub use error::{ApiError, ApiResult, FieldError};
pub use query::{Query, QueryOptions, QuerySnapshot, QueryStatus};
