//! Wishlist Entity
//!
//! Things the owner is saving towards, tracked separately from goals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::{default_true, Entity};
use super::saving_goal::Priority;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistCategory {
    Travel,
    Vehicle,
    Home,
    Electronics,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub estimated_cost: f64,
    #[serde(default)]
    pub saved_amount: f64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: WishlistCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl WishlistItem {
    pub fn progress(&self) -> f64 {
        if self.estimated_cost <= 0.0 {
            return 0.0;
        }
        (self.saved_amount / self.estimated_cost * 100.0).clamp(0.0, 100.0)
    }
}

impl Entity for WishlistItem {
    const TABLE: &'static str = "wishlist_items";
    const SOFT_DELETE: bool = true;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWishlistItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub estimated_cost: f64,
    pub saved_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub category: WishlistCategory,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl NewWishlistItem {
    pub fn new(name: impl Into<String>, estimated_cost: f64, category: WishlistCategory) -> Self {
        Self {
            name: name.into(),
            description: None,
            estimated_cost,
            saved_amount: 0.0,
            target_date: None,
            category,
            priority: Priority::Medium,
            image_url: None,
            is_active: true,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WishlistPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<WishlistCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
