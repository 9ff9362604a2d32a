//! Account Entity
//!
//! A bank card or cash account. The balance is a manually maintained figure;
//! transactions never recompute it.

use serde::{Deserialize, Serialize};

use super::entity::{default_true, Entity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Card network or account kind, e.g. "visa"
    #[serde(rename = "type")]
    pub kind: String,
    pub balance: f64,
    pub currency: String,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(rename = "fromColor", default)]
    pub from_color: Option<String>,
    #[serde(rename = "toColor", default)]
    pub to_color: Option<String>,
    #[serde(rename = "gradientDirection", default)]
    pub gradient_direction: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Entity for Account {
    const TABLE: &'static str = "accounts";
    const SOFT_DELETE: bool = false;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Insert payload; `user_id` is stamped by the facade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub balance: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(rename = "fromColor", skip_serializing_if = "Option::is_none")]
    pub from_color: Option<String>,
    #[serde(rename = "toColor", skip_serializing_if = "Option::is_none")]
    pub to_color: Option<String>,
    #[serde(rename = "gradientDirection", skip_serializing_if = "Option::is_none")]
    pub gradient_direction: Option<String>,
    pub is_active: bool,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, balance: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            balance,
            currency: "USD".to_string(),
            account_number: None,
            bank_name: None,
            expiry: None,
            from_color: None,
            to_color: None,
            gradient_direction: None,
            is_active: true,
        }
    }

    pub fn with_bank(mut self, bank_name: impl Into<String>) -> Self {
        self.bank_name = Some(bank_name.into());
        self
    }

    pub fn with_gradient(mut self, from: &str, to: &str, direction: &str) -> Self {
        self.from_color = Some(from.to_string());
        self.to_color = Some(to.to_string());
        self.gradient_direction = Some(direction.to_string());
        self
    }
}

/// Partial update; only `Some` fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(rename = "fromColor", skip_serializing_if = "Option::is_none")]
    pub from_color: Option<String>,
    #[serde(rename = "toColor", skip_serializing_if = "Option::is_none")]
    pub to_color: Option<String>,
    #[serde(rename = "gradientDirection", skip_serializing_if = "Option::is_none")]
    pub gradient_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
