//! Settings Commands

use ledger_store::Row;
use serde_json::Value;

use super::Api;
use crate::error::ApiResult;
use crate::models::{from_row, Settings, SETTINGS_ID};

const TABLE: &str = "settings";

impl Api {
    /// The shared settings row, `None` before it was ever written
    pub async fn get_settings(&self) -> ApiResult<Option<Settings>> {
        match self.store.get_by_id(TABLE, SETTINGS_ID).await {
            Ok(row) => Ok(Some(from_row(row)?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Persist the theme flag, creating the row on first use
    pub async fn update_dark_mode(&self, enabled: bool) -> ApiResult<()> {
        let mut patch = Row::new();
        patch.insert("darkMode".into(), Value::Bool(enabled));

        match self.store.update(TABLE, SETTINGS_ID, patch.clone()).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                patch.insert("id".into(), Value::from(1));
                self.store.insert(TABLE, patch).await?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
