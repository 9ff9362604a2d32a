//! Account Commands

use super::Api;
use crate::error::ApiResult;
use crate::models::{Account, AccountPatch, NewAccount};

impl Api {
    /// Owner's accounts, oldest first
    pub async fn get_accounts(&self) -> ApiResult<Vec<Account>> {
        self.list_rows(self.owned().asc("created_at")).await
    }

    pub async fn get_account(&self, id: &str) -> ApiResult<Account> {
        self.fetch(id).await
    }

    pub async fn create_account(&self, account: &NewAccount) -> ApiResult<Account> {
        self.insert_owned(account).await
    }

    pub async fn update_account(&self, id: &str, patch: &AccountPatch) -> ApiResult<Account> {
        self.patch(id, patch).await
    }

    pub async fn delete_account(&self, id: &str) -> ApiResult<()> {
        self.remove::<Account>(id).await
    }
}
