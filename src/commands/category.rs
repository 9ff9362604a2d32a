//! Category Commands

use super::Api;
use crate::error::ApiResult;
use crate::models::{Category, CategoryPatch, NewCategory};

impl Api {
    /// Owner's categories grouped by type, then alphabetical
    pub async fn get_categories(&self) -> ApiResult<Vec<Category>> {
        self.list_rows(self.owned().asc("type").asc("name")).await
    }

    pub async fn get_category(&self, id: &str) -> ApiResult<Category> {
        self.fetch(id).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> ApiResult<Category> {
        self.insert_owned(category).await
    }

    pub async fn update_category(&self, id: &str, patch: &CategoryPatch) -> ApiResult<Category> {
        self.patch(id, patch).await
    }

    pub async fn delete_category(&self, id: &str) -> ApiResult<()> {
        self.remove::<Category>(id).await
    }

    /// Case-insensitive lookup by name among the owner's categories
    pub async fn find_category_by_name(&self, name: &str) -> ApiResult<Option<Category>> {
        let categories = self.get_categories().await?;
        Ok(categories
            .into_iter()
            .find(|category| category.name.eq_ignore_ascii_case(name)))
    }
}
