//! Wishlist Commands

use super::Api;
use crate::error::ApiResult;
use crate::models::{NewWishlistItem, WishlistItem, WishlistPatch};

impl Api {
    /// Active items, highest priority first, then nearest target date
    pub async fn get_wishlist_items(&self) -> ApiResult<Vec<WishlistItem>> {
        let mut items: Vec<WishlistItem> = self
            .list_rows(self.active().desc("priority").asc("target_date"))
            .await?;
        items.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(items)
    }

    pub async fn get_wishlist_item(&self, id: &str) -> ApiResult<WishlistItem> {
        self.fetch(id).await
    }

    pub async fn create_wishlist_item(&self, item: &NewWishlistItem) -> ApiResult<WishlistItem> {
        self.insert_owned(item).await
    }

    pub async fn update_wishlist_item(
        &self,
        id: &str,
        patch: &WishlistPatch,
    ) -> ApiResult<WishlistItem> {
        self.patch(id, patch).await
    }

    pub async fn delete_wishlist_item(&self, id: &str) -> ApiResult<()> {
        self.remove::<WishlistItem>(id).await
    }
}
