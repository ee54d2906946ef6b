//! Menu item listing, read-through cached.
//!
//! Items are read-only here; they are authored elsewhere and consumed
//! by the storefront and the hierarchy diagnostics.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{MenuItemsRepo, RepoError};
use crate::cache::{CacheRegistry, MENU_ITEMS_CACHE};
use crate::domain::entities::MenuItemRecord;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct MenuService {
    items: Arc<dyn MenuItemsRepo>,
    caches: Arc<CacheRegistry>,
}

impl MenuService {
    pub fn new(items: Arc<dyn MenuItemsRepo>, caches: Arc<CacheRegistry>) -> Self {
        Self { items, caches }
    }

    /// Menu items in store order, served from the `menuItems` cache
    /// while the entry is fresh.
    pub async fn list(&self) -> Result<Vec<MenuItemRecord>, MenuError> {
        if let Some(cached) = self.caches.get_json::<Vec<MenuItemRecord>>(MENU_ITEMS_CACHE) {
            return Ok(cached);
        }

        let items = self.items.list_items().await?;
        self.caches.set_json(MENU_ITEMS_CACHE, &items);
        Ok(items)
    }
}
