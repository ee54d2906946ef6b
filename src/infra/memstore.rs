//! In-memory document store backing every repository trait.
//!
//! Documents live in process-local collections behind one async lock.
//! An optional JSON seed file fills the store at startup so a fresh
//! process serves real content immediately; without one the store
//! starts empty and fills through the write API.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, HeroImageRepo, MenuItemsRepo,
    RepoError,
};
use crate::domain::entities::{CategoryRecord, HeroImageRecord, MenuItemRecord};
use crate::infra::error::InfraError;

/// On-disk seed document, deserialized from JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSeed {
    pub categories: Vec<CategoryRecord>,
    pub menu_items: Vec<MenuItemRecord>,
    pub hero_image: Option<HeroImageRecord>,
}

#[derive(Default)]
struct StoreInner {
    categories: Vec<CategoryRecord>,
    menu_items: Vec<MenuItemRecord>,
    hero_image: Option<HeroImageRecord>,
}

pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    pub fn with_seed(seed: StoreSeed) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                categories: seed.categories,
                menu_items: seed.menu_items,
                hero_image: seed.hero_image,
            }),
        }
    }

    /// Read and apply a JSON seed file.
    pub async fn from_seed_file(path: &Path) -> Result<Self, InfraError> {
        let raw = tokio::fs::read(path).await?;
        let seed: StoreSeed = serde_json::from_slice(&raw).map_err(|err| {
            InfraError::store(format!("seed file `{}` is invalid: {err}", path.display()))
        })?;

        info!(
            target = "piatto::store",
            categories = seed.categories.len(),
            menu_items = seed.menu_items.len(),
            hero_image = seed.hero_image.is_some(),
            seed = %path.display(),
            "Seeded in-memory store"
        );

        Ok(Self::with_seed(seed))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoriesRepo for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.categories.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned())
    }
}

#[async_trait]
impl CategoriesWriteRepo for MemoryStore {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut inner = self.inner.write().await;

        let id = params
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if inner.categories.iter().any(|category| category.id == id) {
            return Err(RepoError::duplicate("categories.id"));
        }

        let now = OffsetDateTime::now_utc();
        let record = CategoryRecord {
            id,
            name: params.name,
            description: params.description,
            color: params.color,
            order: params.order,
            active: params.active,
            subcategories: params.subcategories,
            created_at: now,
            updated_at: now,
        };
        inner.categories.push(record.clone());
        Ok(record)
    }

    async fn update_category(&self, record: CategoryRecord) -> Result<CategoryRecord, RepoError> {
        let mut inner = self.inner.write().await;

        let slot = inner
            .categories
            .iter_mut()
            .find(|category| category.id == record.id)
            .ok_or(RepoError::NotFound)?;
        *slot = record.clone();
        Ok(record)
    }

    async fn soft_delete_category(&self, id: &str) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;

        let slot = inner
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or(RepoError::NotFound)?;
        slot.active = false;
        slot.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }
}

#[async_trait]
impl MenuItemsRepo for MemoryStore {
    async fn list_items(&self) -> Result<Vec<MenuItemRecord>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.menu_items.clone())
    }
}

#[async_trait]
impl HeroImageRepo for MemoryStore {
    async fn load_hero_image(&self) -> Result<Option<HeroImageRecord>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.hero_image.clone())
    }

    async fn store_hero_image(
        &self,
        record: HeroImageRecord,
    ) -> Result<HeroImageRecord, RepoError> {
        let mut inner = self.inner.write().await;
        inner.hero_image = Some(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(id: Option<&str>, name: &str) -> CreateCategoryParams {
        CreateCategoryParams {
            id: id.map(str::to_string),
            name: name.to_string(),
            description: None,
            color: None,
            order: None,
            active: true,
            subcategories: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_mints_an_id_when_none_is_given() {
        let store = MemoryStore::new();
        let record = store.create_category(params(None, "Pizza")).await.unwrap();
        assert!(!record.id.is_empty());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn explicit_duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        store
            .create_category(params(Some("pizza"), "Pizza"))
            .await
            .unwrap();

        let err = store
            .create_category(params(Some("pizza"), "Pizza again"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn update_of_unknown_document_is_not_found() {
        let store = MemoryStore::new();
        let record = store.create_category(params(None, "Pizza")).await.unwrap();

        let ghost = CategoryRecord {
            id: "ghost".to_string(),
            ..record
        };
        let err = store.update_category(ghost).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn soft_delete_keeps_the_document() {
        let store = MemoryStore::new();
        store
            .create_category(params(Some("pizza"), "Pizza"))
            .await
            .unwrap();

        store.soft_delete_category("pizza").await.unwrap();

        let stored = store.find_by_id("pizza").await.unwrap().unwrap();
        assert!(!stored.active);
        assert!(stored.updated_at >= stored.created_at);
    }

    #[test]
    fn seed_document_parses_with_sparse_fields() {
        let seed: StoreSeed = serde_json::from_str(
            r#"{
                "categories": [{
                    "id": "pizza",
                    "name": "Pizza",
                    "subcategories": [{"id": "classic", "name": "Classic"}],
                    "active": true,
                    "createdAt": "2025-03-01T12:00:00Z",
                    "updatedAt": "2025-03-01T12:00:00Z"
                }],
                "menuItems": [{"id": "margherita", "name": "Margherita", "category": "pizza-classic", "price": 9.5}]
            }"#,
        )
        .unwrap();

        assert_eq!(seed.categories.len(), 1);
        assert_eq!(seed.menu_items.len(), 1);
        assert!(seed.hero_image.is_none());
        assert!(seed.menu_items[0].extra.contains_key("price"));
    }
}
