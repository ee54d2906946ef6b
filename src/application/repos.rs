//! Repository traits the application layer depends on.
//!
//! Adapters live under [`crate::infra`]; services only ever see these
//! traits behind an `Arc`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    CategoryRecord, HeroImageRecord, MenuItemRecord, SubcategoryRecord,
};

/// Failures surfaced by repository adapters.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }
}

/// Input for creating a category document.
///
/// The adapter mints an id when `id` is `None` and stamps both
/// timestamps on the stored record.
#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub order: Option<i32>,
    pub active: bool,
    pub subcategories: Vec<SubcategoryRecord>,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// Every category document, active or not, in store order.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    /// Replace the stored document wholesale with `record`.
    ///
    /// Returns [`RepoError::NotFound`] when no document carries the
    /// record's id.
    async fn update_category(&self, record: CategoryRecord) -> Result<CategoryRecord, RepoError>;

    /// Flip the document inactive and stamp `updatedAt`. The document
    /// itself survives.
    async fn soft_delete_category(&self, id: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait MenuItemsRepo: Send + Sync {
    async fn list_items(&self) -> Result<Vec<MenuItemRecord>, RepoError>;
}

#[async_trait]
pub trait HeroImageRepo: Send + Sync {
    /// The singleton hero document, if one was ever written.
    async fn load_hero_image(&self) -> Result<Option<HeroImageRecord>, RepoError>;

    async fn store_hero_image(
        &self,
        record: HeroImageRecord,
    ) -> Result<HeroImageRecord, RepoError>;
}
