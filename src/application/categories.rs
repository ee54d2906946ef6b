//! Category catalog service.
//!
//! All mutations rewrite the whole category document and drop the
//! `categories` cache entry afterwards, so the next read observes the
//! write. Subcategory operations are expressed as whole-document
//! updates as well; there is no per-subcategory storage.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError,
};
use crate::cache::{CATEGORIES_CACHE, CacheRegistry};
use crate::domain::categories::{
    CategoryDraft, CategoryUpdate, SubcategoryDraft, SubcategoryUpdate, sort_for_display,
};
use crate::domain::entities::{CategoryRecord, SubcategoryRecord};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("category not found")]
    CategoryNotFound,
    #[error("subcategory not found")]
    SubcategoryNotFound,
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct CategoryService {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
    caches: Arc<CacheRegistry>,
}

impl CategoryService {
    pub fn new(
        reader: Arc<dyn CategoriesRepo>,
        writer: Arc<dyn CategoriesWriteRepo>,
        caches: Arc<CacheRegistry>,
    ) -> Self {
        Self {
            reader,
            writer,
            caches,
        }
    }

    /// Every category, active and inactive, sorted for display.
    ///
    /// Served from the `categories` cache while the entry is fresh.
    pub async fn list(&self) -> Result<Vec<CategoryRecord>, CategoryError> {
        if let Some(cached) = self.caches.get_json::<Vec<CategoryRecord>>(CATEGORIES_CACHE) {
            return Ok(cached);
        }

        let mut categories = self.reader.list_categories().await?;
        sort_for_display(&mut categories);
        self.caches.set_json(CATEGORIES_CACHE, &categories);
        Ok(categories)
    }

    /// Fetch one category straight from the store, bypassing the cache.
    pub async fn get(&self, id: &str) -> Result<CategoryRecord, CategoryError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::CategoryNotFound)
    }

    /// Create a category. New categories always come out active; drafts
    /// cannot create a category in the deactivated state.
    pub async fn create(&self, draft: CategoryDraft) -> Result<CategoryRecord, CategoryError> {
        ensure_non_empty(&draft.name, "name")?;
        if let Some(id) = &draft.id {
            ensure_non_empty(id, "id")?;
        }

        let params = CreateCategoryParams {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            color: draft.color,
            order: draft.order,
            active: true,
            subcategories: draft
                .subcategories
                .into_iter()
                .map(SubcategoryDraft::into_record)
                .collect(),
        };

        let category = self.writer.create_category(params).await?;
        self.caches.clear(CATEGORIES_CACHE);
        Ok(category)
    }

    /// Apply a partial update. Fields the update is silent on keep their
    /// stored values; in particular an update without `subcategories`
    /// preserves the stored list in full.
    pub async fn update(
        &self,
        id: &str,
        update: CategoryUpdate,
    ) -> Result<CategoryRecord, CategoryError> {
        if let Some(name) = &update.name {
            ensure_non_empty(name, "name")?;
        }

        let existing = self.get(id).await?;
        let merged = update.merge_into(&existing, OffsetDateTime::now_utc());
        let stored = self.writer.update_category(merged).await?;
        self.caches.clear(CATEGORIES_CACHE);
        Ok(stored)
    }

    /// Soft delete: the document survives, flagged inactive.
    pub async fn delete(&self, id: &str) -> Result<(), CategoryError> {
        match self.writer.soft_delete_category(id).await {
            Ok(()) => {
                self.caches.clear(CATEGORIES_CACHE);
                Ok(())
            }
            Err(RepoError::NotFound) => Err(CategoryError::CategoryNotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Append a subcategory, minting an id when the draft carries none
    /// and defaulting the display order to the end of the current list.
    /// Appended subcategories always come out active.
    pub async fn add_subcategory(
        &self,
        category_id: &str,
        draft: SubcategoryDraft,
    ) -> Result<CategoryRecord, CategoryError> {
        ensure_non_empty(&draft.name, "name")?;

        let existing = self.get(category_id).await?;
        let mut subcategories = existing.subcategories.clone();
        let order = draft
            .order
            .unwrap_or_else(|| next_order(&subcategories));
        let record = SubcategoryRecord {
            order: Some(order),
            active: true,
            ..draft.into_record()
        };
        subcategories.push(record);

        self.store_subcategories(existing, subcategories).await
    }

    /// Rewrite one subcategory in place. Unknown subcategory ids are an
    /// error here, unlike removal.
    pub async fn update_subcategory(
        &self,
        category_id: &str,
        subcategory_id: &str,
        update: SubcategoryUpdate,
    ) -> Result<CategoryRecord, CategoryError> {
        if let Some(name) = &update.name {
            ensure_non_empty(name, "name")?;
        }

        let existing = self.get(category_id).await?;
        let mut subcategories = existing.subcategories.clone();
        let slot = subcategories
            .iter_mut()
            .find(|subcategory| subcategory.id == subcategory_id)
            .ok_or(CategoryError::SubcategoryNotFound)?;
        update.apply(slot);

        self.store_subcategories(existing, subcategories).await
    }

    /// Drop a subcategory by id. Removing an id that was never there is
    /// not an error: the document is written back unchanged and the
    /// cache entry still drops.
    pub async fn remove_subcategory(
        &self,
        category_id: &str,
        subcategory_id: &str,
    ) -> Result<CategoryRecord, CategoryError> {
        let existing = self.get(category_id).await?;
        let mut subcategories = existing.subcategories.clone();
        subcategories.retain(|subcategory| subcategory.id != subcategory_id);

        self.store_subcategories(existing, subcategories).await
    }

    async fn store_subcategories(
        &self,
        existing: CategoryRecord,
        subcategories: Vec<SubcategoryRecord>,
    ) -> Result<CategoryRecord, CategoryError> {
        let merged = CategoryRecord {
            subcategories,
            updated_at: OffsetDateTime::now_utc(),
            ..existing
        };
        let stored = self.writer.update_category(merged).await?;
        self.caches.clear(CATEGORIES_CACHE);
        Ok(stored)
    }
}

fn next_order(subcategories: &[SubcategoryRecord]) -> i32 {
    subcategories.len() as i32 + 1
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), CategoryError> {
    if value.trim().is_empty() {
        return Err(CategoryError::ConstraintViolation(field));
    }
    Ok(())
}
