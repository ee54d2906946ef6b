//! Read-only diagnostics over the category hierarchy.
//!
//! Both reports take one coherent `(categories, items)` snapshot through
//! the cached list services, so a report never mixes data from two
//! different points in time unless the caches themselves disagree.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::application::categories::{CategoryError, CategoryService};
use crate::application::menu::{MenuError, MenuService};
use crate::domain::categories::{KeyScope, ValidKeySet, composite_key, display_bucket};
use crate::domain::entities::{CategoryRecord, MenuItemRecord};

/// Slim item view used in diagnostic payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&MenuItemRecord> for ItemSummary {
    fn from(item: &MenuItemRecord) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedItem {
    pub id: String,
    pub name: String,
    pub current_category: String,
}

/// Orphan scan over a hierarchy snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanReport {
    pub total_items: usize,
    pub total_categories: usize,
    pub valid_category_keys: Vec<String>,
    pub orphaned_items: Vec<OrphanedItem>,
    pub suggestions: Vec<&'static str>,
}

const ORPHAN_SUGGESTIONS: [&str; 3] = [
    "Orphaned items reference category keys the hierarchy no longer contains",
    "Reassign each item to a valid categoryId-subcategoryId key",
    "Or recreate the missing category and subcategory so the key resolves again",
];

/// Classify every item against the valid key set.
pub fn orphan_report(
    categories: &[CategoryRecord],
    items: &[MenuItemRecord],
    scope: KeyScope,
) -> OrphanReport {
    let keys = ValidKeySet::build(categories, scope);
    let orphaned_items: Vec<OrphanedItem> = items
        .iter()
        .filter(|item| keys.is_orphaned(item))
        .map(|item| OrphanedItem {
            id: item.id.clone(),
            name: item.name.clone(),
            current_category: item.category.clone().unwrap_or_default(),
        })
        .collect();

    let suggestions = if orphaned_items.is_empty() {
        Vec::new()
    } else {
        ORPHAN_SUGGESTIONS.to_vec()
    };

    OrphanReport {
        total_items: items.len(),
        total_categories: categories.len(),
        valid_category_keys: keys.sorted_keys(),
        orphaned_items,
        suggestions,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryStructure {
    pub id: String,
    pub name: String,
    /// Composite key items use to point here.
    pub key: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStructure {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    pub subcategories: Vec<SubcategoryStructure>,
}

/// The whole hierarchy with per-key item counts, plus the grouped item
/// listing the storefront would render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuStructureReport {
    pub total_categories: usize,
    pub total_menu_items: usize,
    pub categories: Vec<CategoryStructure>,
    pub items_by_category: BTreeMap<String, Vec<ItemSummary>>,
    pub orphaned_items: Vec<ItemSummary>,
}

/// Bucket items by their display key, sentinel bucket included.
pub fn group_items(items: &[MenuItemRecord]) -> BTreeMap<String, Vec<ItemSummary>> {
    let mut grouped: BTreeMap<String, Vec<ItemSummary>> = BTreeMap::new();
    for item in items {
        grouped
            .entry(display_bucket(item).to_string())
            .or_default()
            .push(ItemSummary::from(item));
    }
    grouped
}

pub fn menu_structure_report(
    categories: &[CategoryRecord],
    items: &[MenuItemRecord],
) -> MenuStructureReport {
    let grouped = group_items(items);
    let keys = ValidKeySet::build(categories, KeyScope::All);

    let category_views = categories
        .iter()
        .map(|category| CategoryStructure {
            id: category.id.clone(),
            name: category.name.clone(),
            order: category.order,
            subcategories: category
                .subcategories
                .iter()
                .map(|subcategory| {
                    let key = composite_key(&category.id, &subcategory.id);
                    let item_count = grouped.get(&key).map_or(0, Vec::len);
                    SubcategoryStructure {
                        id: subcategory.id.clone(),
                        name: subcategory.name.clone(),
                        key,
                        item_count,
                    }
                })
                .collect(),
        })
        .collect();

    let orphaned_items = items
        .iter()
        .filter(|item| keys.is_orphaned(item))
        .map(ItemSummary::from)
        .collect();

    MenuStructureReport {
        total_categories: categories.len(),
        total_menu_items: items.len(),
        categories: category_views,
        items_by_category: grouped,
        orphaned_items,
    }
}

#[derive(Debug, Error)]
pub enum ConsistencyError {
    #[error(transparent)]
    Categories(#[from] CategoryError),
    #[error(transparent)]
    Menu(#[from] MenuError),
}

/// Assembles hierarchy diagnostics from the cached list services.
#[derive(Clone)]
pub struct ConsistencyService {
    categories: Arc<CategoryService>,
    menu: Arc<MenuService>,
}

impl ConsistencyService {
    pub fn new(categories: Arc<CategoryService>, menu: Arc<MenuService>) -> Self {
        Self { categories, menu }
    }

    pub async fn orphan_report(&self, scope: KeyScope) -> Result<OrphanReport, ConsistencyError> {
        let categories = self.categories.list().await?;
        let items = self.menu.list().await?;
        Ok(orphan_report(&categories, &items, scope))
    }

    pub async fn menu_structure(&self) -> Result<MenuStructureReport, ConsistencyError> {
        let categories = self.categories.list().await?;
        let items = self.menu.list().await?;
        Ok(menu_structure_report(&categories, &items))
    }
}
