//! Category hierarchy rules: drafts, partial-update merging, and
//! composite-key validity.
//!
//! Menu items reference the hierarchy through one derived string, the
//! composite key `{categoryId}-{subcategoryId}`. Nothing enforces that
//! reference on write, so the validity checks here are how dangling keys
//! get found.

use std::collections::BTreeSet;

use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::entities::{CategoryRecord, MenuItemRecord, SubcategoryRecord};

/// Sentinel bucket for items that opted out of the hierarchy. Always
/// treated as valid.
pub const UNCATEGORIZED: &str = "Other";

/// Sort key assumed for categories whose document carries no order.
pub const UNORDERED_SORT_KEY: i32 = 999;

/// Derive the composite key tying a menu item to a subcategory.
pub fn composite_key(category_id: &str, subcategory_id: &str) -> String {
    format!("{category_id}-{subcategory_id}")
}

/// The bucket an item displays under: its composite key, or the sentinel
/// when it carries none.
pub fn display_bucket(item: &MenuItemRecord) -> &str {
    match item.category.as_deref() {
        None | Some("") => UNCATEGORIZED,
        Some(key) => key,
    }
}

/// Sort categories for display: ascending order, documents without one
/// last. Stable, so ties keep store order.
pub fn sort_for_display(categories: &mut [CategoryRecord]) {
    categories.sort_by_key(|category| category.order.unwrap_or(UNORDERED_SORT_KEY));
}

/// Input for creating a category. The store assigns an id when the draft
/// carries none.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryDraft {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub order: Option<i32>,
    pub subcategories: Vec<SubcategoryDraft>,
}

/// One subcategory as supplied by a client, either nested in a category
/// write or on its own through the append operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubcategoryDraft {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub active: Option<bool>,
}

impl SubcategoryDraft {
    /// Materialize into a record, minting an id when the draft has none.
    /// A draft silent on `active` comes out active.
    pub fn into_record(self) -> SubcategoryRecord {
        SubcategoryRecord {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            description: self.description,
            order: self.order,
            active: self.active.unwrap_or(true),
        }
    }
}

/// Partial update for a category. `None` means keep the stored value;
/// `id` and `createdAt` cannot be changed through an update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub order: Option<i32>,
    pub active: Option<bool>,
    pub subcategories: Option<Vec<SubcategoryDraft>>,
}

impl CategoryUpdate {
    /// Fold this update into `existing`.
    ///
    /// When `subcategories` is absent the stored list is preserved in
    /// full; when present it replaces the list wholesale, minting ids for
    /// entries that lack one.
    pub fn merge_into(self, existing: &CategoryRecord, now: OffsetDateTime) -> CategoryRecord {
        let subcategories = match self.subcategories {
            Some(drafts) => drafts
                .into_iter()
                .map(SubcategoryDraft::into_record)
                .collect(),
            None => existing.subcategories.clone(),
        };

        CategoryRecord {
            id: existing.id.clone(),
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            description: self.description.or_else(|| existing.description.clone()),
            color: self.color.or_else(|| existing.color.clone()),
            order: self.order.or(existing.order),
            active: self.active.unwrap_or(existing.active),
            subcategories,
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

/// Partial update for one subcategory; the id is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubcategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub active: Option<bool>,
}

impl SubcategoryUpdate {
    /// Fold this update into `record`, keeping fields it is silent on.
    pub fn apply(self, record: &mut SubcategoryRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(description) = self.description {
            record.description = Some(description);
        }
        if let Some(order) = self.order {
            record.order = Some(order);
        }
        if let Some(active) = self.active {
            record.active = active;
        }
    }
}

/// Which categories contribute keys to the valid set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Every stored category, soft-deleted ones included. Items tagged
    /// against a deactivated category are hidden, not orphaned.
    All,
    /// Only categories still flagged active.
    ActiveOnly,
}

/// The set of composite keys the stored hierarchy can vouch for.
#[derive(Debug, Clone)]
pub struct ValidKeySet {
    keys: BTreeSet<String>,
}

impl ValidKeySet {
    /// Collect every `{category}-{subcategory}` key within `scope`.
    pub fn build(categories: &[CategoryRecord], scope: KeyScope) -> Self {
        let mut keys = BTreeSet::new();
        for category in categories {
            if scope == KeyScope::ActiveOnly && !category.active {
                continue;
            }
            for subcategory in &category.subcategories {
                keys.insert(composite_key(&category.id, &subcategory.id));
            }
        }
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Whether `item` points at a key the hierarchy cannot vouch for.
    ///
    /// Uncategorized items, empty keys, and the sentinel bucket are never
    /// orphaned.
    pub fn is_orphaned(&self, item: &MenuItemRecord) -> bool {
        match item.category.as_deref() {
            None | Some("") => false,
            Some(UNCATEGORIZED) => false,
            Some(key) => !self.contains(key),
        }
    }

    /// Keys in sorted order, for deterministic reports.
    pub fn sorted_keys(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;
    use time::macros::datetime;

    use super::*;

    fn subcategory(id: &str, name: &str) -> SubcategoryRecord {
        SubcategoryRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            order: Some(1),
            active: true,
        }
    }

    fn category(id: &str, subcategories: Vec<SubcategoryRecord>) -> CategoryRecord {
        CategoryRecord {
            id: id.to_string(),
            name: id.to_string(),
            description: Some("wood-fired".to_string()),
            color: Some("orange".to_string()),
            order: Some(1),
            active: true,
            subcategories,
            created_at: datetime!(2024-03-01 10:00 UTC),
            updated_at: datetime!(2024-03-01 10:00 UTC),
        }
    }

    fn item(id: &str, key: Option<&str>) -> MenuItemRecord {
        MenuItemRecord {
            id: id.to_string(),
            name: id.to_string(),
            category: key.map(str::to_string),
            extra: Map::new(),
        }
    }

    #[test]
    fn composite_key_joins_with_hyphen() {
        assert_eq!(composite_key("pizza", "classic"), "pizza-classic");
    }

    #[test]
    fn merge_keeps_fields_the_update_is_silent_on() {
        let existing = category("pizza", vec![subcategory("classic", "Classic")]);
        let update = CategoryUpdate {
            order: Some(5),
            ..Default::default()
        };

        let merged = update.merge_into(&existing, datetime!(2024-03-02 09:00 UTC));

        assert_eq!(merged.order, Some(5));
        assert_eq!(merged.name, "pizza");
        assert_eq!(merged.description.as_deref(), Some("wood-fired"));
        assert_eq!(merged.subcategories, existing.subcategories);
        assert_eq!(merged.created_at, existing.created_at);
        assert_eq!(merged.updated_at, datetime!(2024-03-02 09:00 UTC));
    }

    #[test]
    fn merge_replaces_subcategories_when_supplied() {
        let existing = category("pizza", vec![subcategory("classic", "Classic")]);
        let update = CategoryUpdate {
            subcategories: Some(vec![
                SubcategoryDraft {
                    id: Some("classic".to_string()),
                    name: "Classic".to_string(),
                    ..Default::default()
                },
                SubcategoryDraft {
                    name: "Seasonal".to_string(),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };

        let merged = update.merge_into(&existing, datetime!(2024-03-02 09:00 UTC));

        assert_eq!(merged.subcategories.len(), 2);
        assert_eq!(merged.subcategories[0].id, "classic");
        // the id-less draft got a minted id
        assert!(!merged.subcategories[1].id.is_empty());
        assert_ne!(merged.subcategories[1].id, "classic");
    }

    #[test]
    fn minted_subcategory_ids_are_unique() {
        let first = SubcategoryDraft::default().into_record();
        let second = SubcategoryDraft::default().into_record();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn draft_silent_on_active_comes_out_active() {
        let record = SubcategoryDraft {
            name: "Seasonal".to_string(),
            ..Default::default()
        }
        .into_record();
        assert!(record.active);

        let record = SubcategoryDraft {
            name: "Retired".to_string(),
            active: Some(false),
            ..Default::default()
        }
        .into_record();
        assert!(!record.active);
    }

    #[test]
    fn subcategory_update_keeps_silent_fields() {
        let mut record = subcategory("classic", "Classic");
        record.description = Some("thin crust".to_string());

        SubcategoryUpdate {
            order: Some(9),
            ..Default::default()
        }
        .apply(&mut record);

        assert_eq!(record.order, Some(9));
        assert_eq!(record.name, "Classic");
        assert_eq!(record.description.as_deref(), Some("thin crust"));
        assert_eq!(record.id, "classic");
    }

    #[test]
    fn merge_can_reactivate_a_category() {
        let mut existing = category("pizza", vec![]);
        existing.active = false;

        let update = CategoryUpdate {
            active: Some(true),
            ..Default::default()
        };
        let merged = update.merge_into(&existing, datetime!(2024-03-02 09:00 UTC));
        assert!(merged.active);
    }

    #[test]
    fn sort_places_unordered_categories_last() {
        let mut categories = vec![
            CategoryRecord {
                order: None,
                ..category("drinks", vec![])
            },
            CategoryRecord {
                order: Some(2),
                ..category("pasta", vec![])
            },
            CategoryRecord {
                order: Some(1),
                ..category("pizza", vec![])
            },
        ];

        sort_for_display(&mut categories);

        let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["pizza", "pasta", "drinks"]);
    }

    #[test]
    fn orphan_classification_matches_hierarchy() {
        let categories = vec![category("pizza", vec![subcategory("classic", "Classic")])];
        let keys = ValidKeySet::build(&categories, KeyScope::All);

        assert!(!keys.is_orphaned(&item("ok", Some("pizza-classic"))));
        assert!(keys.is_orphaned(&item("dangling", Some("pizza-deluxe"))));
        assert!(!keys.is_orphaned(&item("sentinel", Some(UNCATEGORIZED))));
        assert!(!keys.is_orphaned(&item("untagged", None)));
        assert!(!keys.is_orphaned(&item("blank", Some(""))));
    }

    #[test]
    fn key_scope_gates_inactive_categories() {
        let mut retired = category("retired", vec![subcategory("old", "Old")]);
        retired.active = false;
        let categories = vec![
            category("pizza", vec![subcategory("classic", "Classic")]),
            retired,
        ];

        let all = ValidKeySet::build(&categories, KeyScope::All);
        assert!(all.contains("retired-old"));
        assert_eq!(all.len(), 2);

        let active_only = ValidKeySet::build(&categories, KeyScope::ActiveOnly);
        assert!(!active_only.contains("retired-old"));
        assert!(active_only.contains("pizza-classic"));
    }

    #[test]
    fn sorted_keys_are_deterministic() {
        let categories = vec![
            category("pasta", vec![subcategory("fresh", "Fresh")]),
            category("pizza", vec![subcategory("classic", "Classic")]),
        ];
        let keys = ValidKeySet::build(&categories, KeyScope::All);
        assert_eq!(keys.sorted_keys(), ["pasta-fresh", "pizza-classic"]);
    }

    #[test]
    fn display_bucket_falls_back_to_sentinel() {
        assert_eq!(display_bucket(&item("a", Some("pizza-classic"))), "pizza-classic");
        assert_eq!(display_bucket(&item("b", None)), UNCATEGORIZED);
        assert_eq!(display_bucket(&item("c", Some(""))), UNCATEGORIZED);
    }
}
