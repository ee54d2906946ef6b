//! Domain entities mirrored from the document store.
//!
//! Field names follow the store's camelCase wire format so records
//! round-trip through the cache and the seed file unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// UI theming hint, passed through to the front end untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Display order. Documents without one sort last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryRecord>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryRecord {
    /// Unique within the parent category only.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default)]
    pub active: bool,
}

/// A menu item as stored. This service only ever reads items; the fields
/// it does not interpret (price, image, allergens, ...) ride along in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRecord {
    pub id: String,
    pub name: String,
    /// Composite `{category}-{subcategory}` key, the sentinel bucket, or
    /// absent for uncategorized items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Singleton hero image document. The image is a base64 `data:image/...`
/// URI; both fields null out when the image is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImageRecord {
    pub image: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub uploaded_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn menu_item_keeps_uninterpreted_fields() {
        let document = json!({
            "id": "item-1",
            "name": "Quattro Stagioni",
            "category": "pizza-classic",
            "price": 14.5,
            "image": "data:image/webp;base64,AAAA"
        });

        let item: MenuItemRecord =
            serde_json::from_value(document.clone()).expect("item should decode");
        assert_eq!(item.category.as_deref(), Some("pizza-classic"));
        assert_eq!(item.extra["price"], json!(14.5));

        let roundtripped = serde_json::to_value(&item).expect("item should encode");
        assert_eq!(roundtripped, document);
    }

    #[test]
    fn category_decodes_sparse_document() {
        let item: CategoryRecord = serde_json::from_value(json!({
            "id": "drinks",
            "name": "Drinks",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }))
        .expect("sparse category should decode");

        assert_eq!(item.order, None);
        assert!(!item.active);
        assert!(item.subcategories.is_empty());
    }
}
