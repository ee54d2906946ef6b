//! Piatto cache system.
//!
//! A process-wide registry of named caches. Each cache holds one opaque
//! JSON document together with a write timestamp and a time-to-live;
//! expiry is checked lazily on read, so nothing runs in the background.
//!
//! ## Configuration
//!
//! Cache lifetimes are controlled via `piatto.toml`:
//!
//! ```toml
//! [cache]
//! categories_ttl_seconds = 30
//! menu_items_ttl_seconds = 30
//! hero_image_ttl_seconds = 30
//! default_ttl_seconds = 300
//! ```

mod registry;

pub use registry::{CacheRegistry, CacheStatus, DEFAULT_TTL};

/// Cache registered for the menu item list.
pub const MENU_ITEMS_CACHE: &str = "menuItems";
/// Cache registered for the sorted category list.
pub const CATEGORIES_CACHE: &str = "categories";
/// Cache registered for the hero image document.
pub const HERO_IMAGE_CACHE: &str = "heroImage";
