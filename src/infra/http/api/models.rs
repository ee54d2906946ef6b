//! Wire-format models for the JSON API.
//!
//! Domain records serialize straight onto the wire; the structs here
//! cover the payloads that have no domain counterpart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::cache::CacheStatus;
use crate::domain::entities::HeroImageRecord;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveHeroImageRequest {
    pub image: String,
}

/// Body served when no hero image was ever stored.
#[derive(Debug, Serialize)]
pub struct MissingHeroImage {
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveHeroImageResponse {
    pub success: bool,
    pub data: HeroImageRecord,
}

#[derive(Debug, Serialize)]
pub struct HeroImageCleared {
    pub success: bool,
}

/// One status entry per registered cache, keyed by cache name, with the
/// snapshot stamp as a sibling field.
#[derive(Debug, Serialize)]
pub struct CacheStatusReport {
    #[serde(flatten)]
    pub caches: BTreeMap<String, CacheStatus>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct CachesCleared {
    pub success: bool,
    pub message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
