//! Homepage hero image: one singleton document, cached like the lists.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::{HeroImageRepo, RepoError};
use crate::cache::{CacheRegistry, HERO_IMAGE_CACHE};
use crate::domain::entities::HeroImageRecord;

#[derive(Debug, Error)]
pub enum HeroImageError {
    #[error("{0}")]
    InvalidImage(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct HeroImageService {
    repo: Arc<dyn HeroImageRepo>,
    caches: Arc<CacheRegistry>,
}

impl HeroImageService {
    pub fn new(repo: Arc<dyn HeroImageRepo>, caches: Arc<CacheRegistry>) -> Self {
        Self { repo, caches }
    }

    /// The stored hero document, if any.
    ///
    /// Only an existing document is cached; while nothing is stored,
    /// every read goes to the store.
    pub async fn get(&self) -> Result<Option<HeroImageRecord>, HeroImageError> {
        if let Some(cached) = self.caches.get_json::<HeroImageRecord>(HERO_IMAGE_CACHE) {
            return Ok(Some(cached));
        }

        let record = self.repo.load_hero_image().await?;
        if let Some(record) = &record {
            self.caches.set_json(HERO_IMAGE_CACHE, record);
        }
        Ok(record)
    }

    /// Validate and store a new hero image, then drop the cached copy.
    ///
    /// The payload must be a base64 `data:image/` URI; the body is
    /// decoded up front so a corrupt payload never reaches the store.
    pub async fn save(&self, image: String) -> Result<HeroImageRecord, HeroImageError> {
        validate_image_payload(&image)?;

        let now = OffsetDateTime::now_utc();
        let record = HeroImageRecord {
            image: Some(image),
            uploaded_at: Some(now),
            updated_at: now,
        };
        let stored = self.repo.store_hero_image(record).await?;
        self.caches.clear(HERO_IMAGE_CACHE);
        Ok(stored)
    }

    /// Blank the stored image. The document survives with the image and
    /// upload stamp nulled out.
    pub async fn clear(&self) -> Result<(), HeroImageError> {
        let record = HeroImageRecord {
            image: None,
            uploaded_at: None,
            updated_at: OffsetDateTime::now_utc(),
        };
        self.repo.store_hero_image(record).await?;
        self.caches.clear(HERO_IMAGE_CACHE);
        Ok(())
    }
}

fn validate_image_payload(image: &str) -> Result<(), HeroImageError> {
    if image.is_empty() {
        return Err(HeroImageError::InvalidImage("no image data provided"));
    }
    if !image.starts_with("data:image/") {
        return Err(HeroImageError::InvalidImage(
            "image must be a data:image/ URI",
        ));
    }
    let payload = image
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or(HeroImageError::InvalidImage("image must be base64 encoded"))?;
    STANDARD
        .decode(payload)
        .map_err(|_| HeroImageError::InvalidImage("image payload is not valid base64"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_base64_png_uri() {
        let encoded = STANDARD.encode(b"not really a png");
        let uri = format!("data:image/png;base64,{encoded}");
        assert!(validate_image_payload(&uri).is_ok());
    }

    #[test]
    fn rejects_empty_payload() {
        let err = validate_image_payload("").unwrap_err();
        assert!(matches!(err, HeroImageError::InvalidImage(_)));
    }

    #[test]
    fn rejects_non_image_uri() {
        let err = validate_image_payload("data:text/plain;base64,aGk=").unwrap_err();
        assert!(matches!(err, HeroImageError::InvalidImage(_)));
    }

    #[test]
    fn rejects_plain_urls() {
        let err = validate_image_payload("https://cdn.example/hero.png").unwrap_err();
        assert!(matches!(err, HeroImageError::InvalidImage(_)));
    }

    #[test]
    fn rejects_mangled_base64() {
        let err = validate_image_payload("data:image/png;base64,@@@@").unwrap_err();
        assert!(matches!(err, HeroImageError::InvalidImage(_)));
    }

    #[test]
    fn rejects_uri_without_base64_marker() {
        let err = validate_image_payload("data:image/svg+xml,<svg/>").unwrap_err();
        assert!(matches!(err, HeroImageError::InvalidImage(_)));
    }
}
