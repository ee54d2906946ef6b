//! Hero image handlers

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use super::hero_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    HeroImageCleared, MissingHeroImage, SaveHeroImageRequest, SaveHeroImageResponse,
};
use crate::infra::http::api::state::ApiState;

pub async fn get_hero_image(State(state): State<ApiState>) -> Result<Response, ApiError> {
    match state.hero.get().await.map_err(hero_to_api)? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(Json(MissingHeroImage { image: None }).into_response()),
    }
}

pub async fn save_hero_image(
    State(state): State<ApiState>,
    Json(payload): Json<SaveHeroImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .hero
        .save(payload.image)
        .await
        .map_err(hero_to_api)?;
    Ok(Json(SaveHeroImageResponse {
        success: true,
        data: stored,
    }))
}

pub async fn clear_hero_image(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    state.hero.clear().await.map_err(hero_to_api)?;
    Ok(Json(HeroImageCleared { success: true }))
}
