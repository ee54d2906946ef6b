//! Category handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::categories::{
    CategoryDraft, CategoryUpdate, SubcategoryDraft, SubcategoryUpdate,
};

use super::category_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.categories.list().await.map_err(category_to_api)?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.categories.get(&id).await.map_err(category_to_api)?;
    Ok(Json(category))
}

pub async fn create_category(
    State(state): State<ApiState>,
    Json(draft): Json<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .categories
        .create(draft)
        .await
        .map_err(category_to_api)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(update): Json<CategoryUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .categories
        .update(&id, update)
        .await
        .map_err(category_to_api)?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.categories.delete(&id).await.map_err(category_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_subcategory(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(draft): Json<SubcategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .categories
        .add_subcategory(&id, draft)
        .await
        .map_err(category_to_api)?;
    Ok(Json(category))
}

pub async fn update_subcategory(
    State(state): State<ApiState>,
    Path((id, subcategory_id)): Path<(String, String)>,
    Json(update): Json<SubcategoryUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .categories
        .update_subcategory(&id, &subcategory_id, update)
        .await
        .map_err(category_to_api)?;
    Ok(Json(category))
}

pub async fn remove_subcategory(
    State(state): State<ApiState>,
    Path((id, subcategory_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .categories
        .remove_subcategory(&id, &subcategory_id)
        .await
        .map_err(category_to_api)?;
    Ok(Json(category))
}
