//! Hierarchy diagnostic handlers

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::domain::categories::KeyScope;

use super::consistency_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn menu_structure(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .consistency
        .menu_structure()
        .await
        .map_err(consistency_to_api)?;
    Ok(Json(report))
}

/// Report-only scan; nothing is repaired here.
pub async fn orphaned_items(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .consistency
        .orphan_report(KeyScope::All)
        .await
        .map_err(consistency_to_api)?;
    Ok(Json(report))
}
