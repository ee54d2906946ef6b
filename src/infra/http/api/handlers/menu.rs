//! Menu item handlers

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::menu_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_menu_items(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.menu.list().await.map_err(menu_to_api)?;
    Ok(Json(items))
}
