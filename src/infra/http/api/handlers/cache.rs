//! Cache inspection handlers

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use time::OffsetDateTime;

use crate::infra::http::api::models::{CacheStatusReport, CachesCleared};
use crate::infra::http::api::state::ApiState;

/// Status of every registered cache; a pure read, never purges.
pub async fn cache_status(State(state): State<ApiState>) -> impl IntoResponse {
    Json(CacheStatusReport {
        caches: state.caches.status_report(),
        timestamp: OffsetDateTime::now_utc(),
    })
}

pub async fn clear_all_caches(State(state): State<ApiState>) -> impl IntoResponse {
    state.caches.clear_all();
    Json(CachesCleared {
        success: true,
        message: "All caches cleared",
        timestamp: OffsetDateTime::now_utc(),
    })
}
