//! Liveness probe

use axum::extract::State;
use axum::http::StatusCode;

use crate::infra::http::api::state::ApiState;

/// Touches the cache registry so a wedged lock shows up as a hang
/// rather than a false 204.
pub async fn healthz(State(state): State<ApiState>) -> StatusCode {
    let _ = state.caches.status_report();
    StatusCode::NO_CONTENT
}
