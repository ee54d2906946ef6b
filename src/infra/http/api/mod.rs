pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/categories/{id}/subcategories",
            post(handlers::add_subcategory),
        )
        .route(
            "/api/categories/{id}/subcategories/{subcategory_id}",
            put(handlers::update_subcategory).delete(handlers::remove_subcategory),
        )
        .route("/api/menu-items", get(handlers::list_menu_items))
        .route(
            "/api/hero-image",
            get(handlers::get_hero_image)
                .post(handlers::save_hero_image)
                .delete(handlers::clear_hero_image),
        )
        .route(
            "/api/cache-status",
            get(handlers::cache_status).delete(handlers::clear_all_caches),
        )
        .route("/api/debug/menu-structure", get(handlers::menu_structure))
        .route("/api/debug/orphaned-items", get(handlers::orphaned_items))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
