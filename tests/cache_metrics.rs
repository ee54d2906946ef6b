use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use metrics_util::debugging::DebuggingRecorder;
use piatto::application::categories::CategoryService;
use piatto::application::consistency::ConsistencyService;
use piatto::application::hero::HeroImageService;
use piatto::application::menu::MenuService;
use piatto::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, HeroImageRepo, MenuItemsRepo,
};
use piatto::cache::{CATEGORIES_CACHE, CacheRegistry, MENU_ITEMS_CACHE};
use piatto::domain::entities::MenuItemRecord;
use piatto::infra::http::{ApiState, build_api_router};
use piatto::infra::memstore::{MemoryStore, StoreSeed};
use tower::ServiceExt;

fn sample_item(id: &str, name: &str) -> MenuItemRecord {
    MenuItemRecord {
        id: id.to_string(),
        name: name.to_string(),
        category: None,
        extra: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let store = Arc::new(MemoryStore::with_seed(StoreSeed {
        menu_items: vec![sample_item("item-1", "Margherita")],
        ..Default::default()
    }));
    let categories_repo: Arc<dyn CategoriesRepo> = store.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = store.clone();
    let menu_items_repo: Arc<dyn MenuItemsRepo> = store.clone();
    let hero_image_repo: Arc<dyn HeroImageRepo> = store.clone();

    // The menu cache keeps entries long enough to serve a hit; the
    // categories cache expires everything instantly.
    let caches = Arc::new(CacheRegistry::new());
    caches.register(MENU_ITEMS_CACHE, Duration::from_secs(300));
    caches.register(CATEGORIES_CACHE, Duration::ZERO);

    let categories = Arc::new(CategoryService::new(
        categories_repo,
        categories_write_repo,
        caches.clone(),
    ));
    let menu = Arc::new(MenuService::new(menu_items_repo, caches.clone()));
    let hero = Arc::new(HeroImageService::new(hero_image_repo, caches.clone()));
    let consistency = Arc::new(ConsistencyService::new(categories.clone(), menu.clone()));

    let app = build_api_router(ApiState {
        categories,
        menu,
        hero,
        consistency,
        caches,
    });

    // First read misses and stores, second one hits.
    // The zero-lifetime cache turns the second read into an expiry.
    let uris = [
        "/api/menu-items",
        "/api/menu-items",
        "/api/categories",
        "/api/categories",
    ];
    for uri in uris {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "piatto_cache_hit_total",
        "piatto_cache_miss_total",
        "piatto_cache_expired_total",
        "piatto_cache_store_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
