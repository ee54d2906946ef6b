use std::{process, sync::Arc};

use piatto::{
    application::error::AppError,
    application::{
        categories::CategoryService,
        consistency::ConsistencyService,
        hero::HeroImageService,
        menu::MenuService,
        repos::{CategoriesRepo, CategoriesWriteRepo, HeroImageRepo, MenuItemsRepo},
    },
    cache::{CATEGORIES_CACHE, CacheRegistry, HERO_IMAGE_CACHE, MENU_ITEMS_CACHE},
    config,
    infra::{
        error::InfraError,
        http::{self, ApiState},
        memstore::MemoryStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = init_store(&settings).await?;
    let api_state = build_application_context(store, &settings);
    serve_http(&settings, api_state).await
}

async fn init_store(settings: &config::Settings) -> Result<Arc<MemoryStore>, AppError> {
    let store = match settings.store.seed_path.as_deref() {
        Some(path) => MemoryStore::from_seed_file(path)
            .await
            .map_err(AppError::from)?,
        None => MemoryStore::new(),
    };

    Ok(Arc::new(store))
}

fn build_application_context(store: Arc<MemoryStore>, settings: &config::Settings) -> ApiState {
    let categories_repo: Arc<dyn CategoriesRepo> = store.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = store.clone();
    let menu_items_repo: Arc<dyn MenuItemsRepo> = store.clone();
    let hero_image_repo: Arc<dyn HeroImageRepo> = store.clone();

    let caches = Arc::new(CacheRegistry::with_default_ttl(settings.cache.default_ttl));
    caches.register(MENU_ITEMS_CACHE, settings.cache.menu_items_ttl);
    caches.register(CATEGORIES_CACHE, settings.cache.categories_ttl);
    caches.register(HERO_IMAGE_CACHE, settings.cache.hero_image_ttl);

    let categories = Arc::new(CategoryService::new(
        categories_repo,
        categories_write_repo,
        caches.clone(),
    ));
    let menu = Arc::new(MenuService::new(menu_items_repo, caches.clone()));
    let hero = Arc::new(HeroImageService::new(hero_image_repo, caches.clone()));
    let consistency = Arc::new(ConsistencyService::new(categories.clone(), menu.clone()));

    ApiState {
        categories,
        menu,
        hero,
        consistency,
        caches,
    }
}

async fn serve_http(settings: &config::Settings, api_state: ApiState) -> Result<(), AppError> {
    let router = http::build_api_router(api_state);

    let listener = tokio::net::TcpListener::bind(settings.server.listen_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "piatto::serve",
        addr = %settings.server.listen_addr,
        "Listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
