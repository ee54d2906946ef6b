use std::sync::Arc;

use crate::application::categories::CategoryService;
use crate::application::consistency::ConsistencyService;
use crate::application::hero::HeroImageService;
use crate::application::menu::MenuService;
use crate::cache::CacheRegistry;

#[derive(Clone)]
pub struct ApiState {
    pub categories: Arc<CategoryService>,
    pub menu: Arc<MenuService>,
    pub hero: Arc<HeroImageService>,
    pub consistency: Arc<ConsistencyService>,
    pub caches: Arc<CacheRegistry>,
}
