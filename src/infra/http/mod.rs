pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};
