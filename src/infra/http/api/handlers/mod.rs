//! API handlers organized by resource.
//!
//! Shared error conversions live here; every handler maps its service
//! error through them so the wire shape stays uniform.

mod cache;
mod categories;
mod debug;
mod health;
mod hero;
mod menu;

pub use cache::*;
pub use categories::*;
pub use debug::*;
pub use health::*;
pub use hero::*;
pub use menu::*;

use axum::http::StatusCode;

use crate::application::categories::CategoryError;
use crate::application::consistency::ConsistencyError;
use crate::application::hero::HeroImageError;
use crate::application::menu::MenuError;
use crate::application::repos::RepoError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::Persistence(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(message),
        ),
    }
}

pub(crate) fn category_to_api(err: CategoryError) -> ApiError {
    match err {
        CategoryError::CategoryNotFound => ApiError::not_found("category not found"),
        CategoryError::SubcategoryNotFound => ApiError::not_found("subcategory not found"),
        CategoryError::ConstraintViolation(field) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid category",
            Some(field.to_string()),
        ),
        CategoryError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn menu_to_api(err: MenuError) -> ApiError {
    match err {
        MenuError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn hero_to_api(err: HeroImageError) -> ApiError {
    match err {
        HeroImageError::InvalidImage(detail) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_IMAGE,
            "Invalid image payload",
            Some(detail.to_string()),
        ),
        HeroImageError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn consistency_to_api(err: ConsistencyError) -> ApiError {
    match err {
        ConsistencyError::Categories(inner) => category_to_api(inner),
        ConsistencyError::Menu(inner) => menu_to_api(inner),
    }
}
