//! Application services layer.

pub mod categories;
pub mod consistency;
pub mod error;
pub mod hero;
pub mod menu;
pub mod repos;
