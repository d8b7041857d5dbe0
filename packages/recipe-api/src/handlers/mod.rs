//! HTTP endpoint implementations for the recipe collection.

pub mod recipe_handlers;
pub mod request_utils;
pub mod response;

pub use recipe_handlers::{create_recipe, delete_recipe, list_recipes, read_recipe, update_recipe};
pub use response::error_response;
