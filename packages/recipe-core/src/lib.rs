//! Recipe model and in-memory storage.
//!
//! Provides the recipe record type, request body validation,
//! the shared recipe store, seed data, and server configuration.

pub mod config;
pub mod error;
pub mod recipe;
pub mod seed;
pub mod store;

pub use recipe::{NewRecipe, Recipe};
pub use store::RecipeStore;
