//! Shared in-memory recipe collection.

use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{RecipeError, Result};
use crate::recipe::{NewRecipe, Recipe};

/// Ordered recipe collection shared by all request handlers.
///
/// Every operation takes the lock once, so readers always see a
/// consistent snapshot and each mutation is atomic. Listing order is
/// insertion order; updates keep a recipe in place.
#[derive(Debug, Default)]
pub struct RecipeStore {
    recipes: RwLock<Vec<Recipe>>,
}

impl RecipeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given recipes, each with a fresh id.
    pub fn with_seed(seed: impl IntoIterator<Item = NewRecipe>) -> Self {
        let recipes = seed
            .into_iter()
            .map(|recipe| recipe.with_id(Uuid::new_v4().to_string()))
            .collect();
        Self {
            recipes: RwLock::new(recipes),
        }
    }

    /// Returns a snapshot of every recipe in insertion order.
    pub fn list(&self) -> Result<Vec<Recipe>> {
        let recipes = self.recipes.read().map_err(|_| RecipeError::LockPoisoned)?;
        Ok(recipes.clone())
    }

    /// Returns the recipe with the given id.
    pub fn get(&self, id: &str) -> Result<Recipe> {
        let recipes = self.recipes.read().map_err(|_| RecipeError::LockPoisoned)?;
        recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Appends a new recipe and returns it with its assigned id.
    pub fn create(&self, new: NewRecipe) -> Result<Recipe> {
        let recipe = new.with_id(Uuid::new_v4().to_string());
        let mut recipes = self.recipes.write().map_err(|_| RecipeError::LockPoisoned)?;
        recipes.push(recipe.clone());
        tracing::info!(id = %recipe.id, name = %recipe.name, "Created recipe");
        Ok(recipe)
    }

    /// Replaces the name and ingredients of an existing recipe.
    pub fn update(&self, id: &str, new: NewRecipe) -> Result<Recipe> {
        let mut recipes = self.recipes.write().map_err(|_| RecipeError::LockPoisoned)?;
        let recipe = recipes
            .iter_mut()
            .find(|recipe| recipe.id == id)
            .ok_or_else(|| not_found(id))?;
        recipe.name = new.name;
        recipe.ingredients = new.ingredients;
        tracing::info!(id = %recipe.id, name = %recipe.name, "Updated recipe");
        Ok(recipe.clone())
    }

    /// Removes a recipe and returns it.
    pub fn delete(&self, id: &str) -> Result<Recipe> {
        let mut recipes = self.recipes.write().map_err(|_| RecipeError::LockPoisoned)?;
        let index = recipes
            .iter()
            .position(|recipe| recipe.id == id)
            .ok_or_else(|| not_found(id))?;
        let removed = recipes.remove(index);
        tracing::info!(id = %removed.id, "Deleted recipe");
        Ok(removed)
    }

    /// Number of stored recipes.
    pub fn len(&self) -> Result<usize> {
        let recipes = self.recipes.read().map_err(|_| RecipeError::LockPoisoned)?;
        Ok(recipes.len())
    }

    /// Whether the store holds no recipes.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn not_found(id: &str) -> RecipeError {
    RecipeError::RecipeNotFound { id: id.to_string() }
}
