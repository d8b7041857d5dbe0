//! Recipes loaded into the store at startup.

use crate::recipe::NewRecipe;

/// Returns the default recipes, in listing order.
pub fn default_recipes() -> Vec<NewRecipe> {
    vec![
        NewRecipe::new(
            "boiled white rice",
            ["1 cup white rice", "2 cups water", "pinch of salt"],
        ),
        NewRecipe::new(
            "milkshake",
            ["2 tbsp cocoa", "2 cups vanilla ice cream", "1 cup milk"],
        ),
    ]
}
