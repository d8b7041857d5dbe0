//! Recipe records and request body validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RecipeError, Result};

/// Fields every create or update body must carry.
const REQUIRED_FIELDS: [&str; 2] = ["name", "ingredients"];

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Server-assigned identifier, never changes after creation
    pub id: String,
    /// Display name
    pub name: String,
    /// Ingredients in the order the client gave them
    pub ingredients: Vec<String>,
}

/// Client-supplied recipe fields for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
}

impl NewRecipe {
    /// Creates recipe fields from a name and ingredient list.
    pub fn new<I, S>(name: impl Into<String>, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates a create body and extracts the recipe fields.
    ///
    /// `ingredients` must be an array of strings so the created record
    /// matches what the client sent.
    pub fn from_create_json(body: &Value) -> Result<Self> {
        Self::parse(body, IngredientsShape::ListOnly)
    }

    /// Validates an update body and extracts the recipe fields.
    ///
    /// `ingredients` may also be a single string, stored as a
    /// one-element list. The body `id` is checked separately by
    /// [`body_id`].
    pub fn from_update_json(body: &Value) -> Result<Self> {
        Self::parse(body, IngredientsShape::ListOrSingle)
    }

    /// Fields are checked for presence first, in a fixed order, so the
    /// client learns which field is missing before any shape error.
    fn parse(body: &Value, shape: IngredientsShape) -> Result<Self> {
        let object = body.as_object().ok_or(RecipeError::NotAnObject)?;
        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(RecipeError::MissingField { field });
            }
        }

        let name = match &object["name"] {
            Value::String(name) => name.clone(),
            other => {
                return Err(RecipeError::InvalidField {
                    field: "name",
                    reason: format!("expected a string, got {}", json_kind(other)),
                })
            }
        };

        let raw = object["ingredients"].clone();
        let ingredients = match shape {
            IngredientsShape::ListOnly => serde_json::from_value::<Vec<String>>(raw).map_err(|_| {
                RecipeError::InvalidField {
                    field: "ingredients",
                    reason: "expected an array of strings".to_string(),
                }
            })?,
            IngredientsShape::ListOrSingle => serde_json::from_value::<IngredientsInput>(raw)
                .map_err(|_| RecipeError::InvalidField {
                    field: "ingredients",
                    reason: "expected a string or an array of strings".to_string(),
                })?
                .into(),
        };

        Ok(Self { name, ingredients })
    }

    /// Attaches an id, producing a full record.
    pub fn with_id(self, id: String) -> Recipe {
        Recipe {
            id,
            name: self.name,
            ingredients: self.ingredients,
        }
    }
}

/// Extracts the `id` carried by an update body.
pub fn body_id(body: &Value) -> Result<String> {
    let object = body.as_object().ok_or(RecipeError::NotAnObject)?;
    match object.get("id") {
        None | Some(Value::Null) => Err(RecipeError::MissingField { field: "id" }),
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Err(RecipeError::InvalidField {
            field: "id",
            reason: format!("expected a string, got {}", json_kind(other)),
        }),
    }
}

/// Accepted `ingredients` shapes for a request body.
#[derive(Debug, Clone, Copy)]
enum IngredientsShape {
    ListOnly,
    ListOrSingle,
}

/// Ingredients as update clients send them: a list, or a single entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsInput {
    One(String),
    Many(Vec<String>),
}

impl From<IngredientsInput> for Vec<String> {
    fn from(input: IngredientsInput) -> Self {
        match input {
            IngredientsInput::One(ingredient) => vec![ingredient],
            IngredientsInput::Many(ingredients) => ingredients,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
