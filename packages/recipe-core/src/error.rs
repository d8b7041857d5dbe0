//! Recipe operation error types.

use thiserror::Error;

/// Recipe store and request validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    /// No recipe with the given id
    #[error("Recipe '{id}' not found")]
    RecipeNotFound { id: String },

    /// Required field absent from a request body
    #[error("Missing `{field}` in request body")]
    MissingField { field: &'static str },

    /// Field present but with the wrong shape
    #[error("Invalid `{field}` in request body: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Request body is not a JSON object
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// Update addressed one id but carried another
    #[error("Request path id ({path}) and request body id ({body}) must match")]
    IdMismatch { path: String, body: String },

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Result type for recipe operations
pub type Result<T> = std::result::Result<T, RecipeError>;
