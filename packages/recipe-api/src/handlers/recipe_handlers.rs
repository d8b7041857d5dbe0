//! Recipe collection handlers.

use hyper::{body::Bytes, Request, Response};
use recipe_core::error::RecipeError;
use recipe_core::recipe::{body_id, NewRecipe};

use crate::router::{AppState, RouterError};

use super::request_utils::{
    build_empty_response, build_json_response, map_recipe_error_to_router_error,
    parse_json_body, path_id, read_request_body, MatchitParams,
};

/// Lists every recipe.
///
/// # Endpoint
/// `GET /recipes`
///
/// # Response
/// - **200 OK**: JSON array of recipes in insertion order
/// ```json
/// [
///   {"id": "5f0c...", "name": "milkshake", "ingredients": ["1 cup milk"]}
/// ]
/// ```
pub async fn list_recipes(
    _req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let recipes = state
        .store
        .list()
        .map_err(map_recipe_error_to_router_error)?;
    build_json_response(200, &recipes)
}

/// Returns a single recipe.
///
/// # Endpoint
/// `GET /recipes/{id}`
///
/// # Errors
/// - **404 Not Found**: No recipe with that id
pub async fn read_recipe(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params)?;
    let recipe = state
        .store
        .get(&id)
        .map_err(map_recipe_error_to_router_error)?;
    build_json_response(200, &recipe)
}

/// Creates a recipe.
///
/// # Endpoint
/// `POST /recipes`
///
/// # Request Body
/// ```json
/// {"name": "popcorn", "ingredients": ["kernels", "butter"]}
/// ```
///
/// # Response
/// - **201 Created**: The stored recipe, i.e. the submitted fields plus the generated id
///
/// # Errors
/// - **400 Bad Request**: Body is not JSON, or `name`/`ingredients` is missing or malformed
///   (`ingredients` must be an array of strings)
/// - **408 Request Timeout**: Body not received within `request_timeout_ms`
/// - **413 Payload Too Large**: Body larger than `max_body_bytes`
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/recipes \
///   -H "Content-Type: application/json" \
///   -d '{"name": "popcorn", "ingredients": ["kernels", "butter"]}'
/// ```
pub async fn create_recipe(
    req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let body_bytes = read_request_body(req, &state.config).await?;
    let body = parse_json_body(&body_bytes)?;
    let new_recipe =
        NewRecipe::from_create_json(&body).map_err(map_recipe_error_to_router_error)?;

    let recipe = state
        .store
        .create(new_recipe)
        .map_err(map_recipe_error_to_router_error)?;
    build_json_response(201, &recipe)
}

/// Replaces the name and ingredients of a recipe.
///
/// # Endpoint
/// `PUT /recipes/{id}`
///
/// # Request Body
/// ```json
/// {"id": "5f0c...", "name": "foo", "ingredients": ["bar"]}
/// ```
///
/// # Response
/// - **204 No Content**: Recipe updated
///
/// # Errors
/// - **400 Bad Request**: Missing field, or body `id` differs from the path id
/// - **404 Not Found**: No recipe with that id
///
/// # Notes
/// - `ingredients` may also be a single string, stored as a one-element list
pub async fn update_recipe(
    req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params)?;
    let body_bytes = read_request_body(req, &state.config).await?;
    let body = parse_json_body(&body_bytes)?;

    let new_recipe =
        NewRecipe::from_update_json(&body).map_err(map_recipe_error_to_router_error)?;
    let requested_id = body_id(&body).map_err(map_recipe_error_to_router_error)?;
    if requested_id != id {
        return Err(map_recipe_error_to_router_error(RecipeError::IdMismatch {
            path: id,
            body: requested_id,
        }));
    }

    state
        .store
        .update(&id, new_recipe)
        .map_err(map_recipe_error_to_router_error)?;
    build_empty_response(204)
}

/// Deletes a recipe.
///
/// # Endpoint
/// `DELETE /recipes/{id}`
///
/// # Response
/// - **204 No Content**: Recipe removed
///
/// # Errors
/// - **404 Not Found**: No recipe with that id
pub async fn delete_recipe(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params)?;
    state
        .store
        .delete(&id)
        .map_err(map_recipe_error_to_router_error)?;
    build_empty_response(204)
}
