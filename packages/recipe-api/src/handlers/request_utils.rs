//! Request utilities for HTTP endpoints.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::{body::Bytes, Request, Response};
use percent_encoding::percent_decode_str;
use recipe_core::config::ServerConfig;
use recipe_core::error::RecipeError;
use serde::Serialize;
use tokio::time;

use crate::router::RouterError;

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Reads the request body, bounded by the configured timeout and size limit.
pub async fn read_request_body(
    req: Request<hyper::body::Incoming>,
    config: &ServerConfig,
) -> Result<Bytes, RouterError> {
    let limit = config.max_body_bytes;
    let timeout_duration = time::Duration::from_millis(config.request_timeout_ms);
    let body = Limited::new(req.into_body(), limit);
    let collected = time::timeout(timeout_duration, body.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                RouterError::PayloadTooLarge { limit }
            } else {
                RouterError::InternalError(format!("Failed to read request body: {}", e))
            }
        })?;
    Ok(collected.to_bytes())
}

/// Parses a request body as a JSON document.
pub fn parse_json_body(body: &[u8]) -> Result<serde_json::Value, RouterError> {
    serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
}

/// Extracts and percent-decodes the `id` path parameter.
pub fn path_id(params: &MatchitParams<'_, '_>) -> Result<String, RouterError> {
    let raw = params
        .get("id")
        .ok_or_else(|| RouterError::BadRequest("Missing recipe id in path".to_string()))?;
    Ok(decode_path_segment(raw))
}

/// Percent-decodes a single path segment.
pub fn decode_path_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Helper to build a JSON HTTP response
pub fn build_json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(data)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Helper to build empty HTTP response (for 204 No Content)
pub fn build_empty_response(status: u16) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Map RecipeError to appropriate RouterError
pub fn map_recipe_error_to_router_error(e: RecipeError) -> RouterError {
    match e {
        RecipeError::RecipeNotFound { .. } => RouterError::NotFound(e.to_string()),
        RecipeError::MissingField { field } | RecipeError::InvalidField { field, .. } => {
            RouterError::InvalidField {
                message: e.to_string(),
                field,
            }
        }
        RecipeError::NotAnObject | RecipeError::IdMismatch { .. } => {
            RouterError::BadRequest(e.to_string())
        }
        RecipeError::LockPoisoned => RouterError::InternalError(format!("Store error: {}", e)),
    }
}
