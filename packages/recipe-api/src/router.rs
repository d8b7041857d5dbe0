//! Matchit routing configuration.

use std::sync::Arc;

use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::handlers;
use recipe_core::{config::ServerConfig, RecipeStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Recipe collection
    pub store: Arc<RecipeStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the recipe routes.
    pub fn new(store: Arc<RecipeStore>, config: Arc<ServerConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/recipes", RouteHandler::Collection)
            .expect("Failed to insert /recipes route");
        router
            .insert("/recipes/{id}", RouteHandler::Item)
            .expect("Failed to insert /recipes/{id} route");

        Self {
            inner: router,
            state: AppState { store, config },
        }
    }

    /// Returns the server configuration the handlers run with.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();
        tracing::debug!(method = %req.method(), path = %path, "Routing request");

        match self.inner.at(&path) {
            Ok(matched) => {
                let handler = matched.value;
                handler
                    .handle(req, matched.params, self.state.clone())
                    .await
            }
            Err(_) => Err(RouterError::NotFound(format!("No route found for {}", path))),
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Collection,
    Item,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        match (self, req.method().clone()) {
            (RouteHandler::Collection, Method::GET) => {
                handlers::list_recipes(req, params, state).await
            }
            (RouteHandler::Collection, Method::POST) => {
                handlers::create_recipe(req, params, state).await
            }
            (RouteHandler::Item, Method::GET) => handlers::read_recipe(req, params, state).await,
            (RouteHandler::Item, Method::PUT) => handlers::update_recipe(req, params, state).await,
            (RouteHandler::Item, Method::DELETE) => {
                handlers::delete_recipe(req, params, state).await
            }
            _ => Err(RouterError::MethodNotAllowed),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    /// Client error tied to one request body field
    InvalidField {
        message: String,
        field: &'static str,
    },
    NotFound(String),
    PayloadTooLarge {
        limit: usize,
    },
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) | RouterError::InvalidField { .. } => 400,
            RouterError::NotFound(_) => 404,
            RouterError::PayloadTooLarge { .. } => 413,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::InvalidField { message, .. } => write!(f, "Bad Request: {}", message),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::PayloadTooLarge { limit } => {
                write!(f, "Payload Too Large: body exceeds {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let (message, details) = match err {
            RouterError::MethodNotAllowed => ("Method Not Allowed".to_string(), None),
            RouterError::Timeout => ("Request Timeout".to_string(), None),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg) => (msg, None),
            RouterError::InvalidField { message, field } => (message, Some(field.to_string())),
            RouterError::PayloadTooLarge { limit } => (
                format!("Request body exceeds {} bytes", limit),
                None,
            ),
        };

        let error_response = handlers::error_response(status, message, details);
        let body = serde_json::to_vec(&error_response)
            .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\"}}}}", e).into_bytes());

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from("Internal Server Error"));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
