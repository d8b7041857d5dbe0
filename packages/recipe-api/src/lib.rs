//! REST API server for the recipe store.
//!
//! Provides HTTP endpoints for listing, creating, updating and
//! deleting recipes, plus request routing and server lifecycle.

pub mod handlers;
pub mod router;
pub mod server;
