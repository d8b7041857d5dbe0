//! REST API server for recipes.
//!
//! Wires the recipe store to the HTTP router, serves until Ctrl+C,
//! then releases the listener.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use recipe_api::{router::Router, server::Server};
use recipe_core::{config::ServerConfig, seed, RecipeStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the recipe server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = 64 * 1024)]
    max_body_bytes: usize,

    /// Start with an empty recipe list
    #[arg(long)]
    no_seed: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            request_timeout_ms: args.request_timeout_ms,
            max_body_bytes: args.max_body_bytes,
            seed: !args.no_seed,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(ServerConfig::from(Args::parse()));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = if config.seed {
        RecipeStore::with_seed(seed::default_recipes())
    } else {
        RecipeStore::new()
    };
    tracing::info!(recipes = store.len()?, "Recipe store ready");

    let addr = config
        .socket_addr()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        request_timeout_ms = config.request_timeout_ms,
        "Starting recipe server"
    );

    let router = Router::new(Arc::new(store), Arc::clone(&config));
    let server = Server::new(addr, router)
        .start()
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down server...");
    server.stop().await.context("Failed to stop server")?;

    Ok(())
}
