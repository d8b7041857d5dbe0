//! Server start/stop behaviour.

use std::time::Duration;

use hyper::StatusCode;
use tokio::net::{TcpListener, TcpStream};

use recipe_core::config::ServerConfig;
use recipe_core::{seed, RecipeStore};

use super::helpers::{read_until_closed, spawn_server, spawn_server_with_config};

#[tokio::test]
async fn test_start_returns_once_listening() {
    let server = spawn_server().await;
    assert_ne!(server.addr.port(), 0);

    TcpStream::connect(server.addr)
        .await
        .expect("Listener should accept connections after start");

    server.stop().await;
}

#[tokio::test]
async fn test_stop_releases_listening_socket() {
    let server = spawn_server().await;
    let addr = server.addr;
    assert_eq!(server.get("/recipes").await.status, StatusCode::OK);

    server.stop().await;

    let connect = tokio::time::timeout(Duration::from_secs(1), TcpStream::connect(addr)).await;
    assert!(!matches!(connect, Ok(Ok(_))), "Connection accepted after stop");

    TcpListener::bind(addr)
        .await
        .expect("Port should be free after stop");
}

#[tokio::test]
async fn test_stop_waits_for_in_flight_request() {
    let config = ServerConfig {
        request_timeout_ms: 300,
        ..Default::default()
    };
    let server =
        spawn_server_with_config(RecipeStore::with_seed(seed::default_recipes()), config).await;
    let head = format!(
        "POST /recipes HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n",
        server.addr
    );
    let mut stream = server.send_partial(&head, b"{").await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    server.stop().await;

    // The connection has already been answered and closed by the time stop returns.
    let (status_line, body) =
        tokio::time::timeout(Duration::from_millis(200), read_until_closed(&mut stream))
            .await
            .expect("Connection still open after stop");
    assert!(status_line.starts_with("HTTP/1.1 408"), "got {status_line}");
    assert_eq!(body["error"]["code"], "408");
}

#[tokio::test]
async fn test_independent_servers_have_independent_stores() {
    let first = spawn_server().await;
    let second = spawn_server().await;

    first.delete(&format!("/recipes/{}", first.store.list().unwrap()[0].id)).await;

    assert_eq!(first.store.len().unwrap(), 1);
    assert_eq!(second.store.len().unwrap(), 2);

    first.stop().await;
    second.stop().await;
}
