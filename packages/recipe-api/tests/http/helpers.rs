//! Test server and client helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1::handshake;
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use recipe_api::router::Router;
use recipe_api::server::{RunningServer, Server};
use recipe_core::config::ServerConfig;
use recipe_core::{seed, RecipeStore};

/// A started server plus direct access to its store.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<RecipeStore>,
    running: RunningServer,
}

/// A fully read response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl TestResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }
}

/// Starts a server seeded with the default recipes.
pub async fn spawn_server() -> TestServer {
    spawn_server_with_store(RecipeStore::with_seed(seed::default_recipes())).await
}

/// Starts a server around the given store on a free port.
pub async fn spawn_server_with_store(store: RecipeStore) -> TestServer {
    spawn_server_with_config(store, ServerConfig::default()).await
}

/// Starts a server with custom limits on a free port.
pub async fn spawn_server_with_config(store: RecipeStore, config: ServerConfig) -> TestServer {
    let config = Arc::new(ServerConfig { port: 0, ..config });
    let store = Arc::new(store);
    let router = Router::new(Arc::clone(&store), Arc::clone(&config));
    let addr = config.socket_addr().expect("Invalid test address");
    let running = Server::new(addr, router)
        .start()
        .await
        .expect("Failed to start test server");

    TestServer {
        addr: running.local_addr(),
        store,
        running,
    }
}

impl TestServer {
    /// Sends a request with an optional JSON body over a fresh connection.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let body = match body {
            Some(json) => Bytes::from(serde_json::to_vec(&json).expect("Failed to encode body")),
            None => Bytes::new(),
        };
        self.request_raw(method, path, body).await
    }

    /// Sends a request with a raw body over a fresh connection.
    pub async fn request_raw(&self, method: Method, path: &str, body: Bytes) -> TestResponse {
        let stream = TcpStream::connect(self.addr)
            .await
            .expect("Failed to connect TCP stream");
        let (mut sender, conn) = handshake(TokioIo::new(stream))
            .await
            .expect("HTTP handshake failed");
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Host", self.addr.to_string())
            .header("Content-Type", "application/json")
            .body(Full::new(body))
            .expect("Failed to construct request");

        let res = sender
            .send_request(req)
            .await
            .expect("Failed to send request");
        let status = res.status();
        let content_type = res
            .headers()
            .get("Content-Type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = res
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            content_type,
            body,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None).await
    }

    /// Opens a raw connection and sends request bytes without completing the body.
    pub async fn send_partial(&self, head: &str, body_prefix: &[u8]) -> TcpStream {
        let mut stream = TcpStream::connect(self.addr)
            .await
            .expect("Failed to connect TCP stream");
        stream
            .write_all(head.as_bytes())
            .await
            .expect("Failed to write request head");
        stream
            .write_all(body_prefix)
            .await
            .expect("Failed to write body prefix");
        stream
    }

    /// Stops the server and waits for the listener to close.
    pub async fn stop(self) {
        self.running.stop().await.expect("Failed to stop test server");
    }
}

/// Reads a raw HTTP/1.1 response until the server closes the connection.
///
/// Returns the status line and the body parsed as JSON.
pub async fn read_until_closed(stream: &mut TcpStream) -> (String, Value) {
    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .await
        .expect("Failed to read response");
    let text = String::from_utf8(raw).expect("Response is not UTF-8");
    let (head, body) = text
        .split_once("\r\n\r\n")
        .expect("Response has no header terminator");
    let status_line = head.lines().next().unwrap_or_default().to_string();
    let body = serde_json::from_str(body).expect("Response body is not JSON");
    (status_line, body)
}
