//! Hyper server setup and request handling.

use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::router::Router;

/// Extra time granted to open connections on shutdown, on top of the request timeout.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// HTTP server for the recipe API.
pub struct Server {
    addr: SocketAddr,
    router: Arc<Router>,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (port 0 picks a free port)
    /// * `router` - Request router
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        Self {
            addr,
            router: Arc::new(router),
        }
    }

    /// Binds the listener and starts accepting connections.
    ///
    /// Returns once the socket is listening.
    pub async fn start(self) -> io::Result<RunningServer> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let drain_timeout =
            Duration::from_millis(self.router.config().request_timeout_ms) + SHUTDOWN_GRACE;
        let task = tokio::spawn(accept_loop(
            listener,
            self.router,
            shutdown_rx,
            drain_timeout,
        ));
        tracing::info!("Server listening on http://{}", local_addr);

        Ok(RunningServer {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

/// Handle to a started server.
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RunningServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and releases the listening socket.
    ///
    /// Open connections finish their in-flight request and close. Returns
    /// once the listener and every connection are closed; connections still
    /// open after the request timeout plus a short grace period are aborted.
    pub async fn stop(self) -> io::Result<()> {
        // Receivers may already be gone if the accept loop exited.
        let _ = self.shutdown_tx.send(true);
        self.task.await.map_err(io::Error::other)?;
        tracing::info!("Server on {} stopped", self.local_addr);
        Ok(())
    }
}

/// Accepts connections until shutdown is signalled, then drains open connections.
///
/// The listener is dropped before draining so the port is released even
/// while connections finish.
async fn accept_loop(
    listener: TcpListener,
    router: Arc<Router>,
    mut shutdown_rx: watch::Receiver<bool>,
    drain_timeout: Duration,
) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        tracing::debug!("New connection from {}", peer_addr);
                        let router = Arc::clone(&router);
                        let shutdown_rx = shutdown_rx.clone();
                        connections.spawn(serve_connection(stream, router, shutdown_rx));
                    }
                    Err(e) => tracing::error!("Accept error: {}", e),
                }
            }
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    tracing::debug!("Listener shutting down");
                    break;
                }
            }
        }
    }
    drop(listener);

    if connections.is_empty() {
        return;
    }
    tracing::debug!("Draining {} open connections", connections.len());
    let drained = tokio::time::timeout(drain_timeout, async {
        while connections.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            "Aborting {} connections still open after {:?}",
            connections.len(),
            drain_timeout
        );
        connections.shutdown().await;
    }
}

/// Serves a single connection, draining it when shutdown is signalled.
async fn serve_connection(
    stream: tokio::net::TcpStream,
    router: Arc<Router>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let io = TokioIo::new(stream);
    let builder = ConnectionBuilder::new(TokioExecutor::new());
    let connection = builder.serve_connection(
        io,
        hyper::service::service_fn(move |req| handle_request(req, Arc::clone(&router))),
    );
    tokio::pin!(connection);

    let mut draining = false;
    loop {
        tokio::select! {
            result = connection.as_mut() => {
                if let Err(err) = result {
                    tracing::error!("Error serving connection: {}", err);
                }
                break;
            }
            _ = shutdown_rx.changed(), if !draining => {
                draining = true;
                connection.as_mut().graceful_shutdown();
            }
        }
    }
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match router.route(req).await {
        Ok(response) => response,
        Err(err) => {
            if err.status() >= 500 {
                tracing::error!("Error handling {} {}: {}", method, path, err);
            } else {
                tracing::warn!("Rejected {} {}: {}", method, path, err);
            }
            Response::from(err)
        }
    };
    Ok(response.map(Full::new))
}
