//! The HTTP server loop.
//!
//! Built on Hyper and Tokio: a TCP accept loop spawning one task per
//! connection, HTTP/1 connection handling, and shutdown on SIGINT/SIGTERM.
//! All request semantics live in the [`RouteAdapter`]; this module only
//! moves bytes between the socket and the adapter.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::adapter::{Reply, RouteAdapter};

/// Server failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listen address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The configured listen address.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// The Aquila HTTP server.
///
/// # Example
///
/// ```rust,ignore
/// use aquila_server::{RouteAdapter, Server};
///
/// #[tokio::main]
/// async fn main() -> Result<(), aquila_server::ServerError> {
///     let adapter = RouteAdapter::new();
///     Server::new("127.0.0.1:3000", adapter).run().await
/// }
/// ```
pub struct Server {
    addr: String,
    adapter: Arc<RouteAdapter>,
}

impl Server {
    /// Creates a server over a fully registered adapter.
    #[must_use]
    pub fn new(addr: impl Into<String>, adapter: RouteAdapter) -> Self {
        Self {
            addr: addr.into(),
            adapter: Arc::new(adapter),
        }
    }

    /// Runs until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(os_shutdown()).await
    }

    /// Runs until the given shutdown future resolves. Useful for tests and
    /// programmatic shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.addr).await.map_err(|source| {
            ServerError::Bind {
                addr: self.addr.clone(),
                source,
            }
        })?;

        tracing::info!(addr = %self.addr, routes = self.adapter.route_count(), "server listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, remote_addr)) => {
                            let adapter = Arc::clone(&self.adapter);
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req: Request<Incoming>| {
                                    let adapter = Arc::clone(&adapter);
                                    async move {
                                        Ok::<_, Infallible>(handle_request(&adapter, req).await)
                                    }
                                });

                                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                                    tracing::debug!(remote = %remote_addr, error = %err, "connection closed with error");
                                }
                            });
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "failed to accept connection");
                        }
                    }
                }

                () = &mut shutdown => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Resolves on SIGINT, or SIGTERM where available.
async fn os_shutdown() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Collects the request body and hands the call to the adapter.
async fn handle_request(adapter: &RouteAdapter, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read request body");
            let reply = Reply::internal();
            return into_response(reply);
        }
    };

    let reply = adapter
        .dispatch(&parts.method, parts.uri.path(), &parts.headers, &bytes)
        .await;

    into_response(reply)
}

/// Serializes a reply into an HTTP response.
fn into_response(reply: Reply) -> Response<Full<Bytes>> {
    let (status, body) = reply.into_parts();

    match body {
        Some(value) => {
            let bytes = serde_json::to_vec(&value).unwrap_or_else(|_| b"{}".to_vec());
            Response::builder()
                .status(status)
                .header(CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(bytes)))
                .unwrap_or_else(|_| {
                    let mut response = Response::new(Full::new(Bytes::new()));
                    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                    response
                })
        }
        None => Response::builder()
            .status(status)
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|_| Response::new(Full::new(Bytes::new()))),
    }
}
