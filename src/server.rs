//! HTTP server and graceful shutdown.
//!
//! A thin harness for running a handler chain: hyper drives the
//! connections, the chain produces the responses. On SIGTERM or Ctrl-C the
//! server stops accepting, drains every in-flight connection, and returns
//! from [`Server::serve`] so `main` can exit cleanly.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The HTTP server.
pub struct Server {
    binding: Binding,
}

enum Binding {
    Addr(SocketAddr),
    Listener(TcpListener),
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { binding: Binding::Addr(addr) }
    }

    /// Serves on an already-bound listener. Use this when the OS picks the
    /// port (`127.0.0.1:0`) and the caller needs `local_addr` up front.
    pub fn from_listener(listener: TcpListener) -> Self {
        Self { binding: Binding::Listener(listener) }
    }

    /// Starts accepting connections and dispatching every request through
    /// `handler` — typically a middleware-wrapped chain.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, handler: impl Handler) -> Result<(), Error> {
        let listener = match self.binding {
            Binding::Addr(addr) => TcpListener::bind(addr).await?,
            Binding::Listener(listener) => listener,
        };
        let handler: BoxedHandler = handler.into_boxed_handler();

        info!(addr = %listener.local_addr()?, "tolk listening");

        // JoinSet tracks every connection task so shutdown can drain them.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // `biased` checks shutdown before the accept arm, so a
                // signal stops new connections even when more are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let handler = Arc::clone(&handler);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection, not
                        // once per connection.
                        let svc = service_fn(move |req| {
                            let handler = Arc::clone(&handler);
                            async move { dispatch(handler, req).await }
                        });

                        // `auto::Builder` speaks whichever of HTTP/1.1 and
                        // HTTP/2 the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not
                // grow without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("tolk stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Collects the body, runs the chain, and converts the result back to a
/// hyper response. Infallible: failures become status codes, hyper never
/// sees an error.
async fn dispatch(
    handler: BoxedHandler,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<http_body_util::Full<bytes::Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!("body read error: {e}");
            let resp = Response::status(http::StatusCode::BAD_REQUEST);
            return Ok(resp.into_http());
        }
    };

    let req = Request::from(http::Request::from_parts(parts, body));
    Ok(handler.call(req).await.into_http())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal: SIGTERM or SIGINT on Unix,
/// Ctrl-C elsewhere.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
