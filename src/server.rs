//! Accept loop and request dispatch.
//!
//! One spawned task per platform run: it accepts connections until told to
//! stop, serves each connection through hyper, and drains in-flight
//! connections before exiting. Shutdown is programmatic — the platform owns
//! a watch channel instead of listening for process signals, because `stop`
//! has to work mid-test and mid-process, not just at process exit.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::engine::Dispatch;
use crate::method::Method;
use crate::request::{self, Request};
use crate::response::Response;

/// Spawns the accept loop for one server run.
///
/// The returned sender stops the loop; the handle resolves once every
/// in-flight connection has drained.
pub(crate) fn spawn(
    listener: TcpListener,
    table: Arc<dyn Dispatch>,
) -> (watch::Sender<bool>, JoinHandle<()>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run(listener, table, shutdown_rx));
    (shutdown_tx, task)
}

async fn run(listener: TcpListener, table: Arc<dyn Dispatch>, mut shutdown: watch::Receiver<bool>) {
    // JoinSet tracks every spawned connection task so shutdown can wait for
    // them all to finish.
    let mut tasks = tokio::task::JoinSet::new();

    loop {
        tokio::select! {
            // `biased` checks arms top-to-bottom: a stop request wins over
            // queued connections, so no new work starts after `stop`.
            biased;

            _ = shutdown.changed() => break,

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let table = Arc::clone(&table);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    // The closure runs once per request on the connection,
                    // not once per connection.
                    let svc = service_fn(move |req| {
                        let table = Arc::clone(&table);
                        async move { dispatch(table, req).await }
                    });

                    // `auto::Builder` serves HTTP/1.1 or HTTP/2, whatever
                    // the client negotiates.
                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the set does not grow
            // without bound on long runs.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    // Listener drops here: the port is released before the drain, and the
    // platform only reports stopped once both have happened.
    drop(listener);
    while tasks.join_next().await.is_some() {}

    info!("server stopped");
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Core hot path: one request in, one response out.
///
/// The error type is [`Infallible`] — every failure becomes an HTTP response
/// (404, 400), so hyper never sees an error.
async fn dispatch(
    table: Arc<dyn Dispatch>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    Ok(route(table, req).await.into_http())
}

async fn route(table: Arc<dyn Dispatch>, req: hyper::Request<hyper::body::Incoming>) -> Response {
    let Ok(method) = Method::try_from(req.method()) else {
        return not_found();
    };

    let path = normalize_path(req.uri().path()).to_owned();
    let raw_query = req.uri().query().map(str::to_owned);

    let Some((handler, params)) = table.lookup(method, &path) else {
        return not_found();
    };

    let headers = collect_headers(req.headers());
    let bytes = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!("body read error: {e}");
            return Response::status(StatusCode::BAD_REQUEST);
        }
    };

    let content_type = headers.get("content-type").map(String::as_str);
    let Ok(body) = request::parse_body(content_type, &bytes) else {
        return Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .json(&json!({"error": "Invalid JSON"}));
    };

    let query = request::parse_query(raw_query.as_deref());
    handler.call(Request::new(params, query, body, headers)).await
}

fn not_found() -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .json(&json!({"error": "Not Found"}))
}

/// Strips trailing slashes so `/test/` and `/test` hit the same route.
/// The root path is left alone.
pub(crate) fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn collect_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
    let mut out: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else { continue };
        out.entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_owned());
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
