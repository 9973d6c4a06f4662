//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use todo_api::config::AppConfig;
use todo_api::todo::store::{MemoryStore, Repository};
use todo_api::http::ServerError;
use todo_api::{HttpServer, Shutdown};

/// Defaults with an ephemeral loopback listener and short timeouts.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.timeouts.request_secs = 5;
    config.timeouts.shutdown_secs = 1;
    config
}

/// App over a fresh in-memory store.
pub fn app() -> axum::Router {
    app_with(test_config(), Arc::new(MemoryStore::new()))
}

pub fn app_with(config: AppConfig, repo: Arc<dyn Repository>) -> axum::Router {
    HttpServer::new(config, repo).app()
}

/// Drive one request through `app` without a socket.
pub async fn send(app: &axum::Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ServerError>>,
}

#[allow(dead_code)]
pub async fn start_server() -> RunningServer {
    let config = test_config();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config, Arc::new(MemoryStore::new()));
    let handle = tokio::spawn(server.run(listener, rx));

    RunningServer {
        addr,
        shutdown,
        handle,
    }
}
