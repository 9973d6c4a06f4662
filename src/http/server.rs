//! HTTP server setup.
//!
//! # Responsibilities
//! - Register every service route on the routing table
//! - Wrap the table in an Axum app with the tower layers (timeout, request ID, tracing)
//! - Serve static files under `/static/`
//! - Run until shutdown, then drain in-flight requests within the deadline

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::health::{healthz, ReadyProbe};
use crate::http::middleware::logging;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::routing::Router as RouteTable;
use crate::todo::handler::{welcome, TodoHandler};
use crate::todo::store::Repository;

/// Errors from binding or running the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bind the TCP listener for `address`.
pub async fn bind(address: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })
}

/// HTTP server for the todo API.
pub struct HttpServer {
    app: axum::Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by `repo`.
    pub fn new(config: AppConfig, repo: Arc<dyn Repository>) -> Self {
        let routes = build_routes(&config, repo);
        tracing::info!(routes = routes.len(), "Routes registered");
        let app = build_app(&config, routes);
        Self { app, config }
    }

    /// The assembled Axum app, for driving requests without a listener.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires (or its sender is dropped).
    ///
    /// After the signal no new connections are accepted and in-flight
    /// requests get `timeouts.shutdown_secs` to complete.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let drain = Duration::from_secs(self.config.timeouts.shutdown_secs);
        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let graceful = async move {
            let _ = shutdown.recv().await;
            tracing::info!(deadline = ?drain, "Draining in-flight requests");
            let _ = draining_tx.send(());
        };

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            res = &mut server => res?,
            Ok(()) = draining_rx => {
                match tokio::time::timeout(drain, &mut server).await {
                    Ok(res) => res?,
                    Err(_) => tracing::warn!(deadline = ?drain, "Drain deadline exceeded, dropping connections"),
                }
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Register the service routes.
///
/// ```text
/// GET    /                   welcome text (access-logged)
/// GET    /healthz            liveness
/// GET    /readyz             storage readiness
/// GET    /ui                 HTML form from the static directory
/// POST   /api/v1/todos       create
/// GET    /api/v1/todos/:id   fetch
/// DELETE /api/v1/todos/:id   remove
/// ```
pub fn build_routes(config: &AppConfig, repo: Arc<dyn Repository>) -> RouteTable {
    let mut routes = RouteTable::new();

    routes.group("/", |root| {
        root.use_middleware(logging());
        root.get("", welcome);
    });

    routes.get("/healthz", healthz);

    let probe = ReadyProbe::new(
        repo.clone(),
        Duration::from_millis(config.timeouts.ready_probe_ms),
    );
    routes.get("/readyz", move |_req: Request<Body>| {
        let probe = probe.clone();
        async move { probe.check().await }
    });

    let ui = PathBuf::from(&config.static_files.dir).join(&config.static_files.ui_file);
    routes.get("/ui", move |req: Request<Body>| serve_ui(ui.clone(), req));

    let todos = Arc::new(TodoHandler::new(repo));
    routes.group("/api/v1", |api| {
        api.use_middleware(logging());
        api.group("todos", |group| todos.register(group));
    });

    routes
}

/// Wrap the routing table in the Axum app and its tower layers.
///
/// Layers run outermost first: request ID assignment, request ID echo,
/// tracing span, request timeout.
#[allow(deprecated)]
pub fn build_app(config: &AppConfig, routes: RouteTable) -> axum::Router {
    axum::Router::new()
        .nest_service("/static", ServeDir::new(&config.static_files.dir))
        .fallback(dispatch)
        .with_state(Arc::new(routes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}

async fn dispatch(State(routes): State<Arc<RouteTable>>, req: Request<Body>) -> Response {
    routes.dispatch(req).await
}

async fn serve_ui(path: PathBuf, req: Request<Body>) -> Response {
    let mut res = match ServeFile::new(&path).oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    };
    if res.status().is_success() {
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
    } else {
        tracing::warn!(path = %path.display(), status = %res.status(), "UI file not served");
    }
    res
}
