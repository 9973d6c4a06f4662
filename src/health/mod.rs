//! Liveness and readiness probes.
//!
//! # Probes
//! - `/healthz`: the process is up and serving (never touches storage)
//! - `/readyz`: the todo repository answers a ping within the deadline
//!
//! # Design Decisions
//! - Probe responses are never cached
//! - A slow storage ping counts as not ready

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;
use crate::todo::model::rfc3339;
use crate::todo::store::Repository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// `GET /healthz`
pub async fn healthz(_req: Request<Body>) -> Response {
    let body = HealthResponse {
        status: "ok".to_string(),
        timestamp: rfc3339(&Utc::now()),
    };
    ([(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
}

/// `GET /readyz` backed by a repository ping.
#[derive(Clone)]
pub struct ReadyProbe {
    repo: Arc<dyn Repository>,
    deadline: Duration,
}

impl ReadyProbe {
    pub fn new(repo: Arc<dyn Repository>, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    pub async fn check(&self) -> Response {
        let outcome = tokio::time::timeout(self.deadline, self.repo.ping()).await;
        match outcome {
            Ok(Ok(())) => (
                [(header::CACHE_CONTROL, "no-store")],
                Json(serde_json::json!({"status": "ready"})),
            )
                .into_response(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Readiness check failed");
                not_ready()
            }
            Err(_) => {
                tracing::warn!(deadline = ?self.deadline, "Readiness check timed out");
                not_ready()
            }
        }
    }
}

fn not_ready() -> Response {
    ApiError::new(
        StatusCode::SERVICE_UNAVAILABLE,
        "storage_not_ready",
        "storage not ready",
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::model::{NewTodo, Todo};
    use crate::todo::store::{MemoryStore, StoreError, StoreResult};
    use async_trait::async_trait;

    /// Repository whose ping never finishes in time or always fails.
    struct Broken {
        hang: bool,
    }

    #[async_trait]
    impl Repository for Broken {
        async fn create(&self, _todo: NewTodo) -> StoreResult<Todo> {
            Err(StoreError::NotFound)
        }
        async fn get(&self, _id: i64) -> StoreResult<Todo> {
            Err(StoreError::NotFound)
        }
        async fn remove(&self, _id: i64) -> StoreResult<()> {
            Err(StoreError::NotFound)
        }
        async fn ping(&self) -> StoreResult<()> {
            if self.hang {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Err(StoreError::Config("down".into()))
        }
    }

    #[tokio::test]
    async fn test_healthz() {
        let res = healthz(Request::new(Body::empty())).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_ready_with_memory_store() {
        let probe = ReadyProbe::new(Arc::new(MemoryStore::new()), Duration::from_secs(1));
        assert_eq!(probe.check().await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_when_ping_fails() {
        let probe = ReadyProbe::new(Arc::new(Broken { hang: false }), Duration::from_secs(1));
        assert_eq!(probe.check().await.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_not_ready_when_ping_is_slow() {
        let probe = ReadyProbe::new(Arc::new(Broken { hang: true }), Duration::from_millis(50));
        assert_eq!(probe.check().await.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
