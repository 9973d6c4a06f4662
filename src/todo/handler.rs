//! HTTP handlers for the todo resource.
//!
//! # Routes (relative to the group they are registered in)
//! - `POST ""` create
//! - `GET ":id"` fetch
//! - `DELETE ":id"` remove

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Json;

use crate::http::response::ApiError;
use crate::routing::{Router, ScopeExt};
use crate::todo::model::{CreateTodoRequest, NewTodo, TodoDto};
use crate::todo::store::{Repository, StoreError};
use crate::todo::validation::validate_title;

/// Largest accepted request body (1 MiB).
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// Todo handlers over a shared repository.
#[derive(Clone)]
pub struct TodoHandler {
    repo: Arc<dyn Repository>,
}

impl TodoHandler {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Register create/fetch/remove on `todos`.
    pub fn register(self: Arc<Self>, todos: &mut Router) {
        let h = self.clone();
        todos.post("", move |req: Request<Body>| {
            let h = h.clone();
            async move { h.create(req).await }
        });

        let h = self.clone();
        todos.get(":id", move |req: Request<Body>| {
            let h = h.clone();
            async move { h.get_by_id(req).await }
        });

        let h = self;
        todos.delete(":id", move |req: Request<Body>| {
            let h = h.clone();
            async move { h.remove_by_id(req).await }
        });
    }

    pub async fn create(
        &self,
        req: Request<Body>,
    ) -> Result<(StatusCode, Json<TodoDto>), ApiError> {
        if !is_json(&req) {
            return Err(ApiError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                "expect application/json",
            ));
        }

        let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|_| {
                ApiError::new(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "payload_too_large",
                    "request body exceeds 1 MiB",
                )
            })?;

        let input: CreateTodoRequest = serde_json::from_slice(&bytes).map_err(|_| {
            ApiError::new(StatusCode::BAD_REQUEST, "invalid_json", "unable to process json")
        })?;

        let title = validate_title(&input.title).map_err(|e| {
            ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_content", e.to_string())
        })?;

        let todo = self
            .repo
            .create(NewTodo {
                title,
                description: input.description,
                status: None,
            })
            .await
            .map_err(store_error)?;

        tracing::debug!(id = todo.id, "Todo created");
        Ok((StatusCode::CREATED, Json(TodoDto::from(todo))))
    }

    pub async fn get_by_id(&self, req: Request<Body>) -> Result<Json<TodoDto>, ApiError> {
        let id = todo_id(&req)?;
        let todo = self.repo.get(id).await.map_err(store_error)?;
        Ok(Json(TodoDto::from(todo)))
    }

    pub async fn remove_by_id(&self, req: Request<Body>) -> Result<StatusCode, ApiError> {
        let id = todo_id(&req)?;
        self.repo.remove(id).await.map_err(store_error)?;
        tracing::debug!(id, "Todo removed");
        Ok(StatusCode::NO_CONTENT)
    }
}

/// Plain-text landing page.
pub async fn welcome(_req: Request<Body>) -> &'static str {
    "Welcome to my website"
}

/// `Content-Type: application/json`, parameters allowed.
fn is_json(req: &Request<Body>) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Positive integer `id` from the route scope.
fn todo_id(req: &Request<Body>) -> Result<i64, ApiError> {
    let scope = req.scope().ok_or_else(|| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "invalid_parameters",
            "invalid request parameters",
        )
    })?;

    let raw = scope
        .param("id")
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "invalid_id", "unable to get id"))?;

    let id: i64 = raw
        .parse()
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "invalid_id", "invalid todo id"))?;

    if id <= 0 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            "positive id required",
        ));
    }
    Ok(id)
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => {
            ApiError::new(StatusCode::NOT_FOUND, "todo_not_found", "todo not found")
        }
        other => {
            tracing::error!(error = %other, "Storage operation failed");
            ApiError::internal("storage_error")
        }
    }
}
