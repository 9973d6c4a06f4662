//! Todo storage.
//!
//! # Responsibilities
//! - Define the [`Repository`] contract used by the HTTP handlers
//! - Provide an in-memory and a Postgres implementation
//! - Pick one at startup from configuration
//!
//! # Design Decisions
//! - Handlers only see `Arc<dyn Repository>`
//! - Each implementation owns its own synchronization
//! - Missing rows are `StoreError::NotFound`, everything else is a backend error

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{StorageConfig, StorageKind};
use crate::todo::model::{NewTodo, Todo};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors returned by a repository.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage not configured: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for todos.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Store a new todo and return it with id, status and timestamps set.
    async fn create(&self, todo: NewTodo) -> StoreResult<Todo>;

    /// Fetch a todo by id.
    async fn get(&self, id: i64) -> StoreResult<Todo>;

    /// Delete a todo by id.
    async fn remove(&self, id: i64) -> StoreResult<()>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;
}

/// Build the repository selected by `config.kind`.
pub fn from_config(config: &StorageConfig) -> StoreResult<Arc<dyn Repository>> {
    match config.kind {
        StorageKind::Memory => {
            tracing::info!("Using in-memory todo store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| StoreError::Config("database_url is not set".to_string()))?;
            let store = PostgresStore::connect_lazy(url, config.max_connections)?;
            tracing::info!(max_connections = config.max_connections, "Using Postgres todo store");
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_memory() {
        let repo = from_config(&StorageConfig::default()).unwrap();
        assert!(repo.ping().await.is_ok());
    }

    #[test]
    fn test_from_config_postgres_requires_url() {
        let config = StorageConfig {
            kind: StorageKind::Postgres,
            database_url: None,
            max_connections: 1,
        };
        assert!(matches!(from_config(&config), Err(StoreError::Config(_))));
    }
}
