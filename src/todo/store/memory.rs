//! In-memory todo store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::todo::model::{NewTodo, Todo};
use crate::todo::store::{Repository, StoreError, StoreResult};

/// A thread-safe map of todos keyed by id.
///
/// Ids start at 1 and are never reused, even after removal.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<i64, Todo>,
    last_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> HashMap<i64, Todo> {
        self.items
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect()
    }
}

#[async_trait]
impl Repository for MemoryStore {
    async fn create(&self, todo: NewTodo) -> StoreResult<Todo> {
        let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
        let todo = todo.into_todo(id, Utc::now());
        self.items.insert(id, todo.clone());
        Ok(todo)
    }

    async fn get(&self, id: i64) -> StoreResult<Todo> {
        self.items
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn remove(&self, id: i64) -> StoreResult<()> {
        self.items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
