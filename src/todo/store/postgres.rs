//! Postgres-backed todo store.
//!
//! Expects a `todos` table with columns `id` (bigserial), `title`,
//! `description` (nullable), `status`, `created_at` and `updated_at`
//! (timestamptz). Creating that table is left to the deployment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::todo::model::{NewTodo, Todo};
use crate::todo::store::{Repository, StoreError, StoreResult};

/// Repository over a pooled Postgres connection.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool that opens connections on first use.
    ///
    /// Only the URL is checked here; an unreachable server shows up later
    /// through [`Repository::ping`].
    pub fn connect_lazy(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)?;
        Ok(Self::new(pool))
    }
}

fn todo_from_row(row: &PgRow) -> Result<Todo, sqlx::Error> {
    Ok(Todo {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: row.try_get("status")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl Repository for PostgresStore {
    async fn create(&self, todo: NewTodo) -> StoreResult<Todo> {
        let mut todo = todo.into_todo(0, Utc::now());

        let row = sqlx::query(
            "INSERT INTO todos (title, description, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(&todo.status)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .fetch_one(&self.pool)
        .await?;

        todo.id = row.try_get("id")?;
        Ok(todo)
    }

    async fn get(&self, id: i64) -> StoreResult<Todo> {
        if id <= 0 {
            return Err(StoreError::NotFound);
        }

        let row = sqlx::query(
            "SELECT id, title, description, status, created_at, updated_at \
             FROM todos \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(todo_from_row(&row)?),
            None => Err(StoreError::NotFound),
        }
    }

    async fn remove(&self, id: i64) -> StoreResult<()> {
        if id <= 0 {
            return Err(StoreError::NotFound);
        }

        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
