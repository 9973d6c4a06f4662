//! Todo domain model and wire representation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Status assigned to new todos.
pub const STATUS_PENDING: &str = "pending";

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a todo. The store assigns id, status
/// (unless given) and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl NewTodo {
    /// Turn into a full [`Todo`] stamped at `now`.
    pub fn into_todo(self, id: i64, now: DateTime<Utc>) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            status: normalize_status(self.status.as_deref()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lower-cased status, or [`STATUS_PENDING`] when blank.
pub fn normalize_status(status: Option<&str>) -> String {
    match status.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => STATUS_PENDING.to_string(),
    }
}

/// JSON body of `POST /api/v1/todos`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// JSON representation of a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDto {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Todo> for TodoDto {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            created_at: rfc3339(&todo.created_at),
            updated_at: rfc3339(&todo.updated_at),
        }
    }
}

/// RFC 3339 with second precision and a `Z` suffix.
pub fn rfc3339(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status(None), "pending");
        assert_eq!(normalize_status(Some("  ")), "pending");
        assert_eq!(normalize_status(Some("DONE")), "done");
    }

    #[test]
    fn test_dto_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        let todo = NewTodo {
            title: "Buy milk".into(),
            ..Default::default()
        }
        .into_todo(7, at);

        let json = serde_json::to_value(TodoDto::from(todo)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Buy milk",
                "status": "pending",
                "created_at": "2024-03-01T12:30:05Z",
                "updated_at": "2024-03-01T12:30:05Z",
            })
        );
    }

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let err = serde_json::from_str::<CreateTodoRequest>(r#"{"title":"a","unknown_field":1}"#);
        assert!(err.is_err());

        let ok: CreateTodoRequest = serde_json::from_str(r#"{"title":"a"}"#).unwrap();
        assert_eq!(ok.description, None);
    }
}
