//! Todo resource: model, validation, storage and HTTP handlers.
//!
//! # Data Flow
//! ```text
//! routing::Router (POST/GET/DELETE under /api/v1/todos)
//!     → handler.rs (decode, validate, map errors)
//!     → store (Repository: memory or Postgres)
//!     → model.rs (TodoDto serialized back as JSON)
//! ```

pub mod handler;
pub mod model;
pub mod store;
pub mod validation;

pub use handler::{welcome, TodoHandler, MAX_BODY_BYTES};
pub use model::{NewTodo, Todo, TodoDto};
pub use store::{Repository, StoreError, StoreResult};
pub use validation::{validate_title, TitleError, MAX_TITLE_LEN};
