//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum app, tower layers, static files)
//!     → request.rs (request ID, client address)
//!     → routing::Router::dispatch (custom route table)
//!     → middleware/ (access logging around route handlers)
//!     → response.rs (JSON error bodies)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{bind, build_app, build_routes, HttpServer, ServerError};
