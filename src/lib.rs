//! Todo HTTP API on a small custom routing layer.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod todo;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
