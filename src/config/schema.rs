//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the todo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Todo storage backend.
    pub storage: StorageConfig,

    /// Static file serving.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one request/response in seconds.
    pub request_secs: u64,

    /// Time allowed for in-flight requests to drain on shutdown, in seconds.
    pub shutdown_secs: u64,

    /// Deadline for the storage ping behind `/readyz`, in milliseconds.
    pub ready_probe_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 15,
            shutdown_secs: 5,
            ready_probe_ms: 1000,
        }
    }
}

/// Which repository implementation backs the todo API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "postgres" => Ok(StorageKind::Postgres),
            other => Err(format!("unknown storage kind '{other}'")),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend selection.
    pub kind: StorageKind,

    /// Postgres connection URL (required when `kind = "postgres"`).
    pub database_url: Option<String>,

    /// Maximum pooled database connections.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Memory,
            database_url: None,
            max_connections: 5,
        }
    }
}

/// Static file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served under `/static/`.
    pub dir: String,

    /// File inside `dir` served at `/ui`.
    pub ui_file: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: "static".to_string(),
            ui_file: "form.html".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.kind, StorageKind::Memory);
        assert_eq!(config.static_files.ui_file, "form.html");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [storage]
            kind = "postgres"
            database_url = "postgres://todo@localhost/todo"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.kind, StorageKind::Postgres);
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_example_file_parses() {
        let config: AppConfig = toml::from_str(include_str!("../../config.example.toml")).unwrap();
        assert_eq!(config.timeouts.ready_probe_ms, 1000);
        assert_eq!(config.static_files.dir, "static");
    }

    #[test]
    fn test_storage_kind_from_str() {
        assert_eq!("Postgres".parse::<StorageKind>(), Ok(StorageKind::Postgres));
        assert_eq!(" memory ".parse::<StorageKind>(), Ok(StorageKind::Memory));
        assert!("redis".parse::<StorageKind>().is_err());
    }
}
