//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{AppConfig, StorageKind};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides read through `lookup`. Empty values are ignored.
///
/// - `HTTP_PORT`: `8080`, `:8080` or `host:8080`
/// - `STATIC_DIR`
/// - `REPO_TYPE`: `memory` or `postgres`
/// - `DATABASE_URL`
/// - `LOG_LEVEL`
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("HTTP_PORT") {
        config.listener.bind_address = bind_address_from_port(port.trim());
    }
    if let Some(dir) = get("STATIC_DIR") {
        config.static_files.dir = dir;
    }
    if let Some(kind) = get("REPO_TYPE") {
        config.storage.kind = kind
            .parse::<StorageKind>()
            .map_err(|reason| ConfigError::Env {
                var: "REPO_TYPE",
                reason,
            })?;
    }
    if let Some(url) = get("DATABASE_URL") {
        config.storage.database_url = Some(url);
    }
    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

fn bind_address_from_port(port: &str) -> String {
    if let Some(bare) = port.strip_prefix(':') {
        format!("0.0.0.0:{bare}")
    } else if port.contains(':') {
        port.to_string()
    } else {
        format!("0.0.0.0:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_bind_address_from_port() {
        assert_eq!(bind_address_from_port("80"), "0.0.0.0:80");
        assert_eq!(bind_address_from_port(":8081"), "0.0.0.0:8081");
        assert_eq!(bind_address_from_port("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("HTTP_PORT", "3000"),
                ("STATIC_DIR", "/srv/static"),
                ("REPO_TYPE", "postgres"),
                ("DATABASE_URL", "postgres://u:p@db/todo"),
                ("LOG_LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.static_files.dir, "/srv/static");
        assert_eq!(config.storage.kind, StorageKind::Postgres);
        assert_eq!(config.storage.database_url.as_deref(), Some("postgres://u:p@db/todo"));
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, env(&[("HTTP_PORT", ""), ("STATIC_DIR", "  ")])).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.static_files.dir, "static");
    }

    #[test]
    fn test_unknown_repo_type() {
        let mut config = AppConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("REPO_TYPE", "mongo")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "REPO_TYPE", .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("todo-api-config-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[listener]\nbind_address = \"127.0.0.1:0\"\n[timeouts]\nrequest_secs = 3\n",
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let config: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:0");
        assert_eq!(config.timeouts.request_secs, 3);
        assert_eq!(config.timeouts.shutdown_secs, 5);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validation_error_message() {
        let err = ConfigError::Validation(vec![
            ValidationError::EmptyBindAddress,
            ValidationError::MissingDatabaseUrl,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: listener.bind_address must not be empty, \
             storage.database_url is required when storage.kind is postgres"
        );
    }
}
