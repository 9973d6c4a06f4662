//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that the selected storage backend is fully configured
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, StorageKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("storage.database_url is required when storage.kind is postgres")]
    MissingDatabaseUrl,

    #[error("storage.max_connections must be greater than zero")]
    ZeroPoolSize,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    let timeouts = [
        ("request_secs", config.timeouts.request_secs),
        ("shutdown_secs", config.timeouts.shutdown_secs),
        ("ready_probe_ms", config.timeouts.ready_probe_ms),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.storage.kind == StorageKind::Postgres {
        let has_url = config
            .storage
            .database_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if !has_url {
            errors.push(ValidationError::MissingDatabaseUrl);
        }
        if config.storage.max_connections == 0 {
            errors.push(ValidationError::ZeroPoolSize);
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "  ".into();
        config.timeouts.request_secs = 0;
        config.timeouts.ready_probe_ms = 0;
        config.storage.kind = StorageKind::Postgres;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyBindAddress,
                ValidationError::ZeroTimeout("request_secs"),
                ValidationError::ZeroTimeout("ready_probe_ms"),
                ValidationError::MissingDatabaseUrl,
            ]
        );
    }

    #[test]
    fn test_postgres_with_url_is_valid() {
        let mut config = AppConfig::default();
        config.storage.kind = StorageKind::Postgres;
        config.storage.database_url = Some("postgres://localhost/todo".into());
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidMetricsAddress("nope".into())])
        );
    }
}
