// ABOUTME: Logging configuration and structured logging setup for the plan engine
// ABOUTME: Env-driven level and format selection plus domain event helpers for resolution and writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging setup built on `tracing-subscriber`
//!
//! Log lines go to stderr so command output on stdout stays machine-readable.

use crate::config::environment::ServerConfig;
use anyhow::{anyhow, Result};
use liftplan_core::constants::service_names;
use serde_json::json;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for terminals
    Compact,
}

impl LogFormat {
    /// Parse `LOG_FORMAT` values, defaulting to pretty
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            service_name: service_names::LIFTPLAN.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Pretty);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // In production, use more detailed logging
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::LIFTPLAN.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Logging configuration for a loaded server configuration
    ///
    /// `LOG_LEVEL` and `ENVIRONMENT` come from `config`. A set `RUST_LOG`
    /// keeps precedence over `LOG_LEVEL`.
    #[must_use]
    pub fn for_server(config: &ServerConfig) -> Self {
        let mut logging = Self::from_env();
        if env::var("RUST_LOG").is_err() {
            logging.level = config.log_level.to_string();
        }
        logging.environment = config.environment.to_string();
        logging
    }

    /// Build the filter: the configured level plus fixed noise reduction
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(&self.level),
            |directive| EnvFilter::new(&directive),
        );

        base.add_directive(
            "sqlx=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "sqlx::query=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            format!("liftplan={}", self.level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(self.span_events())
                        .json(),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(self.span_events()),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

        self.log_startup_info();
        Ok(())
    }

    /// Log structured startup information
    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "spans": self.include_spans
                }
            }
        });

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Logging initialized: {}",
            config_summary
        );
    }
}

/// Domain event logging helpers
pub struct AppLogger;

impl AppLogger {
    /// Log an admin write against a plan document
    pub fn log_admin_write(operation: &str, resource: &str, resource_id: &str) {
        info!(
            admin.operation = %operation,
            admin.resource = %resource,
            admin.resource_id = %resource_id,
            "Plan document written"
        );
    }

    /// Log a rejected admin write
    pub fn log_admin_rejection(operation: &str, reason: &str) {
        warn!(
            admin.operation = %operation,
            admin.reason = %reason,
            "Plan document write rejected"
        );
    }

    /// Log a completed exercise and its progression outcome
    pub fn log_progression(user_id: &str, exercise_id: &str, status: &str, next_weight: Option<f64>) {
        info!(
            user.id = %user_id,
            exercise.id = %exercise_id,
            progression.status = %status,
            progression.next_weight = ?next_weight,
            "Exercise progression recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::{Environment, LogLevel};
    use serial_test::serial;

    #[test]
    fn test_log_format_parse_defaults_to_pretty() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("fancy"), LogFormat::Pretty);
    }

    #[test]
    #[serial]
    fn test_server_log_level_applied_without_rust_log() {
        env::remove_var("RUST_LOG");
        let config = ServerConfig {
            environment: Environment::Production,
            log_level: LogLevel::Debug,
            ..ServerConfig::default()
        };

        let logging = LoggingConfig::for_server(&config);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.environment, "production");
    }

    #[test]
    #[serial]
    fn test_rust_log_overrides_server_log_level() {
        env::set_var("RUST_LOG", "trace");
        let config = ServerConfig {
            log_level: LogLevel::Warn,
            ..ServerConfig::default()
        };

        let logging = LoggingConfig::for_server(&config);
        env::remove_var("RUST_LOG");

        assert_eq!(logging.level, "trace");
    }

    #[test]
    fn test_default_config_uses_service_name() {
        let config = LoggingConfig::default();
        assert_eq!(config.service_name, "liftplan");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.include_spans);
    }
}
