// ABOUTME: Logging configuration and structured logging setup for the gallery backend
// ABOUTME: Configures log levels, output formats, and structured event helpers for pipeline stages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! Structured logging configuration
//!
//! Logs are written to stderr so the CLI can keep stdout for JSON results.

use std::env;
use std::io;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::constants::service_names;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
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
    /// Parse a format name, falling back to `Pretty`
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
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
            service_name: service_names::CANVASCRAFT_SERVER.into(),
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
            .map(|name| LogFormat::from_name(&name))
            .unwrap_or(LogFormat::Pretty);
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".into());

        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::CANVASCRAFT_SERVER.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Build the filter, applying noise reduction for HTTP and SQL internals
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(&self.level),
            |directive| EnvFilter::new(&directive),
        );

        [
            "hyper=warn",
            "hyper_util=warn",
            "reqwest=warn",
            "rustls=warn",
            "sqlx=warn",
            "sqlx::query=warn",
        ]
        .into_iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(base, EnvFilter::add_directive)
        .add_directive(
            format!("canvascraft_server={}", self.level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(span_events)
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
                        .with_span_events(span_events),
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

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "CanvasCraft backend starting up"
        );

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

        info!("Logging configured: {}", config_summary);
    }
}

/// Structured log events for gallery operations
pub struct AppLogger;

impl AppLogger {
    /// Log a generation pipeline stage transition
    pub fn log_generation_stage(painting_id: &str, stage: &str, duration_ms: u64) {
        info!(
            painting.id = %painting_id,
            generation.stage = %stage,
            generation.duration_ms = %duration_ms,
            "Generation stage reached"
        );
    }

    /// Log a failed generation together with the compensating action taken
    pub fn log_generation_failure(
        painting_id: Option<&str>,
        stage: &str,
        error_code: &str,
        compensated: bool,
    ) {
        warn!(
            painting.id = painting_id.unwrap_or("none"),
            generation.stage = %stage,
            error.code = %error_code,
            generation.compensated = %compensated,
            "Generation failed"
        );
    }

    /// Log a call to a remote service
    pub fn log_external_call(service: &str, operation: &str, success: bool, duration_ms: u64) {
        info!(
            external.service = %service,
            external.operation = %operation,
            external.success = %success,
            external.duration_ms = %duration_ms,
            "External service call"
        );
    }

    /// Log a reply that fell back to the placeholder text
    pub fn log_reply_degraded(painting_id: &str, reason: &str) {
        warn!(
            painting.id = %painting_id,
            dialogue.reason = %reason,
            "Comment reply degraded to placeholder"
        );
    }

    /// Log database operations
    pub fn log_database_operation(operation: &str, table: &str, success: bool, duration_ms: u64) {
        info!(
            db.operation = %operation,
            db.table = %table,
            db.success = %success,
            db.duration_ms = %duration_ms,
            "Database operation"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_name("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::from_name("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_default_service_name() {
        let config = LoggingConfig::default();
        assert_eq!(config.service_name, service_names::CANVASCRAFT_SERVER);
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
