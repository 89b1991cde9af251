// ABOUTME: Unified error handling for the generation pipeline, dialogue engine, and ledger
// ABOUTME: Defines error codes, the AppError type, and the structured response callers receive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Unified Error Handling System
//!
//! Every failure that crosses a module boundary is an [`AppError`] carrying an
//! [`ErrorCode`] (the error *kind*) and a human-readable message. Callers never
//! receive a silently empty success: the facade converts any error into an
//! [`ErrorResponse`] with the same kind and message.
//!
//! The codes are grouped by how the pipeline reacts to them:
//!
//! - **Rejections** (`InvalidRequest`, `ResourceNotFound`): no side effects.
//! - **Fatal pipeline errors** (`UpstreamUnavailable`, `GenerationFailed`,
//!   `HostingFailed`): the orchestrator deletes any provisional record.
//! - **Degradable errors** (`CaptionFailed`, `DialogueFailed`): absorbed and
//!   replaced with defaults where the operation allows it.
//! - **Internal errors** (`DatabaseError`, `ConfigError`, ...): surfaced as-is,
//!   never retried.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// A required request field is missing or empty
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest = 3000,

    // Resource Management (4000-4999)
    /// The referenced painting or comment does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    /// The text-to-image service responded with a non-success status
    #[serde(rename = "UPSTREAM_UNAVAILABLE")]
    UpstreamUnavailable = 5000,
    /// The generation pipeline could not produce an image
    #[serde(rename = "GENERATION_FAILED")]
    GenerationFailed = 5001,
    /// The captioning service failed or returned an undecodable payload
    #[serde(rename = "CAPTION_FAILED")]
    CaptionFailed = 5002,
    /// The image hosting service failed or reported `success: false`
    #[serde(rename = "HOSTING_FAILED")]
    HostingFailed = 5003,
    /// The conversational text service failed or produced no text
    #[serde(rename = "DIALOGUE_FAILED")]
    DialogueFailed = 5004,

    // Configuration (6000-6999)
    /// Configuration value is invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration value is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Persistence layer failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Data serialization/deserialization failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidRequest => 400,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 502 Bad Gateway
            Self::GenerationFailed
            | Self::CaptionFailed
            | Self::HostingFailed
            | Self::DialogueFailed => 502,

            // 503 Service Unavailable
            Self::UpstreamUnavailable => 503,

            // 500 Internal Server Error
            Self::ConfigError
            | Self::ConfigMissing
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "The request is missing a required field",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::UpstreamUnavailable => "The image generation service is unavailable",
            Self::GenerationFailed => "The painting could not be generated",
            Self::CaptionFailed => "The painting could not be described",
            Self::HostingFailed => "The painting could not be uploaded",
            Self::DialogueFailed => "The AI painter could not produce a reply",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether this error aborts the generation pipeline and triggers
    /// deletion of the provisional painting record
    #[must_use]
    pub const fn is_fatal_to_pipeline(&self) -> bool {
        !matches!(self, Self::CaptionFailed)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the serde names so logs and responses agree
        let name = match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::GenerationFailed => "GENERATION_FAILED",
            Self::CaptionFailed => "CAPTION_FAILED",
            Self::HostingFailed => "HOSTING_FAILED",
            Self::DialogueFailed => "DIALOGUE_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ConfigMissing => "CONFIG_MISSING",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
        };
        f.write_str(name)
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Painting or comment ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            resource_id: None,
            details: serde_json::Value::Null,
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Replace the error code, keeping message and context
    ///
    /// Used where a lower layer's failure must be reported under the kind the
    /// calling stage owns (e.g. an HTTP failure inside captioning becomes
    /// `CaptionFailed`).
    #[must_use]
    pub fn recode(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Structured failure returned to callers (kind + message)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Error kind
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Painting or comment the failure relates to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Extra structured context
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                resource_id: error.context.resource_id,
                details: error.context.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Missing or empty request field
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Text-to-image service unavailable
    #[must_use]
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, message)
    }

    /// Image generation failed
    #[must_use]
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// Captioning failed
    #[must_use]
    pub fn caption_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CaptionFailed, message)
    }

    /// Image hosting failed
    #[must_use]
    pub fn hosting_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::HostingFailed, message)
    }

    /// Dialogue generation failed
    #[must_use]
    pub fn dialogue_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DialogueFailed, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration missing
    #[must_use]
    pub fn config_missing(variable: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("{variable} environment variable not set"),
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(format!("{error:#}"))
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string()).with_source(error)
    }
}
