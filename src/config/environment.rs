// ABOUTME: Environment configuration for the gallery backend
// ABOUTME: Parses database location, remote service credentials, and pipeline behaviour flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! Environment-based configuration
//!
//! Credentials are optional at load time. A missing key only becomes a
//! `ConfigMissing` error when the adapter needing it is built, so the
//! in-memory backend and offline commands run without any keys.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{defaults, dialogue, endpoints, models};
use crate::dialogue::ReplyMode;
use crate::errors::{AppError, AppResult};
use crate::generation::FinalizeMode;

/// Where gallery records are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// `SQLite` in-memory database (`sqlite::memory:`)
    SqliteMemory,
    /// Process-local store without `SQLite` (`memory://`)
    InProcess,
}

impl DatabaseUrl {
    /// Parse a database URL
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for empty URLs and unsupported schemes.
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::config("DATABASE_URL cannot be empty"));
        }
        if s == "memory://" {
            return Ok(Self::InProcess);
        }
        if let Some(rest) = s.strip_prefix("sqlite:") {
            return match rest.strip_prefix("//").unwrap_or(rest) {
                ":memory:" => Ok(Self::SqliteMemory),
                "" => Err(AppError::config("sqlite URL is missing a file path")),
                path => Ok(Self::SQLite {
                    path: PathBuf::from(path),
                }),
            };
        }
        if s.contains("://") {
            return Err(AppError::config(format!(
                "Unsupported database URL scheme: {s}"
            )));
        }
        // Bare paths are treated as SQLite files
        Ok(Self::SQLite {
            path: PathBuf::from(s),
        })
    }

    /// Convert to a connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::SqliteMemory => "sqlite::memory:".to_owned(),
            Self::InProcess => "memory://".to_owned(),
        }
    }

    /// Whether data is lost when the process exits
    #[must_use]
    pub const fn is_ephemeral(&self) -> bool {
        matches!(self, Self::SqliteMemory | Self::InProcess)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        let path = defaults::DATABASE_URL
            .strip_prefix("sqlite:")
            .unwrap_or(defaults::DATABASE_URL);
        Self::SQLite {
            path: PathBuf::from(path),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Gemini (text + vision) settings
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key, if configured
    pub api_key: Option<String>,
    /// Model used for dialogue and detail imagination
    pub text_model: String,
    /// Model used for captioning
    pub vision_model: String,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .finish()
    }
}

/// Settings for a keyed HTTP service (text-to-image, image hosting)
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteServiceConfig {
    /// API key, if configured
    pub api_key: Option<String>,
    /// Endpoint URL
    pub base_url: String,
}

impl fmt::Debug for RemoteServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteServiceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RemoteServiceConfig {
    /// Return the key or a `ConfigMissing` error naming `variable`
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when no key was configured.
    pub fn require_key(&self, variable: &str) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::config_missing(variable))
    }
}

/// Generation pipeline behaviour
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Run the caption stage; when off the prompt becomes the detail
    pub caption_enabled: bool,
    /// Respond before or after finalization
    pub finalize_mode: FinalizeMode,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            caption_enabled: true,
            finalize_mode: FinalizeMode::default(),
        }
    }
}

/// Comment reply behaviour
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DialogueSettings {
    /// Output token ceiling for replies
    pub reply_max_tokens: u32,
    /// Primed multi-turn persona or single prompt
    pub reply_mode: ReplyMode,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            reply_max_tokens: dialogue::DEFAULT_REPLY_MAX_TOKENS,
            reply_mode: ReplyMode::default(),
        }
    }
}

/// Complete backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Persistence location
    pub database: DatabaseUrl,
    /// Gemini settings
    pub gemini: GeminiConfig,
    /// Text-to-image service
    pub image_synthesis: RemoteServiceConfig,
    /// Image hosting service
    pub image_hosting: RemoteServiceConfig,
    /// HTTP timeout applied by every adapter client
    pub http_timeout_secs: u64,
    /// Generation pipeline flags
    pub generation: GenerationSettings,
    /// Comment reply flags
    pub dialogue: DialogueSettings,
}

/// Environment variable names
pub mod env_vars {
    /// Database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Legacy Gemini API key name
    pub const GOOGLE_API: &str = "GOOGLE_API";
    /// Gemini text model
    pub const GEMINI_TEXT_MODEL: &str = "GEMINI_TEXT_MODEL";
    /// Gemini vision model
    pub const GEMINI_VISION_MODEL: &str = "GEMINI_VISION_MODEL";
    /// Text-to-image API key
    pub const CLIPDROP_API_KEY: &str = "CLIPDROP_API_KEY";
    /// Legacy text-to-image API key name
    pub const APIKEY: &str = "APIKEY";
    /// Text-to-image endpoint
    pub const CLIPDROP_BASE_URL: &str = "CLIPDROP_BASE_URL";
    /// Image hosting key
    pub const IMAGE_HOSTING_KEY: &str = "IMAGE_HOSTING_KEY";
    /// Image hosting endpoint
    pub const IMAGE_HOSTING_BASE_URL: &str = "IMAGE_HOSTING_BASE_URL";
    /// Adapter HTTP timeout
    pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
    /// Caption stage toggle
    pub const GENERATION_CAPTION_ENABLED: &str = "GENERATION_CAPTION_ENABLED";
    /// Finalize mode
    pub const GENERATION_FINALIZE_MODE: &str = "GENERATION_FINALIZE_MODE";
    /// Reply token ceiling
    pub const COMMENT_REPLY_MAX_TOKENS: &str = "COMMENT_REPLY_MAX_TOKENS";
    /// Reply mode
    pub const COMMENT_REPLY_MODE: &str = "COMMENT_REPLY_MODE";
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable holds an unparseable value or
    /// the result fails [`ServerConfig::validate`].
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            database: DatabaseUrl::parse_url(&env_var_or(
                env_vars::DATABASE_URL,
                defaults::DATABASE_URL,
            ))?,
            gemini: GeminiConfig {
                api_key: first_env(&[env_vars::GEMINI_API_KEY, env_vars::GOOGLE_API]),
                text_model: env_var_or(env_vars::GEMINI_TEXT_MODEL, models::DEFAULT_TEXT_MODEL),
                vision_model: env_var_or(
                    env_vars::GEMINI_VISION_MODEL,
                    models::DEFAULT_VISION_MODEL,
                ),
            },
            image_synthesis: RemoteServiceConfig {
                api_key: first_env(&[env_vars::CLIPDROP_API_KEY, env_vars::APIKEY]),
                base_url: env_var_or(
                    env_vars::CLIPDROP_BASE_URL,
                    endpoints::CLIPDROP_TEXT_TO_IMAGE,
                ),
            },
            image_hosting: RemoteServiceConfig {
                api_key: first_env(&[env_vars::IMAGE_HOSTING_KEY]),
                base_url: env_var_or(env_vars::IMAGE_HOSTING_BASE_URL, endpoints::IMGBB_UPLOAD),
            },
            http_timeout_secs: parse_env(
                env_vars::HTTP_TIMEOUT_SECS,
                defaults::HTTP_TIMEOUT_SECS,
            )?,
            generation: GenerationSettings {
                caption_enabled: parse_bool_env(env_vars::GENERATION_CAPTION_ENABLED, true)?,
                finalize_mode: parse_env(
                    env_vars::GENERATION_FINALIZE_MODE,
                    FinalizeMode::default(),
                )?,
            },
            dialogue: DialogueSettings {
                reply_max_tokens: parse_env(
                    env_vars::COMMENT_REPLY_MAX_TOKENS,
                    dialogue::DEFAULT_REPLY_MAX_TOKENS,
                )?,
                reply_mode: parse_env(env_vars::COMMENT_REPLY_MODE, ReplyMode::default())?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero timeout or zero token ceiling.
    pub fn validate(&self) -> AppResult<()> {
        if self.http_timeout_secs == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::HTTP_TIMEOUT_SECS
            )));
        }
        if self.dialogue.reply_max_tokens == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::COMMENT_REPLY_MAX_TOKENS
            )));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let configured = |key: &Option<String>| {
            if key.is_some() {
                "Configured"
            } else {
                "Missing"
            }
        };

        format!(
            "CanvasCraft Configuration:\n\
             - Database: {}\n\
             - Gemini Key: {}\n\
             - Text Model: {}\n\
             - Vision Model: {}\n\
             - Image Synthesis Key: {}\n\
             - Image Hosting Key: {}\n\
             - HTTP Timeout: {}s\n\
             - Captioning: {}\n\
             - Finalize Mode: {}\n\
             - Reply Mode: {} (max {} tokens)",
            self.database,
            configured(&self.gemini.api_key),
            self.gemini.text_model,
            self.gemini.vision_model,
            configured(&self.image_synthesis.api_key),
            configured(&self.image_hosting.api_key),
            self.http_timeout_secs,
            if self.generation.caption_enabled {
                "Enabled"
            } else {
                "Disabled"
            },
            self.generation.finalize_mode,
            self.dialogue.reply_mode,
            self.dialogue.reply_max_tokens,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// First non-empty value among `keys`
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}

/// Parse an environment variable, using `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        _ => Ok(default),
    }
}

/// Parse a boolean flag accepting true/false, 1/0, yes/no
fn parse_bool_env(key: &str, default: bool) -> AppResult<bool> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(AppError::config(format!(
                "Invalid {key} value '{other}': expected true or false"
            ))),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::SqliteMemory
        );
        assert_eq!(
            DatabaseUrl::parse_url("memory://").unwrap(),
            DatabaseUrl::InProcess
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/gallery.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/gallery.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("gallery.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("gallery.db")
            }
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/gallery").is_err());
        assert!(DatabaseUrl::parse_url("   ").is_err());
    }

    #[test]
    fn test_default_database_url_is_file() {
        assert_eq!(
            DatabaseUrl::default().to_connection_string(),
            defaults::DATABASE_URL
        );
    }

    #[test]
    fn test_remote_service_debug_redacts_key() {
        let config = RemoteServiceConfig {
            api_key: Some("hosting-secret".to_owned()),
            base_url: endpoints::IMGBB_UPLOAD.to_owned(),
        };
        let output = format!("{config:?}");
        assert!(!output.contains("hosting-secret"));
        assert!(output.contains("[REDACTED]"));
    }

    #[test]
    fn test_require_key_reports_variable() {
        let config = RemoteServiceConfig {
            api_key: None,
            base_url: endpoints::IMGBB_UPLOAD.to_owned(),
        };
        let err = config.require_key(env_vars::IMAGE_HOSTING_KEY).unwrap_err();
        assert!(err.message.contains("IMAGE_HOSTING_KEY"));
    }
}
