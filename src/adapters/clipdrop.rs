// ABOUTME: Text-to-image client for the Clipdrop API
// ABOUTME: Posts the composed prompt as multipart form data and returns the raw image bytes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::Client;
use tracing::{error, instrument};

use super::{truncate_body, ImageSynthesizer};
use crate::config::environment::env_vars;
use crate::config::RemoteServiceConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

const SERVICE_NAME: &str = "clipdrop";

/// Clipdrop text-to-image client
pub struct ClipdropClient {
    api_key: String,
    endpoint: String,
    http_client: Client,
}

impl ClipdropClient {
    /// Create a client for `endpoint`
    #[must_use]
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, http_client: Client) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            http_client,
        }
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` if no API key is configured.
    pub fn from_config(config: &RemoteServiceConfig, http_client: Client) -> AppResult<Self> {
        let api_key = config.require_key(env_vars::CLIPDROP_API_KEY)?;
        Ok(Self::new(api_key, config.base_url.clone(), http_client))
    }
}

#[async_trait]
impl ImageSynthesizer for ClipdropClient {
    #[instrument(skip(self, prompt), fields(prompt.chars = prompt.chars().count()))]
    async fn synthesize_image(&self, prompt: &str) -> AppResult<Bytes> {
        let started = Instant::now();
        let form = Form::new().text("prompt", prompt.to_owned());

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                AppError::upstream_unavailable(format!("Text-to-image request failed: {e}"))
                    .with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Text-to-image service returned an error");
            AppLogger::log_external_call(
                SERVICE_NAME,
                "synthesize_image",
                false,
                started.elapsed().as_millis() as u64,
            );
            return Err(AppError::upstream_unavailable(format!(
                "Text-to-image service responded with {status}: {}",
                truncate_body(&body, 256)
            ))
            .with_details(serde_json::json!({ "status": status.as_u16() })));
        }

        let image = response.bytes().await.map_err(|e| {
            AppError::upstream_unavailable(format!(
                "Failed to read image bytes: {}",
                e.without_url()
            ))
        })?;
        AppLogger::log_external_call(
            SERVICE_NAME,
            "synthesize_image",
            true,
            started.elapsed().as_millis() as u64,
        );

        if image.is_empty() {
            return Err(AppError::upstream_unavailable(
                "Text-to-image service returned an empty image",
            ));
        }
        Ok(image)
    }
}

impl fmt::Debug for ClipdropClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipdropClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::endpoints;
    use crate::errors::ErrorCode;

    #[test]
    fn test_from_config_requires_key() {
        let config = RemoteServiceConfig {
            api_key: None,
            base_url: endpoints::CLIPDROP_TEXT_TO_IMAGE.to_owned(),
        };
        let err = ClipdropClient::from_config(&config, Client::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = ClipdropClient::new("clip-secret", endpoints::CLIPDROP_TEXT_TO_IMAGE, Client::new());
        assert!(!format!("{client:?}").contains("clip-secret"));
    }
}
