// ABOUTME: Image hosting client for the ImgBB upload API
// ABOUTME: Uploads raw image bytes as multipart form data and parses the hosted URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, instrument};

use super::{truncate_body, HostedImage, ImageHost};
use crate::config::environment::env_vars;
use crate::config::RemoteServiceConfig;
use crate::constants::media;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

const SERVICE_NAME: &str = "imgbb";

/// Upload response envelope
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
    error: Option<UploadError>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: Option<String>,
    display_url: Option<String>,
    thumb: Option<UploadThumb>,
}

#[derive(Debug, Deserialize)]
struct UploadThumb {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    message: Option<String>,
}

/// Parse an upload response body into hosted URLs
///
/// The thumbnail falls back to `display_url`, then to `url`.
pub(crate) fn parse_upload_response(body: &str) -> AppResult<HostedImage> {
    let response: UploadResponse = serde_json::from_str(body).map_err(|e| {
        AppError::hosting_failed(format!("Malformed hosting response: {e}"))
    })?;

    if !response.success {
        let reason = response
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "host reported success: false".to_owned());
        return Err(AppError::hosting_failed(format!(
            "Image upload rejected: {reason}"
        )));
    }

    let data = response
        .data
        .ok_or_else(|| AppError::hosting_failed("Hosting response has no data"))?;
    let url = data
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::hosting_failed("Hosting response has no image URL"))?;
    let thumbnail_url = data
        .thumb
        .and_then(|t| t.url)
        .or(data.display_url)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| url.clone());

    Ok(HostedImage {
        url,
        thumbnail_url,
        success: true,
    })
}

/// `ImgBB` upload client
pub struct ImgbbClient {
    api_key: String,
    endpoint: String,
    http_client: Client,
}

impl ImgbbClient {
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
    /// Returns `ConfigMissing` if no hosting key is configured.
    pub fn from_config(config: &RemoteServiceConfig, http_client: Client) -> AppResult<Self> {
        let api_key = config.require_key(env_vars::IMAGE_HOSTING_KEY)?;
        Ok(Self::new(api_key, config.base_url.clone(), http_client))
    }

    fn file_name(label_hint: &str) -> String {
        let label = label_hint.trim();
        let label = if label.is_empty() { "painting" } else { label };
        format!("{label}.{}", media::IMAGE_EXTENSION)
    }
}

#[async_trait]
impl ImageHost for ImgbbClient {
    #[instrument(skip(self, image, label_hint), fields(image.bytes = image.len()))]
    async fn host_image(&self, image: &[u8], label_hint: &str) -> AppResult<HostedImage> {
        let started = Instant::now();
        let part = Part::bytes(image.to_vec())
            .file_name(Self::file_name(label_hint))
            .mime_str(media::IMAGE_MIME_TYPE)
            .map_err(|e| AppError::internal(format!("Invalid image MIME type: {e}")))?;
        // ImgBB accepts the key as a form field
        let form = Form::new()
            .text("key", self.api_key.clone())
            .part("image", part);

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                AppError::hosting_failed(format!("Image upload request failed: {e}")).with_source(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::hosting_failed(format!(
                "Failed to read upload response: {}",
                e.without_url()
            ))
        })?;

        let hosted = if status.is_success() {
            parse_upload_response(&body)
        } else {
            error!(status = %status, "Image host returned an error");
            Err(AppError::hosting_failed(format!(
                "Image host responded with {status}: {}",
                truncate_body(&body, 256)
            )))
        };

        AppLogger::log_external_call(
            SERVICE_NAME,
            "host_image",
            hosted.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        hosted
    }
}

impl fmt::Debug for ImgbbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImgbbClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_successful_upload() {
        let body = r#"{
            "data": {
                "id": "2ndCYJK",
                "url": "https://i.ibb.co/w04Prt6/sunset.jpg",
                "display_url": "https://i.ibb.co/98W13PY/sunset.jpg",
                "thumb": { "url": "https://i.ibb.co/2ndCYJK/sunset.jpg" }
            },
            "success": true,
            "status": 200
        }"#;
        let hosted = parse_upload_response(body).unwrap();
        assert_eq!(hosted.url, "https://i.ibb.co/w04Prt6/sunset.jpg");
        assert_eq!(hosted.thumbnail_url, "https://i.ibb.co/2ndCYJK/sunset.jpg");
        assert!(hosted.success);
    }

    #[test]
    fn test_thumbnail_falls_back_to_display_url_then_url() {
        let display = r#"{"success": true, "data": {"url": "https://h/full.jpg", "display_url": "https://h/display.jpg"}}"#;
        assert_eq!(
            parse_upload_response(display).unwrap().thumbnail_url,
            "https://h/display.jpg"
        );

        let bare = r#"{"success": true, "data": {"url": "https://h/full.jpg"}}"#;
        assert_eq!(
            parse_upload_response(bare).unwrap().thumbnail_url,
            "https://h/full.jpg"
        );
    }

    #[test]
    fn test_success_false_is_hosting_failure() {
        let body = r#"{"success": false, "status_code": 400, "error": {"message": "Invalid API v1 key."}}"#;
        let err = parse_upload_response(body).unwrap_err();
        assert_eq!(err.code, ErrorCode::HostingFailed);
        assert!(err.message.contains("Invalid API v1 key."));
    }

    #[test]
    fn test_malformed_payload_is_hosting_failure() {
        for body in ["not json", r#"{"success": true}"#, r#"{"success": true, "data": {}}"#] {
            let err = parse_upload_response(body).unwrap_err();
            assert_eq!(err.code, ErrorCode::HostingFailed, "body: {body}");
        }
    }

    #[test]
    fn test_file_name_uses_label_hint() {
        assert_eq!(ImgbbClient::file_name("sunset over hills"), "sunset over hills.jpg");
        assert_eq!(ImgbbClient::file_name("  "), "painting.jpg");
    }
}
