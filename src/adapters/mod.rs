// ABOUTME: Remote capability adapters for image synthesis, captioning, hosting, and text generation
// ABOUTME: Each trait normalizes one remote HTTP capability into a typed result or a typed failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Remote Capability Adapters
//!
//! The orchestrator and dialogue engine depend on these traits only, so tests
//! substitute scripted fakes for the HTTP clients.
//!
//! | Trait | Client | Failure kind |
//! |-------|--------|--------------|
//! | [`ImageSynthesizer`] | [`ClipdropClient`] | `UpstreamUnavailable` |
//! | [`ImageCaptioner`] | [`GeminiCaptioner`] | `CaptionFailed` |
//! | [`ImageHost`] | [`ImgbbClient`] | `HostingFailed` |
//! | [`TextGenerator`] | [`LlmTextGenerator`] | `DialogueFailed` |
//!
//! Adapters never retry.

mod caption;
mod clipdrop;
mod imgbb;
mod text;

pub use caption::GeminiCaptioner;
pub use clipdrop::ClipdropClient;
pub use imgbb::ImgbbClient;
pub use text::LlmTextGenerator;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::llm::ChatMessage;

/// Result of uploading an image to the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedImage {
    /// Public full-size URL
    pub url: String,
    /// Public thumbnail URL
    pub thumbnail_url: String,
    /// Whether the host reported the upload as successful
    pub success: bool,
}

/// Text-to-image synthesis
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    /// Turn a prompt into raw image bytes
    async fn synthesize_image(&self, prompt: &str) -> AppResult<Bytes>;
}

/// Image-to-text captioning
#[async_trait]
pub trait ImageCaptioner: Send + Sync {
    /// Describe an image in prose
    async fn caption_image(&self, image: &[u8]) -> AppResult<String>;
}

/// Binary image hosting
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload `image`, using `label_hint` to name the file
    async fn host_image(&self, image: &[u8], label_hint: &str) -> AppResult<HostedImage>;
}

/// Conversational text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single-prompt completion
    async fn generate_text(&self, prompt: &str, max_tokens: Option<u32>) -> AppResult<String>;

    /// Replay `priming` turns, then send `user_turn` and return the model's answer
    async fn continue_dialogue(
        &self,
        priming: &[ChatMessage],
        user_turn: &str,
        max_tokens: Option<u32>,
    ) -> AppResult<String>;
}

/// Build the shared HTTP client with the adapter-level timeout
///
/// # Errors
///
/// Returns `ConfigError` if the TLS backend cannot be initialized.
pub fn build_http_client(timeout_secs: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))
}

/// Shorten a response body for error messages
pub(crate) fn truncate_body(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        body.to_owned()
    } else {
        let head: String = body.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_keeps_short_text() {
        assert_eq!(truncate_body("bad key", 16), "bad key");
        assert_eq!(truncate_body("abcdefgh", 3), "abc...");
    }
}
