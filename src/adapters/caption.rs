// ABOUTME: Image captioning adapter backed by a Gemini vision model
// ABOUTME: Sends the painting as inline base64 JPEG with a fixed describe instruction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{instrument, warn};

use super::ImageCaptioner;
use crate::constants::media;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::GeminiProvider;
use crate::logging::AppLogger;

/// Instruction sent alongside every image
pub const CAPTION_INSTRUCTION: &str = "tell me in a detail about this picture?";

/// Captioner that asks a Gemini vision model to describe the painting
#[derive(Debug, Clone)]
pub struct GeminiCaptioner {
    provider: Arc<GeminiProvider>,
    model: String,
}

impl GeminiCaptioner {
    /// Create a captioner using `model` on `provider`
    #[must_use]
    pub fn new(provider: Arc<GeminiProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageCaptioner for GeminiCaptioner {
    #[instrument(skip(self, image), fields(model = %self.model, image.bytes = image.len()))]
    async fn caption_image(&self, image: &[u8]) -> AppResult<String> {
        if image.is_empty() {
            return Err(AppError::caption_failed("Cannot caption an empty image"));
        }

        let started = Instant::now();
        let result = self
            .provider
            .describe_image(
                image,
                media::IMAGE_MIME_TYPE,
                CAPTION_INSTRUCTION,
                Some(&self.model),
            )
            .await;
        AppLogger::log_external_call(
            "gemini-vision",
            "caption_image",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );

        result.map(|caption| caption.trim().to_owned()).map_err(|e| {
            warn!(error = %e, "Captioning failed");
            e.recode(ErrorCode::CaptionFailed)
        })
    }
}
