// ABOUTME: Generation request validation and the outcome reported to callers
// ABOUTME: Composes the text-to-image prompt from the request's style fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use serde::{Deserialize, Serialize};

use super::painting::PaintingStatus;
use crate::errors::{AppError, AppResult};

/// A user's request for a new painting (never persisted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// What the painting should depict
    pub prompt: String,
    /// Medium, e.g. "oil"
    pub category: String,
    /// Genre, e.g. "landscape"
    pub subtype: String,
    /// Who asked for it
    pub requester_id: String,
}

impl GenerationRequest {
    /// Create a request
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        category: impl Into<String>,
        subtype: impl Into<String>,
        requester_id: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            category: category.into(),
            subtype: subtype.into(),
            requester_id: requester_id.into(),
        }
    }

    /// Reject requests with any empty (or whitespace-only) field
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` naming every missing field.
    pub fn validate(&self) -> AppResult<()> {
        let missing: Vec<&str> = [
            ("prompt", &self.prompt),
            ("category", &self.category),
            ("subtype", &self.subtype),
            ("requester_id", &self.requester_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_request(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ))
            .with_details(serde_json::json!({ "missing": missing })))
        }
    }

    /// Prompt sent to the text-to-image service
    #[must_use]
    pub fn image_prompt(&self) -> String {
        format!(
            "imagine : A {} {} painting about {}",
            self.category.trim(),
            self.subtype.trim(),
            self.prompt.trim()
        )
    }
}

/// What a generation request returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// ID of the painting record
    pub painting_id: String,
    /// `Ready` when the pipeline finished before responding, `Pending` when
    /// finalization continues in the background
    pub status: PaintingStatus,
}
