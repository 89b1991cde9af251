// ABOUTME: Per-request generation run tracking the pipeline stage and its undo action
// ABOUTME: Aborting a run deletes the provisional painting record created for it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::database::GalleryStore;
use crate::errors::AppError;
use crate::logging::AppLogger;

/// Stages of the generation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStage {
    /// Request fields checked
    Validated,
    /// `PENDING` placeholder persisted
    PendingRecordCreated,
    /// Raw image bytes received
    ImageSynthesized,
    /// Caption produced (or degraded to empty)
    Captioned,
    /// Image uploaded to the host
    Hosted,
    /// Record is `READY`
    Finalized,
    /// Run aborted
    Failed,
}

impl GenerationStage {
    /// Log name of the stage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validated => "VALIDATED",
            Self::PendingRecordCreated => "PENDING_RECORD_CREATED",
            Self::ImageSynthesized => "IMAGE_SYNTHESIZED",
            Self::Captioned => "CAPTIONED",
            Self::Hosted => "HOSTED",
            Self::Finalized => "FINALIZED",
            Self::Failed => "FAILED",
        }
    }

    /// Whether the run can still move forward
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Failed)
    }

    /// What must be undone when a run fails in this stage
    #[must_use]
    pub const fn compensation(&self) -> Compensation {
        match self {
            Self::PendingRecordCreated | Self::ImageSynthesized | Self::Captioned | Self::Hosted => {
                Compensation::DeleteProvisionalRecord
            }
            Self::Validated | Self::Finalized | Self::Failed => Compensation::None,
        }
    }
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Undo action attached to a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Nothing was persisted
    None,
    /// Remove the `PENDING` painting
    DeleteProvisionalRecord,
}

/// State of one generation request
pub(crate) struct GenerationRun {
    store: Arc<dyn GalleryStore>,
    stage: GenerationStage,
    painting_id: Option<String>,
    started: Instant,
}

impl GenerationRun {
    /// Start a run for a validated request
    pub(crate) fn validated(store: Arc<dyn GalleryStore>) -> Self {
        Self {
            store,
            stage: GenerationStage::Validated,
            painting_id: None,
            started: Instant::now(),
        }
    }

    pub(crate) fn painting_id(&self) -> &str {
        self.painting_id.as_deref().unwrap_or_default()
    }

    /// Record the provisional painting and move to `PENDING_RECORD_CREATED`
    pub(crate) fn pending_created(&mut self, painting_id: impl Into<String>) {
        self.painting_id = Some(painting_id.into());
        self.advance(GenerationStage::PendingRecordCreated);
    }

    /// Move to the next stage
    pub(crate) fn advance(&mut self, stage: GenerationStage) {
        self.stage = stage;
        AppLogger::log_generation_stage(
            self.painting_id(),
            stage.as_str(),
            self.started.elapsed().as_millis() as u64,
        );
    }

    /// Mark the run finalized
    pub(crate) fn complete(mut self) -> String {
        self.advance(GenerationStage::Finalized);
        info!(
            painting.id = %self.painting_id(),
            duration_ms = self.started.elapsed().as_millis() as u64,
            "Painting generated"
        );
        self.painting_id.take().unwrap_or_default()
    }

    /// Abort the run, apply the current stage's undo action, and return `error`
    pub(crate) async fn abort(mut self, error: AppError) -> AppError {
        let failed_at = self.stage;
        self.stage = GenerationStage::Failed;

        let compensated = match (failed_at.compensation(), self.painting_id.as_deref()) {
            (Compensation::DeleteProvisionalRecord, Some(id)) => {
                match self.store.delete_painting(id).await {
                    Ok(_) => true,
                    Err(delete_error) => {
                        error!(
                            painting.id = %id,
                            error = %delete_error,
                            "Failed to delete provisional painting"
                        );
                        false
                    }
                }
            }
            _ => false,
        };

        AppLogger::log_generation_failure(
            self.painting_id.as_deref(),
            failed_at.as_str(),
            &error.code.to_string(),
            compensated,
        );

        match self.painting_id.take() {
            Some(id) => error.with_resource_id(id),
            None => error,
        }
    }
}
