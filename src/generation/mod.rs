// ABOUTME: Generation orchestrator turning a prompt into a hosted, priced painting record
// ABOUTME: Provisional-record-then-finalize state machine with compensating deletion on fatal stages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Generation Orchestrator
//!
//! ```text
//! VALIDATED -> PENDING_RECORD_CREATED -> IMAGE_SYNTHESIZED -> CAPTIONED -> HOSTED -> FINALIZED
//!                      \____________________\___________________\____________\-> FAILED
//! ```
//!
//! - Synthesis and hosting failures are fatal: the `PENDING` record is deleted.
//! - Caption failures degrade to an empty detail.
//! - Nothing is retried; callers resubmit.
//!
//! [`FinalizeMode`] decides whether the caller waits for `FINALIZED` or gets
//! the pending ID back immediately while the pipeline continues in a task.

/// Price assignment
pub mod pricing;
mod run;

pub use run::{Compensation, GenerationStage};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::adapters::{ImageCaptioner, ImageHost, ImageSynthesizer};
use crate::config::GenerationSettings;
use crate::database::GalleryStore;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{FinalizedPainting, GenerationOutcome, GenerationRequest, PaintingStatus};
use run::GenerationRun;

/// When the caller gets its response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeMode {
    /// Run the whole pipeline, then respond with the `READY` record's ID
    #[default]
    BeforeResponse,
    /// Respond with the `PENDING` ID and finish in a background task
    AfterResponse,
}

impl FinalizeMode {
    /// Configuration name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeResponse => "before_response",
            Self::AfterResponse => "after_response",
        }
    }
}

impl fmt::Display for FinalizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinalizeMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "before_response" => Ok(Self::BeforeResponse),
            "after_response" => Ok(Self::AfterResponse),
            other => Err(AppError::config(format!(
                "Unknown finalize mode '{other}' (expected before_response or after_response)"
            ))),
        }
    }
}

/// A started generation whose pipeline may still be running
pub struct GenerationTask {
    /// What the caller is told right away
    pub outcome: GenerationOutcome,
    /// Background pipeline, present in `AfterResponse` mode; yields the painting ID
    pub completion: Option<JoinHandle<AppResult<String>>>,
}

/// Sequences synthesis, captioning, hosting, and persistence
#[derive(Clone)]
pub struct GenerationOrchestrator {
    store: Arc<dyn GalleryStore>,
    synthesizer: Arc<dyn ImageSynthesizer>,
    captioner: Arc<dyn ImageCaptioner>,
    host: Arc<dyn ImageHost>,
    settings: GenerationSettings,
}

impl GenerationOrchestrator {
    /// Create an orchestrator over injected adapters and store
    #[must_use]
    pub fn new(
        store: Arc<dyn GalleryStore>,
        synthesizer: Arc<dyn ImageSynthesizer>,
        captioner: Arc<dyn ImageCaptioner>,
        host: Arc<dyn ImageHost>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            store,
            synthesizer,
            captioner,
            host,
            settings,
        }
    }

    /// Active settings
    #[must_use]
    pub const fn settings(&self) -> GenerationSettings {
        self.settings
    }

    /// Handle a generation request according to the configured finalize mode
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when a field is blank (nothing persisted)
    /// - `GenerationFailed` / `HostingFailed` when a fatal stage fails (the
    ///   provisional record is deleted)
    /// - `DatabaseError` when persistence fails
    ///
    /// In `AfterResponse` mode only validation and provisional-record errors
    /// are returned; later failures are logged by the background task.
    pub async fn create(&self, request: GenerationRequest) -> AppResult<GenerationOutcome> {
        self.start(request).await.map(|task| task.outcome)
    }

    /// Like [`Self::create`] but hands back the background task, if any
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    #[instrument(skip(self, request), fields(mode = %self.settings.finalize_mode))]
    pub async fn start(&self, request: GenerationRequest) -> AppResult<GenerationTask> {
        request.validate()?;
        let mut run = GenerationRun::validated(self.store.clone());

        let pending = self.store.insert_pending_painting().await?;
        run.pending_created(pending.id.clone());

        match self.settings.finalize_mode {
            FinalizeMode::BeforeResponse => {
                let painting_id = self.execute(run, &request).await?;
                Ok(GenerationTask {
                    outcome: GenerationOutcome {
                        painting_id,
                        status: PaintingStatus::Ready,
                    },
                    completion: None,
                })
            }
            FinalizeMode::AfterResponse => {
                let orchestrator = self.clone();
                let completion = tokio::spawn(async move {
                    let result = orchestrator.execute(run, &request).await;
                    if let Err(e) = &result {
                        warn!(error = %e, "Background generation failed");
                    }
                    result
                });
                info!(painting.id = %pending.id, "Responding before finalization");
                Ok(GenerationTask {
                    outcome: GenerationOutcome {
                        painting_id: pending.id,
                        status: PaintingStatus::Pending,
                    },
                    completion: Some(completion),
                })
            }
        }
    }

    /// Drive a run from `PENDING_RECORD_CREATED` to a terminal stage
    async fn execute(&self, mut run: GenerationRun, request: &GenerationRequest) -> AppResult<String> {
        let image = match self
            .synthesizer
            .synthesize_image(&request.image_prompt())
            .await
        {
            Ok(image) => image,
            Err(e) => {
                let error = AppError::generation_failed(format!(
                    "Image synthesis failed: {}",
                    e.message
                ))
                .with_details(serde_json::json!({ "cause": e.code }))
                .with_source(e);
                return Err(run.abort(error).await);
            }
        };
        run.advance(GenerationStage::ImageSynthesized);

        let detail = if self.settings.caption_enabled {
            let caption = match self.captioner.caption_image(&image).await {
                Ok(caption) => caption,
                Err(e) => {
                    warn!(
                        painting.id = %run.painting_id(),
                        error = %e,
                        "Caption unavailable, continuing with empty detail"
                    );
                    String::new()
                }
            };
            run.advance(GenerationStage::Captioned);
            caption
        } else {
            request.prompt.trim().to_owned()
        };

        let hosted = match self.host.host_image(&image, request.prompt.trim()).await {
            Ok(hosted) if hosted.success => hosted,
            Ok(_) => {
                let error = AppError::hosting_failed("Image host reported success: false");
                return Err(run.abort(error).await);
            }
            Err(e) => return Err(run.abort(e.recode(ErrorCode::HostingFailed)).await),
        };
        run.advance(GenerationStage::Hosted);

        let finalized = FinalizedPainting {
            image_url: hosted.url,
            thumbnail_url: hosted.thumbnail_url,
            owner_id: request.requester_id.trim().to_owned(),
            price: pricing::generate_price(&mut rand::thread_rng()),
            detail,
        };

        match self
            .store
            .finalize_painting(run.painting_id(), &finalized)
            .await
        {
            Ok(true) => Ok(run.complete()),
            Ok(false) => {
                let error = AppError::not_found(format!(
                    "Pending painting {}",
                    run.painting_id()
                ));
                Err(run.abort(error).await)
            }
            Err(e) => Err(run.abort(e).await),
        }
    }
}

impl fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("store", &self.store.backend_name())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
