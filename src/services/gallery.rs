// ABOUTME: Gallery service facade exposing the caller-facing painting and comment operations
// ABOUTME: Wires store, orchestrator, persona, and ledger together from injected dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::sync::Arc;

use tracing::{info, instrument};

use crate::adapters::{
    build_http_client, ClipdropClient, GeminiCaptioner, ImgbbClient, LlmTextGenerator,
};
use crate::config::environment::env_vars;
use crate::config::ServerConfig;
use crate::database::{create_store, GalleryStore};
use crate::dialogue::PersonaEngine;
use crate::errors::{AppError, AppResult};
use crate::generation::GenerationOrchestrator;
use crate::ledger::CommentLedger;
use crate::llm::GeminiProvider;
use crate::models::{
    CommentRecord, GenerationOutcome, GenerationRequest, LikeOutcome, LikeTarget, PaintingRecord,
};

/// Caller-facing gallery operations
#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn GalleryStore>,
    orchestrator: GenerationOrchestrator,
    persona: PersonaEngine,
    ledger: CommentLedger,
}

impl GalleryService {
    /// Assemble the service from already-built components
    #[must_use]
    pub fn new(
        store: Arc<dyn GalleryStore>,
        orchestrator: GenerationOrchestrator,
        persona: PersonaEngine,
    ) -> Self {
        let ledger = CommentLedger::new(store.clone(), persona.clone());
        Self {
            store,
            orchestrator,
            persona,
            ledger,
        }
    }

    /// Build the store and every remote adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when an API key is absent, `ConfigError` when
    /// the HTTP client cannot be built, and `DatabaseError` when the store
    /// cannot be opened.
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let http_client = build_http_client(config.http_timeout_secs)?;

        let gemini_key = config
            .gemini
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config_missing(env_vars::GEMINI_API_KEY))?;
        let gemini = Arc::new(
            GeminiProvider::new(gemini_key)
                .with_client(http_client.clone())
                .with_default_model(config.gemini.text_model.clone()),
        );

        let synthesizer = Arc::new(ClipdropClient::from_config(
            &config.image_synthesis,
            http_client.clone(),
        )?);
        let host = Arc::new(ImgbbClient::from_config(
            &config.image_hosting,
            http_client,
        )?);
        let captioner = Arc::new(GeminiCaptioner::new(
            gemini.clone(),
            config.gemini.vision_model.clone(),
        ));
        let text = Arc::new(
            LlmTextGenerator::new(gemini).with_model(config.gemini.text_model.clone()),
        );

        let store = create_store(&config.database).await?;
        let orchestrator = GenerationOrchestrator::new(
            store.clone(),
            synthesizer,
            captioner,
            host,
            config.generation,
        );
        let persona = PersonaEngine::new(text)
            .with_reply_mode(config.dialogue.reply_mode)
            .with_reply_max_tokens(config.dialogue.reply_max_tokens);

        info!(backend = store.backend_name(), "Gallery service ready");
        Ok(Self::new(store, orchestrator, persona))
    }

    /// The generation orchestrator, for callers that need the background task handle
    #[must_use]
    pub const fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }

    /// Turn a prompt into a gallery painting
    ///
    /// # Errors
    ///
    /// See [`GenerationOrchestrator::create`].
    pub async fn create_generation_request(
        &self,
        request: GenerationRequest,
    ) -> AppResult<GenerationOutcome> {
        self.orchestrator.create(request).await
    }

    /// Imagine a painting description for a title
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a blank title and `DialogueFailed` when no
    /// detail could be produced.
    pub async fn get_painting_detail(&self, title: &str) -> AppResult<String> {
        self.persona.imagine_detail(title).await
    }

    /// Comment on a painting; the reply is grounded on the painting's detail
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown painting, `InvalidRequest`
    /// for blank inputs, and `DatabaseError` when persistence fails.
    #[instrument(skip(self, text), fields(painting.id = %painting_id))]
    pub async fn create_comment(
        &self,
        painting_id: &str,
        author_email: &str,
        text: &str,
    ) -> AppResult<CommentRecord> {
        let painting = self.get_painting(painting_id).await?;
        let detail = painting.detail.unwrap_or_default();
        self.ledger
            .create_comment(&painting.id, author_email, text, &detail)
            .await
    }

    /// Replace a comment's text and regenerate its reply
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown comment and `DialogueFailed`
    /// when the reply cannot be regenerated (the comment is left unchanged).
    #[instrument(skip(self, new_text), fields(comment.id = %comment_id))]
    pub async fn edit_comment(&self, comment_id: &str, new_text: &str) -> AppResult<CommentRecord> {
        let comment = self
            .store
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Comment {comment_id}")))?;
        let detail = self
            .store
            .get_painting(&comment.painting_id)
            .await?
            .and_then(|painting| painting.detail)
            .unwrap_or_default();
        self.ledger.edit_comment(comment_id, new_text, &detail).await
    }

    /// Delete a comment; unknown IDs are acknowledged
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the delete fails.
    pub async fn delete_comment(&self, comment_id: &str) -> AppResult<()> {
        self.ledger.delete_comment(comment_id).await
    }

    /// Like or unlike a painting or comment
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown target.
    pub async fn toggle_like(&self, target: &LikeTarget, user_id: &str) -> AppResult<LikeOutcome> {
        self.ledger.toggle_like(target, user_id).await
    }

    /// Fetch a painting in any status
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown ID.
    pub async fn get_painting(&self, painting_id: &str) -> AppResult<PaintingRecord> {
        self.store
            .get_painting(painting_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Painting {painting_id}")))
    }

    /// Ready paintings, newest first
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the query fails.
    pub async fn list_paintings(&self, limit: Option<u32>) -> AppResult<Vec<PaintingRecord>> {
        self.store.list_paintings(limit).await
    }

    /// Comments on a painting, newest first
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the query fails.
    pub async fn list_comments_for_painting(
        &self,
        painting_id: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        self.store
            .list_comments_for_painting(painting_id, limit)
            .await
    }

    /// Comments written by an author, newest first
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the query fails.
    pub async fn list_comments_by_author(
        &self,
        author_email: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        self.store
            .list_comments_by_author(author_email, limit)
            .await
    }
}

impl std::fmt::Debug for GalleryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryService")
            .field("store", &self.store.backend_name())
            .field("orchestrator", &self.orchestrator)
            .field("persona", &self.persona)
            .finish_non_exhaustive()
    }
}
