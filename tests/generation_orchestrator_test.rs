// ABOUTME: Integration tests for the generation orchestrator state machine
// ABOUTME: Covers the happy path, compensating deletion, caption degradation, and finalize modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use canvascraft_server::{
    config::GenerationSettings,
    constants::pricing::{MAX_PRICE_EXCLUSIVE, MIN_PRICE},
    database::{GalleryStore, MemoryStore},
    errors::{AppError, AppResult, ErrorCode},
    generation::FinalizeMode,
    models::{
        CommentRecord, FinalizedPainting, GenerationRequest, LikeOutcome, LikeTarget, NewComment,
        PaintingRecord, PaintingStatus,
    },
};
use common::{create_memory_store, create_sqlite_store, sunset_request, FakeAdapters};
use helpers::fakes::{FakeCaptioner, FakeHost, FakeSynthesizer, HostBehavior};

// ============================================================================
// Test Helpers
// ============================================================================

/// Rows reachable by the given IDs plus every ready painting
async fn all_paintings(store: &Arc<dyn GalleryStore>, ids: &[&str]) -> usize {
    let mut found = 0;
    for id in ids {
        if store.get_painting(id).await.unwrap().is_some() {
            found += 1;
        }
    }
    found + store.list_paintings(None).await.unwrap().len()
}

fn after_response() -> GenerationSettings {
    GenerationSettings {
        caption_enabled: true,
        finalize_mode: FinalizeMode::AfterResponse,
    }
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_successful_generation_yields_one_ready_painting() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let outcome = orchestrator.create(sunset_request()).await.unwrap();
    assert_eq!(outcome.status, PaintingStatus::Ready);

    let paintings = store.list_paintings(None).await.unwrap();
    assert_eq!(paintings.len(), 1);
    let painting = &paintings[0];
    assert_eq!(painting.id, outcome.painting_id);
    assert_eq!(painting.status, PaintingStatus::Ready);
    assert_eq!(painting.like_count, 0);
    assert!(painting.liked_by.is_empty());
    assert_eq!(painting.owner_id.as_deref(), Some("u1"));
    assert_eq!(
        painting.image_url.as_deref(),
        Some("https://i.example.com/full.jpg")
    );
    assert_eq!(
        painting.thumbnail_url.as_deref(),
        Some("https://i.example.com/thumb.jpg")
    );
    let price = painting.price.unwrap();
    assert!((MIN_PRICE..MAX_PRICE_EXCLUSIVE).contains(&price));
    assert!(!painting.detail.as_deref().unwrap().is_empty());
}

#[tokio::test]
async fn test_adapters_receive_composed_prompt_and_label() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store, GenerationSettings::default());

    orchestrator.create(sunset_request()).await.unwrap();

    assert_eq!(
        adapters.synthesizer.prompts(),
        vec!["imagine : A oil landscape painting about sunset over hills".to_owned()]
    );
    assert_eq!(adapters.host.labels(), vec!["sunset over hills".to_owned()]);
    assert_eq!(adapters.captioner.calls(), 1);
}

#[tokio::test]
async fn test_successful_generation_on_sqlite_backend() {
    let store = create_sqlite_store().await.unwrap();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let outcome = orchestrator.create(sunset_request()).await.unwrap();

    let painting = store.get_painting(&outcome.painting_id).await.unwrap().unwrap();
    assert!(painting.is_ready());
    assert_eq!(painting.like_count, 0);
    assert_eq!(
        painting.detail.as_deref(),
        Some("Golden light spills over rolling hills.")
    );
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_invalid_request_creates_nothing() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let request = GenerationRequest::new("sunset over hills", "oil", "  ", "");
    let error = orchestrator.create(request).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidRequest);
    assert!(error.message.contains("subtype"));
    assert!(error.message.contains("requester_id"));
    assert!(adapters.synthesizer.prompts().is_empty());
    assert!(store.list_paintings(None).await.unwrap().is_empty());
}

// ============================================================================
// Compensating Deletion
// ============================================================================

#[tokio::test]
async fn test_synthesis_failure_leaves_no_painting() {
    let store = create_memory_store();
    let mut adapters = FakeAdapters::succeeding();
    adapters.synthesizer = Arc::new(FakeSynthesizer::failing());
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let error = orchestrator.create(sunset_request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::GenerationFailed);
    let pending_id = error.context.resource_id.clone().unwrap();
    assert!(store.get_painting(&pending_id).await.unwrap().is_none());
    assert_eq!(all_paintings(&store, &[&pending_id]).await, 0);
    assert!(adapters.host.labels().is_empty());
}

#[tokio::test]
async fn test_host_reporting_failure_leaves_no_painting() {
    let store = create_memory_store();
    let mut adapters = FakeAdapters::succeeding();
    adapters.host = Arc::new(FakeHost::with_behavior(HostBehavior::ReportFailure));
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let error = orchestrator.create(sunset_request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::HostingFailed);
    let pending_id = error.context.resource_id.clone().unwrap();
    assert_eq!(all_paintings(&store, &[&pending_id]).await, 0);
}

#[tokio::test]
async fn test_host_error_leaves_no_painting_on_sqlite() {
    let store = create_sqlite_store().await.unwrap();
    let mut adapters = FakeAdapters::succeeding();
    adapters.host = Arc::new(FakeHost::with_behavior(HostBehavior::Error));
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let error = orchestrator.create(sunset_request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::HostingFailed);
    let pending_id = error.context.resource_id.clone().unwrap();
    assert_eq!(all_paintings(&store, &[&pending_id]).await, 0);
}

/// How the wrapping store answers `finalize_painting`
#[derive(Clone, Copy)]
enum FinalizeFault {
    /// The pending row vanished before finalization
    RowMissing,
    /// The database rejected the update
    DatabaseDown,
}

/// Memory store whose finalize step misbehaves
struct FaultyFinalizeStore {
    inner: MemoryStore,
    fault: FinalizeFault,
}

#[async_trait]
impl GalleryStore for FaultyFinalizeStore {
    fn backend_name(&self) -> &'static str {
        "faulty"
    }

    async fn insert_pending_painting(&self) -> AppResult<PaintingRecord> {
        self.inner.insert_pending_painting().await
    }

    async fn finalize_painting(&self, id: &str, _finalized: &FinalizedPainting) -> AppResult<bool> {
        match self.fault {
            FinalizeFault::RowMissing => {
                self.inner.delete_painting(id).await?;
                Ok(false)
            }
            FinalizeFault::DatabaseDown => Err(AppError::database("disk I/O error")),
        }
    }

    async fn delete_painting(&self, id: &str) -> AppResult<bool> {
        self.inner.delete_painting(id).await
    }

    async fn get_painting(&self, id: &str) -> AppResult<Option<PaintingRecord>> {
        self.inner.get_painting(id).await
    }

    async fn list_paintings(&self, limit: Option<u32>) -> AppResult<Vec<PaintingRecord>> {
        self.inner.list_paintings(limit).await
    }

    async fn toggle_like(&self, target: &LikeTarget, user_id: &str) -> AppResult<LikeOutcome> {
        self.inner.toggle_like(target, user_id).await
    }

    async fn insert_comment(&self, comment: NewComment) -> AppResult<CommentRecord> {
        self.inner.insert_comment(comment).await
    }

    async fn get_comment(&self, id: &str) -> AppResult<Option<CommentRecord>> {
        self.inner.get_comment(id).await
    }

    async fn update_comment_text(
        &self,
        id: &str,
        comment_text: &str,
        reply_text: &str,
    ) -> AppResult<Option<CommentRecord>> {
        self.inner
            .update_comment_text(id, comment_text, reply_text)
            .await
    }

    async fn delete_comment(&self, id: &str) -> AppResult<bool> {
        self.inner.delete_comment(id).await
    }

    async fn list_comments_for_painting(
        &self,
        painting_id: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        self.inner.list_comments_for_painting(painting_id, limit).await
    }

    async fn list_comments_by_author(
        &self,
        author_email: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        self.inner.list_comments_by_author(author_email, limit).await
    }
}

async fn run_with_finalize_fault(fault: FinalizeFault) -> (Arc<dyn GalleryStore>, AppError) {
    let store: Arc<dyn GalleryStore> = Arc::new(FaultyFinalizeStore {
        inner: MemoryStore::new(),
        fault,
    });
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());
    let error = orchestrator.create(sunset_request()).await.unwrap_err();
    (store, error)
}

#[tokio::test]
async fn test_finalize_of_vanished_record_is_not_found() {
    let (store, error) = run_with_finalize_fault(FinalizeFault::RowMissing).await;

    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    let pending_id = error.context.resource_id.clone().unwrap();
    assert!(store.get_painting(&pending_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_finalize_database_error_compensates() {
    let (store, error) = run_with_finalize_fault(FinalizeFault::DatabaseDown).await;

    assert_eq!(error.code, ErrorCode::DatabaseError);
    let pending_id = error.context.resource_id.clone().unwrap();
    assert!(store.get_painting(&pending_id).await.unwrap().is_none());
}

// ============================================================================
// Caption Degradation
// ============================================================================

#[tokio::test]
async fn test_caption_failure_still_finalizes_with_empty_detail() {
    let store = create_memory_store();
    let mut adapters = FakeAdapters::succeeding();
    adapters.captioner = Arc::new(FakeCaptioner::failing());
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let outcome = orchestrator.create(sunset_request()).await.unwrap();

    let painting = store.get_painting(&outcome.painting_id).await.unwrap().unwrap();
    assert!(painting.is_ready());
    assert_eq!(painting.detail.as_deref(), Some(""));
}

#[tokio::test]
async fn test_caption_disabled_uses_raw_prompt_as_detail() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(
        store.clone(),
        GenerationSettings {
            caption_enabled: false,
            finalize_mode: FinalizeMode::BeforeResponse,
        },
    );

    let outcome = orchestrator.create(sunset_request()).await.unwrap();

    let painting = store.get_painting(&outcome.painting_id).await.unwrap().unwrap();
    assert_eq!(painting.detail.as_deref(), Some("sunset over hills"));
    assert_eq!(adapters.captioner.calls(), 0);
}

// ============================================================================
// Finalize Modes
// ============================================================================

#[tokio::test]
async fn test_after_response_returns_pending_id_then_finalizes() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store.clone(), after_response());

    let task = orchestrator.start(sunset_request()).await.unwrap();
    assert_eq!(task.outcome.status, PaintingStatus::Pending);

    let finalized_id = task.completion.unwrap().await.unwrap().unwrap();
    assert_eq!(finalized_id, task.outcome.painting_id);

    let painting = store.get_painting(&finalized_id).await.unwrap().unwrap();
    assert_eq!(painting.status, PaintingStatus::Ready);
}

#[tokio::test]
async fn test_after_response_failure_still_compensates() {
    let store = create_memory_store();
    let mut adapters = FakeAdapters::succeeding();
    adapters.synthesizer = Arc::new(FakeSynthesizer::failing());
    let orchestrator = adapters.orchestrator(store.clone(), after_response());

    let task = orchestrator.start(sunset_request()).await.unwrap();
    let pending_id = task.outcome.painting_id.clone();

    let error = task.completion.unwrap().await.unwrap().unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert!(store.get_painting(&pending_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_before_response_has_no_background_task() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store, GenerationSettings::default());

    let task = orchestrator.start(sunset_request()).await.unwrap();
    assert!(task.completion.is_none());
    assert_eq!(task.outcome.status, PaintingStatus::Ready);
}

// ============================================================================
// Independence
// ============================================================================

#[tokio::test]
async fn test_concurrent_generations_are_independent() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let orchestrator = adapters.orchestrator(store.clone(), GenerationSettings::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .create(GenerationRequest::new(
                        format!("hill number {i}"),
                        "oil",
                        "landscape",
                        "u1",
                    ))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(store.list_paintings(None).await.unwrap().len(), 8);
}
