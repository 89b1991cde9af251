// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, store factories, and a fully faked gallery service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `canvascraft_server`

use std::sync::{Arc, Once};

use anyhow::Result;
use canvascraft_server::{
    config::GenerationSettings,
    database::{GalleryStore, MemoryStore, SqliteStore},
    dialogue::PersonaEngine,
    generation::GenerationOrchestrator,
    ledger::CommentLedger,
    models::GenerationRequest,
    services::GalleryService,
};

use crate::helpers::fakes::{FakeCaptioner, FakeHost, FakeSynthesizer, FakeTextGenerator};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Process-local store
pub fn create_memory_store() -> Arc<dyn GalleryStore> {
    init_test_logging();
    Arc::new(MemoryStore::new())
}

/// In-memory `SQLite` store with migrations applied
pub async fn create_sqlite_store() -> Result<Arc<dyn GalleryStore>> {
    init_test_logging();
    Ok(Arc::new(SqliteStore::connect("sqlite::memory:").await?))
}

/// The request used throughout the pipeline scenarios
pub fn sunset_request() -> GenerationRequest {
    GenerationRequest::new("sunset over hills", "oil", "landscape", "u1")
}

/// Every fake adapter used by a service, kept so tests can script and inspect them
pub struct FakeAdapters {
    pub synthesizer: Arc<FakeSynthesizer>,
    pub captioner: Arc<FakeCaptioner>,
    pub host: Arc<FakeHost>,
    pub text: Arc<FakeTextGenerator>,
}

impl FakeAdapters {
    /// Adapters that all succeed
    pub fn succeeding() -> Self {
        Self {
            synthesizer: Arc::new(FakeSynthesizer::succeeding()),
            captioner: Arc::new(FakeCaptioner::succeeding("Golden light spills over rolling hills.")),
            host: Arc::new(FakeHost::succeeding()),
            text: Arc::new(FakeTextGenerator::replying("Thank you, friend!")),
        }
    }

    pub fn orchestrator(
        &self,
        store: Arc<dyn GalleryStore>,
        settings: GenerationSettings,
    ) -> GenerationOrchestrator {
        GenerationOrchestrator::new(
            store,
            self.synthesizer.clone(),
            self.captioner.clone(),
            self.host.clone(),
            settings,
        )
    }

    pub fn persona(&self) -> PersonaEngine {
        PersonaEngine::new(self.text.clone())
    }

    pub fn ledger(&self, store: Arc<dyn GalleryStore>) -> CommentLedger {
        CommentLedger::new(store, self.persona())
    }

    pub fn service(&self, store: Arc<dyn GalleryStore>) -> GalleryService {
        GalleryService::new(
            store.clone(),
            self.orchestrator(store, GenerationSettings::default()),
            self.persona(),
        )
    }
}
