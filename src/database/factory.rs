// ABOUTME: Gallery store factory selecting the backend from the configured database URL
// ABOUTME: SQLite files and sqlite::memory: use sqlx, memory:// uses the process-local store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::sync::Arc;

use tracing::info;

use super::{GalleryStore, MemoryStore, SqliteStore};
use crate::config::DatabaseUrl;
use crate::errors::AppResult;

/// Create the store described by `url`
///
/// # Errors
///
/// Returns `DatabaseError` if the `SQLite` connection or migration fails.
pub async fn create_store(url: &DatabaseUrl) -> AppResult<Arc<dyn GalleryStore>> {
    let store: Arc<dyn GalleryStore> = match url {
        DatabaseUrl::InProcess => Arc::new(MemoryStore::new()),
        DatabaseUrl::SQLite { .. } | DatabaseUrl::SqliteMemory => {
            Arc::new(SqliteStore::connect(&url.to_connection_string()).await?)
        }
    };
    info!(
        backend = store.backend_name(),
        ephemeral = url.is_ephemeral(),
        "Gallery store initialized"
    );
    Ok(store)
}
