// ABOUTME: Gallery persistence contract shared by the SQLite and in-memory backends
// ABOUTME: Paintings, comments, and set-based likes with an atomic toggle primitive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Gallery Persistence
//!
//! [`GalleryStore`] is the only way the pipeline and ledger touch storage.
//! Backends assign record IDs (UUID v4) and creation timestamps.
//!
//! `toggle_like` must be atomic per target: two users liking the same painting
//! at once both land in the set and the count reflects both.

mod factory;
mod memory;
mod sqlite;

pub use factory::create_store;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{
    CommentRecord, FinalizedPainting, LikeOutcome, LikeTarget, NewComment, PaintingRecord,
};

/// Persistence operations for the gallery
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Create a `PENDING` placeholder and return it
    async fn insert_pending_painting(&self) -> AppResult<PaintingRecord>;

    /// Move a `PENDING` painting to `READY`, clearing its likes
    ///
    /// Returns `false` when no pending row with `id` exists (for example it
    /// was already deleted).
    async fn finalize_painting(&self, id: &str, finalized: &FinalizedPainting) -> AppResult<bool>;

    /// Delete a painting and its likes; returns whether a row was removed
    async fn delete_painting(&self, id: &str) -> AppResult<bool>;

    /// Fetch a painting (any status)
    async fn get_painting(&self, id: &str) -> AppResult<Option<PaintingRecord>>;

    /// `READY` paintings, newest first, then by like count
    async fn list_paintings(&self, limit: Option<u32>) -> AppResult<Vec<PaintingRecord>>;

    /// Add or remove `user_id` from the target's like set
    ///
    /// Fails with `ResourceNotFound` when the target does not exist.
    async fn toggle_like(&self, target: &LikeTarget, user_id: &str) -> AppResult<LikeOutcome>;

    /// Persist a new comment
    async fn insert_comment(&self, comment: NewComment) -> AppResult<CommentRecord>;

    /// Fetch a comment
    async fn get_comment(&self, id: &str) -> AppResult<Option<CommentRecord>>;

    /// Replace a comment's text and reply; `None` if the comment is missing
    async fn update_comment_text(
        &self,
        id: &str,
        comment_text: &str,
        reply_text: &str,
    ) -> AppResult<Option<CommentRecord>>;

    /// Delete a comment and its likes; returns whether a row was removed
    async fn delete_comment(&self, id: &str) -> AppResult<bool>;

    /// Comments on a painting, newest first
    async fn list_comments_for_painting(
        &self,
        painting_id: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>>;

    /// Comments written by an author (case-insensitive email match), newest first
    async fn list_comments_by_author(
        &self,
        author_email: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>>;
}
