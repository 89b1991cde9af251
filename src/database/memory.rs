// ABOUTME: In-memory gallery store for tests and ephemeral runs
// ABOUTME: All mutations happen under one write lock, which makes like toggles atomic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::GalleryStore;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CommentRecord, FinalizedPainting, LikeOutcome, LikeTarget, Likeable, NewComment,
    PaintingRecord, PaintingStatus,
};

/// Record plus insertion order, used to break timestamp ties
#[derive(Debug, Clone)]
struct Entry<T> {
    seq: u64,
    record: T,
}

#[derive(Debug, Default)]
struct State {
    next_seq: u64,
    paintings: HashMap<String, Entry<PaintingRecord>>,
    comments: HashMap<String, Entry<CommentRecord>>,
}

impl State {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Process-local [`GalleryStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_limit<T>(mut records: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit {
        records.truncate(limit as usize);
    }
    records
}

fn newest_comments<'a>(
    entries: impl Iterator<Item = &'a Entry<CommentRecord>>,
    limit: Option<u32>,
) -> Vec<CommentRecord> {
    let mut matching: Vec<&Entry<CommentRecord>> = entries.collect();
    matching.sort_by_key(|e| Reverse((e.record.created_at, e.seq)));
    apply_limit(
        matching.into_iter().map(|e| e.record.clone()).collect(),
        limit,
    )
}

#[async_trait]
impl GalleryStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert_pending_painting(&self) -> AppResult<PaintingRecord> {
        let record = PaintingRecord::pending(Uuid::new_v4().to_string(), Utc::now());
        let mut state = self.state.write().await;
        let seq = state.next_seq();
        state.paintings.insert(
            record.id.clone(),
            Entry {
                seq,
                record: record.clone(),
            },
        );
        Ok(record)
    }

    async fn finalize_painting(&self, id: &str, finalized: &FinalizedPainting) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.paintings.get_mut(id) {
            Some(entry) if entry.record.status == PaintingStatus::Pending => {
                entry.record.finalize(finalized.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_painting(&self, id: &str) -> AppResult<bool> {
        Ok(self.state.write().await.paintings.remove(id).is_some())
    }

    async fn get_painting(&self, id: &str) -> AppResult<Option<PaintingRecord>> {
        Ok(self
            .state
            .read()
            .await
            .paintings
            .get(id)
            .map(|e| e.record.clone()))
    }

    async fn list_paintings(&self, limit: Option<u32>) -> AppResult<Vec<PaintingRecord>> {
        let state = self.state.read().await;
        let mut ready: Vec<&Entry<PaintingRecord>> = state
            .paintings
            .values()
            .filter(|e| e.record.is_ready())
            .collect();
        ready.sort_by_key(|e| Reverse((e.record.created_at, e.record.like_count, e.seq)));
        Ok(apply_limit(
            ready.into_iter().map(|e| e.record.clone()).collect(),
            limit,
        ))
    }

    async fn toggle_like(&self, target: &LikeTarget, user_id: &str) -> AppResult<LikeOutcome> {
        let mut state = self.state.write().await;
        let outcome = match target {
            LikeTarget::Painting(id) => state
                .paintings
                .get_mut(id)
                .map(|e| e.record.toggle_like(user_id)),
            LikeTarget::Comment(id) => state
                .comments
                .get_mut(id)
                .map(|e| e.record.toggle_like(user_id)),
        };
        outcome.ok_or_else(|| {
            AppError::not_found(format!("{} {}", target.kind(), target.id()))
                .with_resource_id(target.id())
        })
    }

    async fn insert_comment(&self, comment: NewComment) -> AppResult<CommentRecord> {
        let record = CommentRecord::from_new(Uuid::new_v4().to_string(), comment);
        let mut state = self.state.write().await;
        let seq = state.next_seq();
        state.comments.insert(
            record.id.clone(),
            Entry {
                seq,
                record: record.clone(),
            },
        );
        Ok(record)
    }

    async fn get_comment(&self, id: &str) -> AppResult<Option<CommentRecord>> {
        Ok(self
            .state
            .read()
            .await
            .comments
            .get(id)
            .map(|e| e.record.clone()))
    }

    async fn update_comment_text(
        &self,
        id: &str,
        comment_text: &str,
        reply_text: &str,
    ) -> AppResult<Option<CommentRecord>> {
        let mut state = self.state.write().await;
        Ok(state.comments.get_mut(id).map(|entry| {
            comment_text.clone_into(&mut entry.record.comment_text);
            reply_text.clone_into(&mut entry.record.reply_text);
            entry.record.clone()
        }))
    }

    async fn delete_comment(&self, id: &str) -> AppResult<bool> {
        Ok(self.state.write().await.comments.remove(id).is_some())
    }

    async fn list_comments_for_painting(
        &self,
        painting_id: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        let state = self.state.read().await;
        Ok(newest_comments(
            state
                .comments
                .values()
                .filter(|e| e.record.painting_id == painting_id),
            limit,
        ))
    }

    async fn list_comments_by_author(
        &self,
        author_email: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        let wanted = author_email.trim();
        let state = self.state.read().await;
        Ok(newest_comments(
            state
                .comments
                .values()
                .filter(|e| e.record.author_email.eq_ignore_ascii_case(wanted)),
            limit,
        ))
    }
}
