// ABOUTME: Reaction and comment ledger for paintings and comments
// ABOUTME: Set-based like toggling plus comment create/edit/delete with persona replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Reaction/Comment Ledger
//!
//! Creating a comment never fails because of the reply: any reply error is
//! replaced with [`PLACEHOLDER_REPLY`]. Editing is stricter and
//! leaves the stored comment untouched when no new reply can be produced.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::constants::dialogue::PLACEHOLDER_REPLY;
use crate::database::GalleryStore;
use crate::dialogue::PersonaEngine;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{CommentRecord, LikeOutcome, LikeSet, LikeTarget, NewComment};

/// Like and comment operations over a gallery store
#[derive(Clone)]
pub struct CommentLedger {
    store: Arc<dyn GalleryStore>,
    persona: PersonaEngine,
}

impl CommentLedger {
    /// Create a ledger
    #[must_use]
    pub fn new(store: Arc<dyn GalleryStore>, persona: PersonaEngine) -> Self {
        Self { store, persona }
    }

    /// Add `user_id` to the target's like set, or remove it if already present
    ///
    /// # Errors
    ///
    /// See [`toggle_like`].
    pub async fn toggle_like(&self, target: &LikeTarget, user_id: &str) -> AppResult<LikeOutcome> {
        toggle_like(self.store.as_ref(), target, user_id).await
    }

    /// Persist a comment with an in-character reply
    ///
    /// The painting's existence is the caller's concern; `painting_detail` is
    /// the text the reply is grounded on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for blank inputs and `DatabaseError` when the
    /// insert fails. Reply failures are absorbed.
    #[instrument(skip(self, comment_text, painting_detail), fields(painting.id = %painting_id))]
    pub async fn create_comment(
        &self,
        painting_id: &str,
        author_email: &str,
        comment_text: &str,
        painting_detail: &str,
    ) -> AppResult<CommentRecord> {
        let painting_id = painting_id.trim();
        let author_email = author_email.trim();
        let comment_text = comment_text.trim();
        require_present(&[
            ("painting_id", painting_id),
            ("author_email", author_email),
            ("comment_text", comment_text),
        ])?;

        let reply_text = match self
            .persona
            .reply_to_comment(painting_detail, comment_text)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                AppLogger::log_reply_degraded(painting_id, &format!("{}: {}", e.code, e.message));
                PLACEHOLDER_REPLY.to_owned()
            }
        };

        let record = self
            .store
            .insert_comment(NewComment {
                painting_id: painting_id.to_owned(),
                author_email: author_email.to_owned(),
                comment_text: comment_text.to_owned(),
                reply_text,
                created_at: Utc::now(),
            })
            .await?;

        info!(comment.id = %record.id, "Comment created");
        Ok(record)
    }

    /// Replace a comment's text and regenerate its reply
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for blank text
    /// - `ResourceNotFound` when the comment does not exist
    /// - `DialogueFailed` when no reply could be produced; nothing is changed
    #[instrument(skip(self, new_comment_text, painting_detail), fields(comment.id = %comment_id))]
    pub async fn edit_comment(
        &self,
        comment_id: &str,
        new_comment_text: &str,
        painting_detail: &str,
    ) -> AppResult<CommentRecord> {
        let new_comment_text = new_comment_text.trim();
        if new_comment_text.is_empty() {
            return Err(AppError::invalid_request("Comment text cannot be empty"));
        }
        if self.store.get_comment(comment_id).await?.is_none() {
            return Err(AppError::not_found(format!("Comment {comment_id}")));
        }

        let reply_text = self
            .persona
            .reply_to_comment(painting_detail, new_comment_text)
            .await
            .map_err(|e| {
                warn!(error = %e, "Edit rejected, reply could not be regenerated");
                e.with_resource_id(comment_id)
            })?;

        let updated = self
            .store
            .update_comment_text(comment_id, new_comment_text, &reply_text)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Comment {comment_id}")))?;

        info!("Comment edited");
        Ok(updated)
    }

    /// Hard-delete a comment; deleting a missing comment is not an error
    ///
    /// # Errors
    ///
    /// See [`delete_comment`].
    pub async fn delete_comment(&self, comment_id: &str) -> AppResult<()> {
        delete_comment(self.store.as_ref(), comment_id).await
    }
}

// ============================================================================
// Store-only operations
// ============================================================================

/// Toggle a like directly against `store`
///
/// Likes and deletes never need the persona, so callers without text model
/// credentials use these functions.
///
/// # Errors
///
/// Returns `InvalidRequest` for a blank user or target ID and
/// `ResourceNotFound` when the target does not exist.
#[instrument(skip(store), fields(target.kind = target.kind(), target.id = target.id()))]
pub async fn toggle_like(
    store: &dyn GalleryStore,
    target: &LikeTarget,
    user_id: &str,
) -> AppResult<LikeOutcome> {
    if target.id().trim().is_empty() {
        return Err(AppError::invalid_request("Like target ID cannot be empty"));
    }
    let user_id = LikeSet::normalize(user_id);
    if user_id.is_empty() {
        return Err(AppError::invalid_request("User ID cannot be empty"));
    }

    let outcome = store.toggle_like(target, &user_id).await?;
    info!(
        liked = outcome.liked,
        like_count = outcome.like_count,
        "Like toggled"
    );
    Ok(outcome)
}

/// Hard-delete a comment directly against `store`; a missing comment is acknowledged
///
/// # Errors
///
/// Returns `DatabaseError` when the delete fails.
#[instrument(skip(store))]
pub async fn delete_comment(store: &dyn GalleryStore, comment_id: &str) -> AppResult<()> {
    let removed = store.delete_comment(comment_id).await?;
    info!(removed, "Comment delete processed");
    Ok(())
}

fn require_present(fields: &[(&str, &str)]) -> AppResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::invalid_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_require_present_lists_every_blank_field() {
        assert!(require_present(&[("a", "x"), ("b", "y")]).is_ok());
        let error = require_present(&[("painting_id", ""), ("author_email", "a@b.c"), ("comment_text", "")])
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidRequest);
        assert!(error.message.contains("painting_id, comment_text"));
    }
}
