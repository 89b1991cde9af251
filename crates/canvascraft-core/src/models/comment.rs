// ABOUTME: Comment records carrying the AI painter's in-character reply
// ABOUTME: Append-only except for text/reply edits and hard deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::likes::{LikeSet, Likeable};

/// Persisted comment on a painting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Opaque record ID assigned by the store
    pub id: String,
    /// Painting the comment belongs to
    pub painting_id: String,
    /// Email of the commenter
    pub author_email: String,
    /// Comment body
    pub comment_text: String,
    /// Generated reply (or the placeholder)
    pub reply_text: String,
    /// Users that liked the comment
    pub liked_by: LikeSet,
    /// Always `liked_by.len()`
    pub like_count: usize,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    /// Build a stored record from a creation payload
    #[must_use]
    pub fn from_new(id: impl Into<String>, comment: NewComment) -> Self {
        Self {
            id: id.into(),
            painting_id: comment.painting_id,
            author_email: comment.author_email,
            comment_text: comment.comment_text,
            reply_text: comment.reply_text,
            liked_by: LikeSet::new(),
            like_count: 0,
            created_at: comment.created_at,
        }
    }

    /// Replace the like set, recomputing the count
    #[must_use]
    pub fn with_likes(mut self, liked_by: LikeSet) -> Self {
        self.like_count = liked_by.len();
        self.liked_by = liked_by;
        self
    }
}

impl Likeable for CommentRecord {
    fn likes_mut(&mut self) -> &mut LikeSet {
        &mut self.liked_by
    }

    fn set_like_count(&mut self, count: usize) {
        self.like_count = count;
    }
}

/// Payload for inserting a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// Painting the comment belongs to
    pub painting_id: String,
    /// Email of the commenter
    pub author_email: String,
    /// Comment body
    pub comment_text: String,
    /// Generated reply (or the placeholder)
    pub reply_text: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
