// ABOUTME: Painting record and lifecycle status for the gallery
// ABOUTME: Pending placeholders become ready records once the generation pipeline succeeds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::likes::{LikeSet, Likeable};
use crate::errors::AppError;

/// Lifecycle status of a painting record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintingStatus {
    /// Placeholder created before the pipeline runs
    Pending,
    /// All fields populated
    Ready,
}

impl PaintingStatus {
    /// Storage representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Ready => "READY",
        }
    }
}

impl fmt::Display for PaintingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaintingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "READY" => Ok(Self::Ready),
            other => Err(AppError::database(format!(
                "Unknown painting status: {other}"
            ))),
        }
    }
}

/// A painting in the gallery
///
/// Pending records only carry `id`, `status`, and `created_at`; everything
/// else is filled in by [`FinalizedPainting`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintingRecord {
    /// Opaque record ID assigned by the store
    pub id: String,
    /// Hosted full-size image URL
    pub image_url: Option<String>,
    /// Hosted thumbnail URL
    pub thumbnail_url: Option<String>,
    /// Requester who owns the painting
    pub owner_id: Option<String>,
    /// Users that liked the painting
    pub liked_by: LikeSet,
    /// Always `liked_by.len()`
    pub like_count: usize,
    /// Price assigned once at finalization
    pub price: Option<i64>,
    /// Caption or prompt describing the painting
    pub detail: Option<String>,
    /// Lifecycle status
    pub status: PaintingStatus,
    /// When the provisional record was created
    pub created_at: DateTime<Utc>,
}

impl PaintingRecord {
    /// Create a pending placeholder
    #[must_use]
    pub fn pending(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            image_url: None,
            thumbnail_url: None,
            owner_id: None,
            liked_by: LikeSet::new(),
            like_count: 0,
            price: None,
            detail: None,
            status: PaintingStatus::Pending,
            created_at,
        }
    }

    /// Apply the finalized fields and mark the record ready
    ///
    /// Resets the like set, since nobody can have liked a placeholder.
    pub fn finalize(&mut self, finalized: FinalizedPainting) {
        self.image_url = Some(finalized.image_url);
        self.thumbnail_url = Some(finalized.thumbnail_url);
        self.owner_id = Some(finalized.owner_id);
        self.liked_by = LikeSet::new();
        self.like_count = 0;
        self.price = Some(finalized.price);
        self.detail = Some(finalized.detail);
        self.status = PaintingStatus::Ready;
    }

    /// Replace the like set, recomputing the count
    #[must_use]
    pub fn with_likes(mut self, liked_by: LikeSet) -> Self {
        self.like_count = liked_by.len();
        self.liked_by = liked_by;
        self
    }

    /// Whether the pipeline finished for this record
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == PaintingStatus::Ready
    }
}

impl Likeable for PaintingRecord {
    fn likes_mut(&mut self) -> &mut LikeSet {
        &mut self.liked_by
    }

    fn set_like_count(&mut self, count: usize) {
        self.like_count = count;
    }
}

/// Fields written when a pending painting becomes ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedPainting {
    /// Hosted full-size image URL
    pub image_url: String,
    /// Hosted thumbnail URL
    pub thumbnail_url: String,
    /// Requester who owns the painting
    pub owner_id: String,
    /// Generated price
    pub price: i64,
    /// Caption text, or the prompt when captioning is disabled
    pub detail: String,
}
