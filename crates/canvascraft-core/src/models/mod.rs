// ABOUTME: Gallery domain models shared by the pipeline, ledger, and persistence layers
// ABOUTME: Re-exports generation requests, painting and comment records, and like sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

/// Comment records and their creation payloads
pub mod comment;
/// Generation requests and outcomes
pub mod generation;
/// Like sets and the toggle primitive
pub mod likes;
/// Painting records and lifecycle status
pub mod painting;

pub use comment::{CommentRecord, NewComment};
pub use generation::{GenerationOutcome, GenerationRequest};
pub use likes::{LikeOutcome, LikeSet, LikeTarget, Likeable};
pub use painting::{FinalizedPainting, PaintingRecord, PaintingStatus};
