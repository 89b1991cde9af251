// ABOUTME: Like sets with a toggle primitive that keeps the like count derived from the set
// ABOUTME: Shared by paintings and comments so both follow identical reaction semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of user IDs that liked a painting or comment
///
/// User IDs are normalized (trimmed, ASCII lower-cased) on the way in, so the
/// same email in different casing is one member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeSet(BTreeSet<String>);

impl LikeSet {
    /// Create an empty like set
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Normalize a user ID for set membership
    #[must_use]
    pub fn normalize(user_id: &str) -> String {
        user_id.trim().to_ascii_lowercase()
    }

    /// Toggle membership of `user_id`
    ///
    /// Returns `true` when the user now likes the target, `false` when the
    /// like was removed.
    pub fn toggle(&mut self, user_id: &str) -> bool {
        let key = Self::normalize(user_id);
        if self.0.remove(&key) {
            false
        } else {
            self.0.insert(key);
            true
        }
    }

    /// Whether `user_id` is a member
    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.0.contains(&Self::normalize(user_id))
    }

    /// Number of distinct users in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nobody liked the target
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate members in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for LikeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|user| Self::normalize(user.as_ref()))
                .collect(),
        )
    }
}

/// What a like toggle is aimed at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum LikeTarget {
    /// A painting, by ID
    Painting(String),
    /// A comment, by ID
    Comment(String),
}

impl LikeTarget {
    /// ID of the targeted record
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Painting(id) | Self::Comment(id) => id,
        }
    }

    /// Storage name of the target kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Painting(_) => "painting",
            Self::Comment(_) => "comment",
        }
    }
}

/// Result of a like toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    /// Whether the user likes the target after the toggle
    pub liked: bool,
    /// Size of the like set after the toggle
    pub like_count: usize,
}

/// Records that carry a like set and its derived count
pub trait Likeable {
    /// Mutable access to the like set
    fn likes_mut(&mut self) -> &mut LikeSet;

    /// Store the derived count after the set changed
    fn set_like_count(&mut self, count: usize);

    /// Toggle `user_id` and recompute the count from the resulting set
    fn toggle_like(&mut self, user_id: &str) -> LikeOutcome {
        let likes = self.likes_mut();
        let liked = likes.toggle(user_id);
        let like_count = likes.len();
        self.set_like_count(like_count);
        LikeOutcome { liked, like_count }
    }
}
