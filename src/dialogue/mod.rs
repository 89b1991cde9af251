// ABOUTME: Persona dialogue engine producing the AI painter's in-character text
// ABOUTME: Imagines painting details from titles and replies to comments, stateless across calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Persona Dialogue Engine
//!
//! Every call rebuilds the seed conversation from the constants in
//! [`prompts`] and appends exactly one user turn. Nothing is carried between
//! calls.
//!
//! Failure handling is left to callers: comment creation substitutes a
//! placeholder, while detail imagination and comment edits surface
//! `DialogueFailed`.

/// Priming turns and prompt templates
pub mod prompts;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::adapters::TextGenerator;
use crate::constants::dialogue::DEFAULT_REPLY_MAX_TOKENS;
use crate::errors::{AppError, AppResult};
use prompts::{render_priming, single_prompt_reply, COMMENT_REPLY_PRIMING, DETAIL_PRIMING, MISSING_DETAIL};

/// How comment replies are prompted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyMode {
    /// Multi-turn persona priming with the detail injected as a prior turn
    #[default]
    Primed,
    /// One prompt embedding persona, detail, and comment
    SinglePrompt,
}

impl ReplyMode {
    /// Configuration name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primed => "primed",
            Self::SinglePrompt => "single_prompt",
        }
    }
}

impl fmt::Display for ReplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "primed" => Ok(Self::Primed),
            "single_prompt" => Ok(Self::SinglePrompt),
            other => Err(AppError::config(format!(
                "Unknown reply mode '{other}' (expected primed or single_prompt)"
            ))),
        }
    }
}

/// The AI painter persona
#[derive(Clone)]
pub struct PersonaEngine {
    text: Arc<dyn TextGenerator>,
    reply_mode: ReplyMode,
    reply_max_tokens: u32,
}

impl PersonaEngine {
    /// Create an engine with primed replies and the default token ceiling
    #[must_use]
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self {
            text,
            reply_mode: ReplyMode::default(),
            reply_max_tokens: DEFAULT_REPLY_MAX_TOKENS,
        }
    }

    /// Choose how comment replies are prompted
    #[must_use]
    pub const fn with_reply_mode(mut self, reply_mode: ReplyMode) -> Self {
        self.reply_mode = reply_mode;
        self
    }

    /// Set the output token ceiling for replies
    #[must_use]
    pub const fn with_reply_max_tokens(mut self, max_tokens: u32) -> Self {
        self.reply_max_tokens = max_tokens;
        self
    }

    /// Current reply mode
    #[must_use]
    pub const fn reply_mode(&self) -> ReplyMode {
        self.reply_mode
    }

    /// Expand a painting title into a short description
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a blank title and `DialogueFailed` when
    /// the model fails or answers with nothing.
    #[instrument(skip(self, title), fields(title.chars = title.chars().count()))]
    pub async fn imagine_detail(&self, title: &str) -> AppResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_request("Painting title cannot be empty"));
        }

        let priming = render_priming(DETAIL_PRIMING, "");
        let detail = self.text.continue_dialogue(&priming, title, None).await?;
        let detail = detail.trim();
        if detail.is_empty() {
            return Err(AppError::dialogue_failed("No painting detail was produced"));
        }

        debug!(detail.chars = detail.chars().count(), "Imagined painting detail");
        Ok(detail.to_owned())
    }

    /// Reply in character to `comment` about a painting described by `detail`
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a blank comment and `DialogueFailed` when
    /// the model fails. Callers decide whether that is fatal.
    #[instrument(skip(self, detail, comment), fields(mode = %self.reply_mode))]
    pub async fn reply_to_comment(&self, detail: &str, comment: &str) -> AppResult<String> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AppError::invalid_request("Comment text cannot be empty"));
        }
        let detail = match detail.trim() {
            "" => MISSING_DETAIL,
            detail => detail,
        };

        let max_tokens = Some(self.reply_max_tokens);
        let reply = match self.reply_mode {
            ReplyMode::Primed => {
                let priming = render_priming(COMMENT_REPLY_PRIMING, detail);
                self.text
                    .continue_dialogue(&priming, comment, max_tokens)
                    .await?
            }
            ReplyMode::SinglePrompt => {
                self.text
                    .generate_text(&single_prompt_reply(detail, comment), max_tokens)
                    .await?
            }
        };

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AppError::dialogue_failed("The AI painter had nothing to say"));
        }
        Ok(reply.to_owned())
    }
}

impl fmt::Debug for PersonaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonaEngine")
            .field("reply_mode", &self.reply_mode)
            .field("reply_max_tokens", &self.reply_max_tokens)
            .finish_non_exhaustive()
    }
}
