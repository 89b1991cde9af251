// ABOUTME: Conversational text adapter over any LLM provider
// ABOUTME: Maps provider failures and empty answers to DialogueFailed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{instrument, warn};

use super::TextGenerator;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;

/// Text generator delegating to an [`LlmProvider`]
#[derive(Clone)]
pub struct LlmTextGenerator {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
}

impl LlmTextGenerator {
    /// Use the provider's default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Override the model used for every call
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    async fn complete(&self, messages: Vec<ChatMessage>, max_tokens: Option<u32>) -> AppResult<String> {
        let mut request = ChatRequest::new(messages);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        if let Some(max_tokens) = max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let started = Instant::now();
        let result = self.provider.complete(&request).await;
        AppLogger::log_external_call(
            self.provider.name(),
            "complete",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );

        let response = result.map_err(|e| {
            warn!(error = %e, provider = self.provider.name(), "Text generation failed");
            e.recode(ErrorCode::DialogueFailed)
        })?;

        let text = response.content.trim();
        if text.is_empty() {
            return Err(AppError::dialogue_failed("Model returned an empty reply"));
        }
        Ok(text.to_owned())
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    #[instrument(skip(self, prompt), fields(provider = self.provider.name()))]
    async fn generate_text(&self, prompt: &str, max_tokens: Option<u32>) -> AppResult<String> {
        self.complete(vec![ChatMessage::user(prompt)], max_tokens)
            .await
    }

    #[instrument(skip(self, priming, user_turn), fields(provider = self.provider.name(), turns = priming.len() + 1))]
    async fn continue_dialogue(
        &self,
        priming: &[ChatMessage],
        user_turn: &str,
        max_tokens: Option<u32>,
    ) -> AppResult<String> {
        let mut messages = priming.to_vec();
        messages.push(ChatMessage::user(user_turn));
        self.complete(messages, max_tokens).await
    }
}
