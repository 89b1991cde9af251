// ABOUTME: LLM provider abstraction layer for the AI painter's text and vision calls
// ABOUTME: Defines role-based chat messages, requests, responses, and the provider contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # LLM Provider Interface
//!
//! This module defines the contract a language-model backend implements so the
//! dialogue engine can hold a multi-turn conversation with it.
//!
//! ## Key Concepts
//!
//! - **`LlmProvider`**: Async trait for chat completion
//! - **`ChatMessage`**: Role-based message structure for conversations
//! - **`ChatRequest`**: Request configuration including model and output ceiling
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use canvascraft_server::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let messages = vec![
//!         ChatMessage::user("You are Cevin.AI, a painter."),
//!         ChatMessage::assistant("Great. What is the painting detail"),
//!         ChatMessage::user("I love the colours!"),
//!     ];
//!
//!     let request = ChatRequest::new(messages).with_max_tokens(100);
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant (model) response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            max_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Check if the provider is reachable and the API key is valid
    async fn health_check(&self) -> Result<bool, AppError>;
}
