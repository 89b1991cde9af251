// ABOUTME: Google Gemini LLM provider implementation for dialogue and image captioning
// ABOUTME: Talks to the Generative Language generateContent endpoint with text or inline image parts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Gemini Provider
//!
//! Implementation of the `LlmProvider` trait for Google's Gemini models, plus
//! an inherent [`GeminiProvider::describe_image`] call used for captioning.
//!
//! ## Configuration
//!
//! The API key comes from `GEMINI_API_KEY` (or the legacy `GOOGLE_API`) via
//! [`crate::config::ServerConfig`]. It is sent in the `x-goog-api-key` header,
//! never in the URL, so transport errors cannot echo it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use canvascraft_server::llm::{GeminiProvider, LlmProvider, ChatRequest, ChatMessage};
//! use canvascraft_server::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let provider = GeminiProvider::new("your-api-key");
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::user("Describe a sunset over hills as a painting."),
//!     ]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, MessageRole, TokenUsage};
use crate::constants::{endpoints, models};
use crate::errors::AppError;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

/// Part of content (text or inline binary data)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    /// Text content
    Text { text: String },
    /// Base64 payload with its MIME type
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Inline binary payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate_count: Option<u32>,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

/// Usage metadata from Gemini API response
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    default_model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            default_model: models::DEFAULT_TEXT_MODEL.to_owned(),
            base_url: endpoints::GEMINI_API_BASE.to_owned(),
        }
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies)
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Point the provider at a different API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ask a vision-capable model to describe an image
    ///
    /// The image is sent base64-encoded alongside `instruction` in a single
    /// user turn.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the HTTP request fails, the API reports an error,
    /// or the response carries no text.
    #[instrument(skip(self, image, instruction), fields(model = %model.unwrap_or(self.default_model.as_str()), image.bytes = image.len()))]
    pub async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        instruction: &str,
        model: Option<&str>,
    ) -> Result<String, AppError> {
        let model = model.unwrap_or(self.default_model.as_str());
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![
                    ContentPart::Text {
                        text: instruction.to_owned(),
                    },
                    ContentPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_owned(),
                            data: BASE64.encode(image),
                        },
                    },
                ],
            }],
            system_instruction: None,
            generation_config: None,
        };

        debug!("Sending image description request to Gemini API");
        let response = self.send(model, &request).await?;
        Self::extract_content(&response)
    }

    /// Convert our message role to Gemini's role format
    ///
    /// System messages are normally lifted into `system_instruction`; if one
    /// reaches this point it is sent as a user turn.
    const fn convert_role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::System | MessageRole::User => "user",
            MessageRole::Assistant => "model",
        }
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    /// Convert chat messages to Gemini format
    fn convert_messages(messages: &[ChatMessage]) -> (Vec<GeminiContent>, Option<GeminiContent>) {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for message in messages {
            if message.role == MessageRole::System {
                system_instruction = Some(GeminiContent {
                    role: None,
                    parts: vec![ContentPart::Text {
                        text: message.content.clone(),
                    }],
                });
            } else {
                contents.push(GeminiContent {
                    role: Some(Self::convert_role(message.role).to_owned()),
                    parts: vec![ContentPart::Text {
                        text: message.content.clone(),
                    }],
                });
            }
        }

        (contents, system_instruction)
    }

    /// Build a Gemini API request from a `ChatRequest`
    fn build_gemini_request(request: &ChatRequest) -> GeminiRequest {
        let (contents, system_instruction) = Self::convert_messages(&request.messages);

        let generation_config = request.max_tokens.map(|max_tokens| GenerationConfig {
            max_output_tokens: Some(max_tokens),
            candidate_count: Some(1),
        });

        GeminiRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    /// POST a request to `generateContent` and decode the response envelope
    async fn send(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse, AppError> {
        let url = self.build_url(model, "generateContent");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                AppError::internal(format!("HTTP request failed: {e}")).with_source(e)
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| {
                AppError::internal(format!("Failed to read response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse Gemini response");
                AppError::internal(format!("Failed to parse Gemini response: {e}"))
            })?;

        if let Some(error) = gemini_response.error {
            return Err(AppError::internal(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        Ok(gemini_response)
    }

    /// Extract text content from Gemini response, joining multi-part answers
    fn extract_content(response: &GeminiResponse) -> Result<String, AppError> {
        let parts = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        let text: String = parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::InlineData { .. } => None,
            })
            .collect();

        if text.trim().is_empty() {
            return Err(AppError::internal("No content in Gemini response"));
        }
        Ok(text)
    }

    /// Convert usage metadata to our token usage format
    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt.unwrap_or(0),
            completion_tokens: metadata.candidates.unwrap_or(0),
            total_tokens: metadata.total.unwrap_or(0),
        }
    }

    /// Map API error status to an error carrying Gemini's own message
    fn map_api_error(status: u16, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        AppError::internal(format!("Gemini API error ({status}): {message}"))
            .with_details(serde_json::json!({ "status": status }))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model), turns = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let gemini_request = Self::build_gemini_request(request);

        debug!("Sending request to Gemini API");
        let gemini_response = self.send(model, &gemini_request).await?;

        let content = Self::extract_content(&gemini_response)?;
        let usage = gemini_response
            .usage_metadata
            .as_ref()
            .map(Self::convert_usage);
        let finish_reason = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.clone());

        debug!("Successfully received Gemini response");

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Health check failed: {}", e.without_url())))?;

        Ok(response.status().is_success())
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priming_turns_map_to_gemini_roles() {
        let request = ChatRequest::new(vec![
            ChatMessage::user("you are cevin.AI"),
            ChatMessage::assistant("Great. What is the painting detail"),
            ChatMessage::user("nice colours"),
        ])
        .with_max_tokens(100);

        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();

        let roles: Vec<&str> = body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, ["user", "model", "user"]);
        assert_eq!(body["generation_config"]["max_output_tokens"], 100);
        assert!(body.get("system_instruction").is_none());
    }

    #[test]
    fn test_system_message_becomes_instruction() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hello"),
        ]);
        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();

        assert_eq!(body["system_instruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert!(body.get("generation_config").is_none());
    }

    #[test]
    fn test_inline_data_serializes_camel_case() {
        let part = ContentPart::InlineData {
            inline_data: InlineData {
                mime_type: "image/jpeg".to_owned(),
                data: "AAAA".to_owned(),
            },
        };
        let json = serde_json::to_value(part).unwrap();
        assert_eq!(json["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["inlineData"]["data"], "AAAA");
    }

    #[test]
    fn test_extract_content_joins_text_parts() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Warm " }, { "text": "hills." }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(
            GeminiProvider::extract_content(&response).unwrap(),
            "Warm hills."
        );
    }

    #[test]
    fn test_extract_content_rejects_empty_candidates() {
        let response: GeminiResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(GeminiProvider::extract_content(&response).is_err());
    }

    #[test]
    fn test_api_error_message_is_surfaced() {
        let err = GeminiProvider::map_api_error(
            400,
            r#"{"error": {"message": "API key not valid"}}"#,
        );
        assert!(err.message.contains("API key not valid"));
        assert!(err.message.contains("400"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = GeminiProvider::new("super-secret-key");
        let debug_output = format!("{provider:?}");
        assert!(!debug_output.contains("super-secret-key"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
