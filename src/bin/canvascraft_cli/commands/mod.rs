// ABOUTME: Command implementations for canvascraft-cli
// ABOUTME: Each command builds what it needs from configuration and prints JSON results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use canvascraft_server::{
    adapters::build_http_client,
    config::{environment::env_vars, ServerConfig},
    database::create_store,
    errors::{AppError, AppResult},
    ledger,
    llm::{GeminiProvider, LlmProvider},
    models::{GenerationRequest, LikeTarget},
    services::GalleryService,
};
use tracing::info;

use crate::helpers::output::print_json;

/// Run the generation pipeline and print the outcome
pub async fn generate(
    config: &ServerConfig,
    prompt: String,
    category: String,
    subtype: String,
    requester: String,
) -> AppResult<()> {
    let service = GalleryService::from_config(config).await?;
    let request = GenerationRequest::new(prompt, category, subtype, requester);

    let task = service.orchestrator().start(request).await?;
    print_json(&task.outcome)?;

    // The process would exit before a background run finishes
    if let Some(completion) = task.completion {
        info!("Waiting for background finalization");
        completion
            .await
            .map_err(|e| AppError::internal(format!("Generation task panicked: {e}")))??;
    }
    Ok(())
}

/// Imagine and print a painting description
pub async fn detail(config: &ServerConfig, title: &str) -> AppResult<()> {
    let service = GalleryService::from_config(config).await?;
    let detail = service.get_painting_detail(title).await?;
    print_json(&serde_json::json!({ "title": title.trim(), "detail": detail }))
}

/// Print ready paintings
pub async fn list_paintings(config: &ServerConfig, limit: Option<u32>) -> AppResult<()> {
    let store = create_store(&config.database).await?;
    print_json(&store.list_paintings(limit).await?)
}

/// Print one painting
pub async fn get_painting(config: &ServerConfig, painting_id: &str) -> AppResult<()> {
    let store = create_store(&config.database).await?;
    let painting = store
        .get_painting(painting_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Painting {painting_id}")))?;
    print_json(&painting)
}

/// Comment on a painting and print the stored comment with its reply
pub async fn create_comment(
    config: &ServerConfig,
    painting_id: &str,
    author_email: &str,
    text: &str,
) -> AppResult<()> {
    let service = GalleryService::from_config(config).await?;
    let comment = service.create_comment(painting_id, author_email, text).await?;
    print_json(&comment)
}

/// Edit a comment and print the updated record
pub async fn edit_comment(config: &ServerConfig, comment_id: &str, text: &str) -> AppResult<()> {
    let service = GalleryService::from_config(config).await?;
    let comment = service.edit_comment(comment_id, text).await?;
    print_json(&comment)
}

/// Delete a comment
pub async fn delete_comment(config: &ServerConfig, comment_id: &str) -> AppResult<()> {
    let store = create_store(&config.database).await?;
    ledger::delete_comment(store.as_ref(), comment_id).await?;
    print_json(&serde_json::json!({ "deleted": comment_id }))
}

/// Print comments on a painting or by an author
pub async fn list_comments(
    config: &ServerConfig,
    painting_id: Option<String>,
    author_email: Option<String>,
    limit: Option<u32>,
) -> AppResult<()> {
    let store = create_store(&config.database).await?;
    let comments = match (painting_id, author_email) {
        (Some(painting_id), _) => store.list_comments_for_painting(&painting_id, limit).await?,
        (None, Some(author_email)) => store.list_comments_by_author(&author_email, limit).await?,
        (None, None) => {
            return Err(AppError::invalid_request(
                "Either --painting or --author is required",
            ))
        }
    };
    print_json(&comments)
}

/// Toggle a like and print the new state
pub async fn toggle_like(config: &ServerConfig, target: &LikeTarget, user_id: &str) -> AppResult<()> {
    let store = create_store(&config.database).await?;
    print_json(&ledger::toggle_like(store.as_ref(), target, user_id).await?)
}

/// Ping the text model and print whether it answered
pub async fn health(config: &ServerConfig) -> AppResult<()> {
    let api_key = config
        .gemini
        .api_key
        .as_deref()
        .ok_or_else(|| AppError::config_missing(env_vars::GEMINI_API_KEY))?;
    let provider = GeminiProvider::new(api_key)
        .with_client(build_http_client(config.http_timeout_secs)?)
        .with_default_model(config.gemini.text_model.clone());

    let healthy = provider.health_check().await?;
    print_json(&serde_json::json!({
        "provider": provider.display_name(),
        "model": provider.default_model(),
        "healthy": healthy,
    }))
}
