// ABOUTME: Integration tests for the gallery service facade
// ABOUTME: Exercises every caller-facing operation over fake adapters and both stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use canvascraft_server::{
    constants::dialogue::PLACEHOLDER_REPLY,
    errors::ErrorCode,
    models::{GenerationRequest, LikeTarget, PaintingStatus},
};
use common::{create_memory_store, create_sqlite_store, sunset_request, FakeAdapters};

// ============================================================================
// Generation and Detail
// ============================================================================

#[tokio::test]
async fn test_generation_request_round_trip_through_service() {
    let store = create_memory_store();
    let adapters = FakeAdapters::succeeding();
    let service = adapters.service(store);

    let outcome = service
        .create_generation_request(sunset_request())
        .await
        .unwrap();
    assert_eq!(outcome.status, PaintingStatus::Ready);

    let painting = service.get_painting(&outcome.painting_id).await.unwrap();
    assert_eq!(painting.owner_id.as_deref(), Some("u1"));
    assert_eq!(service.list_paintings(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_generation_request_is_rejected() {
    let service = FakeAdapters::succeeding().service(create_memory_store());

    let error = service
        .create_generation_request(GenerationRequest::new("", "oil", "landscape", "u1"))
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidRequest);
    assert!(service.list_paintings(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_painting_detail_is_imagined_from_title() {
    let adapters = FakeAdapters::succeeding();
    adapters.text.set_reply(Some("Soft blue dusk over a harbor."));
    let service = adapters.service(create_memory_store());

    let detail = service.get_painting_detail("Harbor lights").await.unwrap();

    assert_eq!(detail, "Soft blue dusk over a harbor.");
    assert_eq!(adapters.text.last_call().user_turn, "Harbor lights");
}

#[tokio::test]
async fn test_painting_detail_failure_is_fatal() {
    let adapters = FakeAdapters::succeeding();
    adapters.text.set_reply(None);
    let service = adapters.service(create_memory_store());

    let error = service.get_painting_detail("Harbor lights").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::DialogueFailed);
}

#[tokio::test]
async fn test_get_missing_painting_is_not_found() {
    let service = FakeAdapters::succeeding().service(create_memory_store());

    let error = service.get_painting("nope").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_reply_is_grounded_on_painting_detail() {
    for store in [create_memory_store(), create_sqlite_store().await.unwrap()] {
        let adapters = FakeAdapters::succeeding();
        let service = adapters.service(store);
        let painting_id = service
            .create_generation_request(sunset_request())
            .await
            .unwrap()
            .painting_id;

        let comment = service
            .create_comment(&painting_id, "fan@example.com", "Love the glow")
            .await
            .unwrap();

        assert_eq!(comment.painting_id, painting_id);
        assert_eq!(comment.reply_text, "Thank you, friend!");
        let call = adapters.text.last_call();
        assert_eq!(call.priming[2].content, "Golden light spills over rolling hills.");

        let listed = service
            .list_comments_for_painting(&painting_id, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        let by_author = service
            .list_comments_by_author("FAN@example.com", Some(10))
            .await
            .unwrap();
        assert_eq!(by_author.len(), 1);
    }
}

#[tokio::test]
async fn test_comment_on_missing_painting_is_not_found() {
    let adapters = FakeAdapters::succeeding();
    let service = adapters.service(create_memory_store());

    let error = service
        .create_comment("nope", "fan@example.com", "Hello?")
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert!(adapters.text.calls().is_empty());
}

#[tokio::test]
async fn test_comment_survives_reply_outage() {
    let adapters = FakeAdapters::succeeding();
    let service = adapters.service(create_memory_store());
    let painting_id = service
        .create_generation_request(sunset_request())
        .await
        .unwrap()
        .painting_id;

    adapters.text.set_reply(None);
    let comment = service
        .create_comment(&painting_id, "fan@example.com", "Love it")
        .await
        .unwrap();

    assert_eq!(comment.reply_text, PLACEHOLDER_REPLY);
}

#[tokio::test]
async fn test_edit_and_delete_comment() {
    let adapters = FakeAdapters::succeeding();
    let service = adapters.service(create_memory_store());
    let painting_id = service
        .create_generation_request(sunset_request())
        .await
        .unwrap()
        .painting_id;
    let comment = service
        .create_comment(&painting_id, "fan@example.com", "Nice")
        .await
        .unwrap();

    adapters.text.set_reply(Some("Now that is a compliment!"));
    let edited = service.edit_comment(&comment.id, "Breathtaking").await.unwrap();
    assert_eq!(edited.comment_text, "Breathtaking");
    assert_eq!(edited.reply_text, "Now that is a compliment!");
    assert_eq!(
        adapters.text.last_call().priming[2].content,
        "Golden light spills over rolling hills."
    );

    service.delete_comment(&comment.id).await.unwrap();
    service.delete_comment(&comment.id).await.unwrap();
    let error = service.edit_comment(&comment.id, "Again").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

// ============================================================================
// Likes
// ============================================================================

#[tokio::test]
async fn test_toggle_like_reports_updated_count() {
    let service = FakeAdapters::succeeding().service(create_memory_store());
    let painting_id = service
        .create_generation_request(sunset_request())
        .await
        .unwrap()
        .painting_id;
    let target = LikeTarget::Painting(painting_id.clone());

    assert_eq!(service.toggle_like(&target, "a@x.com").await.unwrap().like_count, 1);
    assert_eq!(service.toggle_like(&target, "b@x.com").await.unwrap().like_count, 2);
    assert_eq!(service.toggle_like(&target, "a@x.com").await.unwrap().like_count, 1);

    let painting = service.get_painting(&painting_id).await.unwrap();
    assert_eq!(painting.like_count, painting.liked_by.len());
}
