// ABOUTME: Deterministic fake adapters with scriptable outcomes and call recording
// ABOUTME: Stand in for the text-to-image, caption, hosting, and text generation services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

#![allow(dead_code, clippy::must_use_candidate)]

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use canvascraft_server::{
    adapters::{HostedImage, ImageCaptioner, ImageHost, ImageSynthesizer, TextGenerator},
    errors::{AppError, AppResult, ErrorCode},
    llm::{ChatMessage, MessageRole},
};

/// Bytes every successful fake synthesis returns
pub const FAKE_IMAGE: &[u8] = b"\xFF\xD8\xFFfake-jpeg";

// ============================================================================
// Image synthesis
// ============================================================================

pub struct FakeSynthesizer {
    fail: Mutex<bool>,
    prompts: Mutex<Vec<String>>,
}

impl FakeSynthesizer {
    pub fn succeeding() -> Self {
        Self {
            fail: Mutex::new(false),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let fake = Self::succeeding();
        fake.set_failing(true);
        fake
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSynthesizer for FakeSynthesizer {
    async fn synthesize_image(&self, prompt: &str) -> AppResult<Bytes> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        if *self.fail.lock().unwrap() {
            return Err(AppError::upstream_unavailable(
                "Text-to-image service returned 503",
            ));
        }
        Ok(Bytes::from_static(FAKE_IMAGE))
    }
}

// ============================================================================
// Captioning
// ============================================================================

pub struct FakeCaptioner {
    caption: Mutex<Option<String>>,
    calls: Mutex<usize>,
}

impl FakeCaptioner {
    pub fn succeeding(caption: &str) -> Self {
        Self {
            caption: Mutex::new(Some(caption.to_owned())),
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            caption: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ImageCaptioner for FakeCaptioner {
    async fn caption_image(&self, image: &[u8]) -> AppResult<String> {
        *self.calls.lock().unwrap() += 1;
        assert_eq!(image, FAKE_IMAGE, "captioner must receive the synthesized bytes");
        self.caption
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::caption_failed("Vision model returned 500"))
    }
}

// ============================================================================
// Hosting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostBehavior {
    Succeed,
    Error,
    ReportFailure,
}

pub struct FakeHost {
    behavior: Mutex<HostBehavior>,
    labels: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn with_behavior(behavior: HostBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            labels: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_behavior(HostBehavior::Succeed)
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for FakeHost {
    async fn host_image(&self, image: &[u8], label_hint: &str) -> AppResult<HostedImage> {
        assert_eq!(image, FAKE_IMAGE, "host must receive the synthesized bytes");
        self.labels.lock().unwrap().push(label_hint.to_owned());
        match *self.behavior.lock().unwrap() {
            HostBehavior::Succeed => Ok(HostedImage {
                url: "https://i.example.com/full.jpg".into(),
                thumbnail_url: "https://i.example.com/thumb.jpg".into(),
                success: true,
            }),
            HostBehavior::ReportFailure => Ok(HostedImage {
                url: String::new(),
                thumbnail_url: String::new(),
                success: false,
            }),
            HostBehavior::Error => Err(AppError::hosting_failed("Upload rejected")),
        }
    }
}

// ============================================================================
// Text generation
// ============================================================================

/// One recorded call to the text generator
#[derive(Debug, Clone)]
pub struct TextCall {
    pub priming: Vec<ChatMessage>,
    pub user_turn: String,
    pub max_tokens: Option<u32>,
}

impl TextCall {
    /// Whether `needle` appears in any priming turn with `role`
    pub fn primed_with(&self, role: MessageRole, needle: &str) -> bool {
        self.priming
            .iter()
            .any(|m| m.role == role && m.content.contains(needle))
    }
}

pub struct FakeTextGenerator {
    reply: Mutex<Option<String>>,
    failure_code: ErrorCode,
    calls: Mutex<Vec<TextCall>>,
}

impl FakeTextGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Mutex::new(Some(reply.to_owned())),
            failure_code: ErrorCode::DialogueFailed,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::failing_with(ErrorCode::DialogueFailed)
    }

    /// Fail every call with `code` instead of the usual `DialogueFailed`
    pub fn failing_with(code: ErrorCode) -> Self {
        Self {
            reply: Mutex::new(None),
            failure_code: code,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: Option<&str>) {
        *self.reply.lock().unwrap() = reply.map(str::to_owned);
    }

    pub fn calls(&self) -> Vec<TextCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> TextCall {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }

    fn answer(&self, call: TextCall) -> AppResult<String> {
        self.calls.lock().unwrap().push(call);
        self.reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::new(self.failure_code, "Text model returned 429"))
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate_text(&self, prompt: &str, max_tokens: Option<u32>) -> AppResult<String> {
        self.answer(TextCall {
            priming: Vec::new(),
            user_turn: prompt.to_owned(),
            max_tokens,
        })
    }

    async fn continue_dialogue(
        &self,
        priming: &[ChatMessage],
        user_turn: &str,
        max_tokens: Option<u32>,
    ) -> AppResult<String> {
        self.answer(TextCall {
            priming: priming.to_vec(),
            user_turn: user_turn.to_owned(),
            max_tokens,
        })
    }
}
