// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pricing bounds, remote endpoints, model defaults, and fixed reply text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// Painting price bounds
pub mod pricing {
    /// Lowest price a generated painting can receive (inclusive)
    pub const MIN_PRICE: i64 = 500;
    /// Upper bound of the generated price range (exclusive)
    pub const MAX_PRICE_EXCLUSIVE: i64 = 2000;
}

/// Remote service endpoints
pub mod endpoints {
    /// Text-to-image endpoint (Clipdrop)
    pub const CLIPDROP_TEXT_TO_IMAGE: &str = "https://clipdrop-api.co/text-to-image/v1";
    /// Image hosting upload endpoint (`ImgBB`)
    pub const IMGBB_UPLOAD: &str = "https://api.imgbb.com/1/upload";
    /// Base URL for the Gemini generative language API
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// LLM model defaults
pub mod models {
    /// Default Gemini model for text and dialogue
    pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
    /// Default Gemini model for image captioning
    pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash";
}

/// Dialogue engine limits and fallbacks
pub mod dialogue {
    /// Output token ceiling for comment replies
    pub const DEFAULT_REPLY_MAX_TOKENS: u32 = 100;
    /// Reply stored when the AI painter cannot answer a new comment
    pub const PLACEHOLDER_REPLY: &str =
        "Cevin.AI is busy at the easel right now. Thanks for the comment!";
}

/// Image payload conventions
pub mod media {
    /// MIME type used for generated images
    pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
    /// File extension used when uploading generated images
    pub const IMAGE_EXTENSION: &str = "jpg";
}

/// Service identity for structured logs
pub mod service_names {
    /// Service name reported at startup
    pub const CANVASCRAFT_SERVER: &str = "canvascraft-server";
}

/// Process environment defaults
pub mod defaults {
    /// Database used when `DATABASE_URL` is unset
    pub const DATABASE_URL: &str = "sqlite:./data/canvascraft.db";
    /// HTTP timeout for remote adapters, in seconds
    pub const HTTP_TIMEOUT_SECS: u64 = 60;
}
