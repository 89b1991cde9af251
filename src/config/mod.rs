// ABOUTME: Configuration module for the gallery backend
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

/// Environment and server configuration
pub mod environment;

pub use environment::{
    DatabaseUrl, DialogueSettings, GeminiConfig, GenerationSettings, RemoteServiceConfig,
    ServerConfig,
};
