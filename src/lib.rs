// ABOUTME: Main library entry point for the CanvasCraft AI painting gallery backend
// ABOUTME: Wires the generation pipeline, the AI painter dialogue engine, and the reaction ledger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

#![deny(unsafe_code)]

//! # CanvasCraft Server
//!
//! Backend core for an online gallery of AI-generated paintings.
//!
//! ## Features
//!
//! - **Generation pipeline**: prompt to hosted, priced painting with a
//!   provisional record that is deleted again when a fatal stage fails
//! - **AI painter persona**: in-character replies to comments and imagined
//!   painting details, primed by fixed conversation turns
//! - **Reactions**: set-based like toggling for paintings and comments
//!
//! ## Architecture
//!
//! - **Adapters**: typed clients for text-to-image, captioning, hosting, and text generation
//! - **Dialogue**: the persona engine built on the text adapter
//! - **Generation**: the orchestrator state machine
//! - **Ledger**: comment and like operations
//! - **Database**: the `GalleryStore` trait with `SQLite` and in-memory backends
//! - **Services**: the `GalleryService` facade callers use
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use canvascraft_server::config::environment::ServerConfig;
//! use canvascraft_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Remote capability adapters
pub mod adapters;

/// Environment configuration
pub mod config;

/// Gallery persistence
pub mod database;

/// AI painter persona dialogue engine
pub mod dialogue;

/// Error types
pub mod errors;

/// Generation orchestrator
pub mod generation;

/// Comment and like operations
pub mod ledger;

/// LLM provider abstraction
pub mod llm;

/// Logging configuration
pub mod logging;

/// Caller-facing service facade
pub mod services;

/// Constants shared with the core crate
pub use canvascraft_core::constants;

/// Gallery records shared with the core crate
pub use canvascraft_core::models;
