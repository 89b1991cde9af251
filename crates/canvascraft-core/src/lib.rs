// ABOUTME: Core types and constants for the CanvasCraft AI painting gallery
// ABOUTME: Foundation crate with the error taxonomy, gallery records, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

#![deny(unsafe_code)]

//! # CanvasCraft Core
//!
//! Foundation crate providing shared types for the CanvasCraft gallery backend.
//! It changes rarely, so the server crate recompiles independently of it.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the structured `ErrorResponse`
//! - **models**: generation requests, painting and comment records, like sets
//! - **constants**: pricing bounds, endpoints, model defaults, placeholder text

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Gallery data models
pub mod models;
