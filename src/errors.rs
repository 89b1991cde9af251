// ABOUTME: Error types for the gallery backend, re-exported from the core crate
// ABOUTME: Keeps `crate::errors` as the single import path inside the server package
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! # Unified Error Handling System
//!
//! See [`canvascraft_core::errors`] for the taxonomy. Everything is re-exported
//! here so modules import from `crate::errors`.

pub use canvascraft_core::errors::*;
