// ABOUTME: Caller-facing service layer for the gallery backend
// ABOUTME: Transport-agnostic operations reusable by the CLI and any future HTTP front end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

//! Caller-facing services
//!
//! Services hold no transport concerns. Every dependency is injected, so tests
//! build a [`GalleryService`] over fakes and the in-memory store.

/// Painting generation, comments, and likes behind one facade
pub mod gallery;

pub use gallery::GalleryService;
