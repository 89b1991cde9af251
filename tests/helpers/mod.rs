// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports scriptable fake adapters for the generation pipeline and dialogue engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod fakes;
