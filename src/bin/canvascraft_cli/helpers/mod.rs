// ABOUTME: Helper modules for canvascraft-cli
// ABOUTME: Output formatting shared by every command
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

pub mod output;
