// ABOUTME: Output formatting helpers for canvascraft-cli
// ABOUTME: Results go to stdout as pretty JSON, failures to stderr as a structured error body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use canvascraft_server::errors::{AppError, AppResult, ErrorResponse};
use serde::Serialize;

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a failure as `{ "error": { "code", "message", ... } }` on stderr
pub fn print_error(error: AppError) {
    let fallback = error.to_string();
    let response = ErrorResponse::from(error);
    match serde_json::to_string_pretty(&response) {
        Ok(body) => eprintln!("{body}"),
        Err(_) => eprintln!("{fallback}"),
    }
}
