// ABOUTME: Price assignment for finalized paintings
// ABOUTME: Draws a uniformly distributed integer price once per painting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use rand::Rng;

use crate::constants::pricing::{MAX_PRICE_EXCLUSIVE, MIN_PRICE};

/// Draw a price in `[MIN_PRICE, MAX_PRICE_EXCLUSIVE)`
pub fn generate_price<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.gen_range(MIN_PRICE..MAX_PRICE_EXCLUSIVE)
}
