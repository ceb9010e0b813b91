// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the Reveal benchmarks.

use kurbo::Rect;
use reveal_viewport::MessageLayout;

/// A column of `n` messages, `row_h` tall and `width` wide, starting at the origin.
pub fn column_layout(n: usize, row_h: f64, width: f64) -> MessageLayout {
    (0..n)
        .map(|i| {
            let y0 = i as f64 * row_h;
            (i, Rect::new(0.0, y0, width, y0 + row_h))
        })
        .collect()
}
