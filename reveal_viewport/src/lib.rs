// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal Viewport: a Kurbo-native intersection observer for message lists.
//!
//! Reveal Viewport answers one question for a transcript view: which messages are on screen right now,
//! and which of them just crossed the visibility ratio?
//!
//! - Messages are described by an explicit [`MessageLayout`]: a mapping from message index to its
//!   bounds in content coordinates. There is no scanning for tagged elements.
//! - A scroll root (the scrollable region, or the window when none is given) is translated by the
//!   current scroll offset to produce the viewport.
//! - [`IntersectionObserver`] compares every observed message against the viewport and emits a
//!   [`VisibilityChange`] whenever a message's visibility flips.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange messages. Upstream code computes message bounds with whatever
//! layout system it uses and hands the results over as a [`MessageLayout`].
//!
//! ## Visibility rule
//!
//! The intersection ratio of a message is `area(message ∩ viewport) / area(message)`.
//! A message is visible when it touches the viewport (edges inclusive) and its ratio is at least the
//! observer's threshold. Zero-area messages have ratio `1.0` while touching the viewport.
//! See [`intersection_ratio`].
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Rect, Vec2};
//! use reveal_viewport::{IntersectionObserver, MessageLayout, VisibilityChange};
//!
//! // Ten rows, 50 units tall, in a 100-unit-tall scroll root.
//! let layout: MessageLayout = (0..10)
//!     .map(|i| (i, Rect::new(0.0, i as f64 * 50.0, 200.0, i as f64 * 50.0 + 50.0)))
//!     .collect();
//! let mut observer = IntersectionObserver::new(0.1);
//! observer.observe(layout, Rect::new(0.0, 0.0, 200.0, 100.0));
//!
//! // Initial report: one entry per message, rows 0 and 1 are visible.
//! let initial = observer.take_changes();
//! assert_eq!(initial.len(), 10);
//! assert!(initial[0].is_visible && initial[1].is_visible && !initial[2].is_visible);
//!
//! // Scroll down by two rows: 0 and 1 leave, 2 and 3 enter.
//! observer.set_scroll_offset(Vec2::new(0.0, 100.0));
//! let changes: Vec<_> = observer
//!     .take_changes()
//!     .into_iter()
//!     .map(|c: VisibilityChange| (c.index, c.is_visible))
//!     .collect();
//! assert_eq!(changes, vec![(0, false), (1, false), (2, true), (3, true)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod observer;
mod types;

pub use observer::IntersectionObserver;
pub use types::{MessageLayout, VisibilityChange, intersection_ratio, is_visible_at};
