// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection observer over a [`MessageLayout`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

use crate::types::{MessageLayout, VisibilityChange, intersection_ratio, is_visible_at};

/// Watches a set of messages inside a scroll root and reports visibility transitions.
///
/// ## Usage
///
/// - Construct with [`IntersectionObserver::new`] and a ratio threshold in `[0, 1]`.
/// - Call [`IntersectionObserver::observe`] with the layout and the scroll root rect.
///   Every observed message gets one initial report, visible or not.
/// - Feed scroll offsets, root resizes, and relayouts; only transitions are reported.
/// - Drain reports with [`IntersectionObserver::take_changes`].
///
/// Reports from a single update are queued in ascending index order.
/// [`IntersectionObserver::disconnect`] drops any queued reports and stops observation.
#[derive(Clone, Debug)]
pub struct IntersectionObserver {
    threshold: f64,
    layout: MessageLayout,
    root: Rect,
    offset: Vec2,
    // Last reported visibility per observed message.
    reported: BTreeMap<usize, bool>,
    pending: Vec<VisibilityChange>,
    connected: bool,
}

impl IntersectionObserver {
    /// Create a disconnected observer.
    ///
    /// `threshold` is the minimum intersection ratio for a message to count as visible.
    /// It should be in `[0, 1]`; range checking is left to the configuration layer.
    pub fn new(threshold: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&threshold),
            "intersection threshold must be in [0, 1]"
        );
        Self {
            threshold,
            layout: MessageLayout::new(),
            root: Rect::ZERO,
            offset: Vec2::ZERO,
            reported: BTreeMap::new(),
            pending: Vec::new(),
            connected: false,
        }
    }

    /// Ratio threshold this observer was built with.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True between [`observe`](Self::observe) and [`disconnect`](Self::disconnect).
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Currently observed layout.
    pub fn layout(&self) -> &MessageLayout {
        &self.layout
    }

    /// Current scroll offset applied to the root.
    pub fn scroll_offset(&self) -> Vec2 {
        self.offset
    }

    /// The visible region in content coordinates: the root translated by the scroll offset.
    pub fn viewport(&self) -> Rect {
        self.root + self.offset
    }

    /// Start observing `layout` against `root`, replacing any previous observation.
    ///
    /// Queues one initial report per message. An empty layout is valid and reports nothing.
    pub fn observe(&mut self, layout: MessageLayout, root: Rect) {
        self.disconnect();
        self.layout = layout;
        self.root = root.abs();
        self.connected = true;
        let viewport = self.viewport();
        for (index, bounds) in self.layout.iter() {
            let ratio = intersection_ratio(bounds, viewport);
            let is_visible = is_visible_at(bounds, viewport, self.threshold);
            self.reported.insert(index, is_visible);
            self.pending.push(VisibilityChange {
                index,
                is_visible,
                ratio,
            });
        }
        tracing::debug!(
            target: "reveal.viewport",
            messages = self.layout.len(),
            "observation started"
        );
    }

    /// Stop observing and drop queued reports. Idempotent.
    pub fn disconnect(&mut self) {
        if self.connected {
            tracing::debug!(target: "reveal.viewport", "observation stopped");
        }
        self.connected = false;
        self.layout = MessageLayout::new();
        self.reported.clear();
        self.pending.clear();
    }

    /// Set the absolute scroll offset and report resulting transitions.
    ///
    /// The offset is remembered while disconnected and applies to the next observation.
    pub fn set_scroll_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.recompute();
    }

    /// Resize or move the scroll root and report resulting transitions.
    pub fn set_root(&mut self, root: Rect) {
        self.root = root.abs();
        self.recompute();
    }

    /// Replace the observed layout, for example after messages were measured again.
    ///
    /// New messages get an initial report. Messages no longer in the layout are reported
    /// hidden if they were last reported visible, then forgotten.
    pub fn relayout(&mut self, layout: MessageLayout) {
        if !self.connected {
            return;
        }
        let dropped: Vec<usize> = self
            .reported
            .keys()
            .copied()
            .filter(|i| layout.get(*i).is_none())
            .collect();
        for index in dropped {
            if self.reported.remove(&index) == Some(true) {
                self.pending.push(VisibilityChange {
                    index,
                    is_visible: false,
                    ratio: 0.0,
                });
            }
        }
        self.layout = layout;
        self.recompute();
    }

    /// Indices currently considered visible.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.reported
            .iter()
            .filter_map(|(&i, &visible)| visible.then_some(i))
    }

    /// Take all queued reports, oldest first.
    pub fn take_changes(&mut self) -> Vec<VisibilityChange> {
        core::mem::take(&mut self.pending)
    }

    /// Move all queued reports into `out`, oldest first.
    pub fn drain_changes_into(&mut self, out: &mut Vec<VisibilityChange>) {
        out.append(&mut self.pending);
    }

    fn recompute(&mut self) {
        if !self.connected {
            return;
        }
        let viewport = self.viewport();
        let before = self.pending.len();
        for (index, bounds) in self.layout.iter() {
            let ratio = intersection_ratio(bounds, viewport);
            let is_visible = is_visible_at(bounds, viewport, self.threshold);
            let previous = self.reported.insert(index, is_visible);
            if previous != Some(is_visible) {
                self.pending.push(VisibilityChange {
                    index,
                    is_visible,
                    ratio,
                });
            }
        }
        tracing::trace!(
            target: "reveal.viewport",
            changes = self.pending.len() - before,
            "viewport recomputed"
        );
    }
}
