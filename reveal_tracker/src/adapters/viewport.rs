// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Reveal Viewport.
//!
//! ## Feature
//!
//! Enable with `viewport_adapter`.
//!
//! ## Notes
//!
//! [`ViewportAdapter`] wraps an [`IntersectionObserver`] and a one-shot scroll listener, and
//! exposes both as a [`VisibilityObserver`] queue for the
//! [`ScrollTracker`](crate::tracker::ScrollTracker).
//!
//! - Every visibility transition becomes exactly one [`ObserverEvent::Visibility`].
//! - The first scroll after each [`setup`](ViewportAdapter::setup) becomes one
//!   [`ObserverEvent::Scrolled`], queued before the visibility changes that scroll caused.
//!   Later scrolls only produce visibility changes.
//!
//! ```
//! use kurbo::{Rect, Vec2};
//! use reveal_tracker::adapters::viewport::ViewportAdapter;
//! use reveal_tracker::options::TrackerOptions;
//! use reveal_tracker::tracker::ScrollTracker;
//! use reveal_tracker::types::Milestones;
//! use reveal_viewport::MessageLayout;
//!
//! let window = Rect::new(0.0, 0.0, 400.0, 150.0);
//! let mut tracker = ScrollTracker::with_viewport(TrackerOptions::default(), window);
//! tracker.set_message_count(10);
//! tracker.start_tracking();
//!
//! let layout: MessageLayout = (0..10)
//!     .map(|i| (i, Rect::new(0.0, i as f64 * 50.0, 400.0, i as f64 * 50.0 + 50.0)))
//!     .collect();
//! tracker.observe(|a| a.setup(layout, None));
//! assert!(tracker.reached().is_empty());
//!
//! let fired = tracker.observe(|a| a.scroll_to(Vec2::new(0.0, 250.0)));
//! assert_eq!(fired, Some(((), Milestones::TURN6)));
//! ```

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};
use reveal_viewport::{IntersectionObserver, MessageLayout, VisibilityChange};

use crate::observer::{ObserverEvent, VisibilityObserver};
use crate::options::TrackerOptions;
use crate::tracker::ScrollTracker;

/// Geometry-backed observer with a one-shot scroll listener.
#[derive(Clone, Debug)]
pub struct ViewportAdapter {
    observer: IntersectionObserver,
    window: Rect,
    scroll_armed: bool,
    queue: Vec<ObserverEvent>,
    changes: Vec<VisibilityChange>,
}

impl ViewportAdapter {
    /// Create an adapter using `options`' intersection threshold.
    ///
    /// `window` is the scroll root used when [`setup`](Self::setup) is given none.
    /// Pass the same options as the tracker that will own the adapter, or build both at once
    /// with [`ScrollTracker::with_viewport`].
    pub fn new(options: &TrackerOptions, window: Rect) -> Self {
        Self {
            observer: IntersectionObserver::new(options.intersection_threshold()),
            window,
            scroll_armed: false,
            queue: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Observe `layout` inside `root` (or the window), replacing any previous observation.
    ///
    /// Queues the initial visibility of every message and arms the scroll listener.
    /// An empty layout tears down and otherwise does nothing.
    pub fn setup(&mut self, layout: MessageLayout, root: Option<Rect>) {
        self.teardown();
        if layout.is_empty() {
            tracing::debug!(target: "reveal.tracker", "no messages to observe");
            return;
        }
        self.observer.observe(layout, root.unwrap_or(self.window));
        self.scroll_armed = true;
        self.collect();
    }

    /// Stop observing, remove the scroll listener, and drop queued events. Idempotent.
    pub fn teardown(&mut self) {
        self.observer.disconnect();
        self.scroll_armed = false;
        self.queue.clear();
        self.changes.clear();
    }

    /// Minimum intersection ratio at which a message counts as visible.
    pub fn threshold(&self) -> f64 {
        self.observer.threshold()
    }

    /// True while observing a layout.
    pub fn is_observing(&self) -> bool {
        self.observer.is_connected()
    }

    /// True until the first scroll after setup.
    pub fn is_scroll_armed(&self) -> bool {
        self.scroll_armed
    }

    /// Scroll the root to an absolute offset.
    ///
    /// A call that does not move the root is not a scroll and produces nothing.
    pub fn scroll_to(&mut self, offset: Vec2) {
        if offset == self.observer.scroll_offset() {
            return;
        }
        if self.scroll_armed && self.observer.is_connected() {
            self.scroll_armed = false;
            self.queue.push(ObserverEvent::Scrolled);
        }
        self.observer.set_scroll_offset(offset);
        self.collect();
    }

    /// Scroll the root by a delta.
    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll_to(self.observer.scroll_offset() + delta);
    }

    /// Current scroll offset.
    pub fn scroll_offset(&self) -> Vec2 {
        self.observer.scroll_offset()
    }

    /// Resize or move the scroll root. Not a user scroll.
    pub fn resize_root(&mut self, root: Rect) {
        self.observer.set_root(root);
        self.collect();
    }

    /// Replace message geometry, for example after a reflow. Not a user scroll.
    pub fn relayout(&mut self, layout: MessageLayout) {
        self.observer.relayout(layout);
        self.collect();
    }

    /// Indices the observer currently considers visible.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.observer.visible_indices().collect()
    }

    fn collect(&mut self) {
        self.observer.drain_changes_into(&mut self.changes);
        self.queue
            .extend(self.changes.drain(..).map(|c| ObserverEvent::Visibility {
                index: c.index,
                is_visible: c.is_visible,
            }));
    }
}

impl ScrollTracker<ViewportAdapter> {
    /// Create a tracker that owns a [`ViewportAdapter`] built from the same `options`.
    pub fn with_viewport(options: TrackerOptions, window: Rect) -> Self {
        Self::with_observer(options, ViewportAdapter::new(&options, window))
    }
}

impl VisibilityObserver for ViewportAdapter {
    fn drain_events(&mut self, out: &mut Vec<ObserverEvent>) {
        out.append(&mut self.queue);
    }

    fn disconnect(&mut self) {
        self.teardown();
    }
}
