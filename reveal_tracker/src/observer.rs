// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The observation seam between a visibility source and the tracker.
//!
//! ## Overview
//!
//! A [`VisibilityObserver`] turns whatever viewport primitive the host has into a queue of
//! [`ObserverEvent`]s. The [`ScrollTracker`](crate::tracker::ScrollTracker) owns one observer,
//! drains it on [`pump`](crate::tracker::ScrollTracker::pump), and disconnects it on stop, reset,
//! and destroy.
//!
//! - [`Detached`] never produces events; use it when visibility is fed by hand.
//! - [`ScriptedObserver`] replays a queued event sequence, handy for tests and replays.
//! - With the `viewport_adapter` feature, [`ViewportAdapter`](crate::adapters::viewport::ViewportAdapter)
//!   derives events from message geometry.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// One observation delivered to the tracker.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ObserverEvent {
    /// The scroll root scrolled for the first time since setup.
    Scrolled,
    /// A message crossed the visibility ratio in either direction.
    Visibility {
        /// Message index.
        index: usize,
        /// Whether the message now counts as visible.
        is_visible: bool,
    },
}

/// A source of visibility observations.
pub trait VisibilityObserver {
    /// Move every queued event into `out`, oldest first.
    fn drain_events(&mut self, out: &mut Vec<ObserverEvent>);

    /// Stop producing events and drop anything queued. Must be idempotent.
    fn disconnect(&mut self);
}

/// Observer used when visibility is reported by hand.
#[derive(Copy, Clone, Debug, Default)]
pub struct Detached;

impl VisibilityObserver for Detached {
    #[inline]
    fn drain_events(&mut self, _out: &mut Vec<ObserverEvent>) {}

    #[inline]
    fn disconnect(&mut self) {}
}

/// Observer that replays events pushed onto it.
///
/// ```
/// use reveal_tracker::observer::{ObserverEvent, ScriptedObserver, VisibilityObserver};
///
/// let mut obs = ScriptedObserver::new();
/// obs.visible(0).scrolled().visible(7);
/// let mut out = Vec::new();
/// obs.drain_events(&mut out);
/// assert_eq!(out[1], ObserverEvent::Scrolled);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedObserver {
    queue: VecDeque<ObserverEvent>,
    disconnects: usize,
}

impl ScriptedObserver {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary event.
    pub fn push(&mut self, event: ObserverEvent) -> &mut Self {
        self.queue.push_back(event);
        self
    }

    /// Queue a scroll.
    pub fn scrolled(&mut self) -> &mut Self {
        self.push(ObserverEvent::Scrolled)
    }

    /// Queue a message becoming visible.
    pub fn visible(&mut self, index: usize) -> &mut Self {
        self.push(ObserverEvent::Visibility {
            index,
            is_visible: true,
        })
    }

    /// Queue a message becoming hidden.
    pub fn hidden(&mut self, index: usize) -> &mut Self {
        self.push(ObserverEvent::Visibility {
            index,
            is_visible: false,
        })
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// How many times [`VisibilityObserver::disconnect`] was called.
    pub fn disconnects(&self) -> usize {
        self.disconnects
    }
}

impl VisibilityObserver for ScriptedObserver {
    fn drain_events(&mut self, out: &mut Vec<ObserverEvent>) {
        out.extend(self.queue.drain(..));
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.queue.clear();
    }
}
