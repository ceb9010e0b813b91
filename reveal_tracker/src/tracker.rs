// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll tracker: disclosure state, listeners, observer, and lifecycle in one owner.
//!
//! ## Lifecycle
//!
//! - Create one tracker per transcript view with [`ScrollTracker::new`] or
//!   [`ScrollTracker::with_observer`].
//! - Call [`ScrollTracker::set_message_count`] once per transcript load, then
//!   [`ScrollTracker::start_tracking`].
//! - Feed observations through [`ScrollTracker::observe`] / [`ScrollTracker::pump`], or report
//!   them by hand with [`ScrollTracker::track_message_visibility`] and
//!   [`ScrollTracker::mark_user_scrolled`].
//! - [`ScrollTracker::reset`] re-arms for another conversation and keeps listeners.
//! - [`ScrollTracker::destroy`] is terminal; every later call is a no-op.
//!
//! ## Dispatch
//!
//! Latches are set before listeners run, and listeners receive no handle to the tracker,
//! so a milestone can never be delivered twice between resets.
//!
//! With the `std` feature (the default) a panicking listener is logged and skipped like any
//! other failure, and every milestone latched by the same report is still delivered.
//! Built without `std`, a panic unwinds out of the reporting call after the latches are set:
//! the remaining listeners for that report never run and the milestone stays latched until
//! [`ScrollTracker::reset`]. `no_std` callers must keep listeners panic-free.

use alloc::vec::Vec;

use crate::emitter::{ListenerId, ListenerOutcome, MilestoneEmitter};
use crate::observer::{Detached, ObserverEvent, VisibilityObserver};
use crate::options::TrackerOptions;
use crate::state::{DisclosureState, TrackerSnapshot};
use crate::types::{Milestone, Milestones};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Lifecycle {
    Idle,
    Tracking,
    Stopped,
    Destroyed,
}

/// Progressive-disclosure tracker for one transcript view.
///
/// ```
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use reveal_tracker::options::TrackerOptions;
/// use reveal_tracker::tracker::ScrollTracker;
///
/// let mut tracker = ScrollTracker::new(TrackerOptions::default());
/// let unlocked = Rc::new(Cell::new(false));
/// let flag = unlocked.clone();
/// tracker.on_turn6_reached(move || flag.set(true));
///
/// tracker.set_message_count(10);
/// tracker.track_message_visibility(0, true); // first paint
/// tracker.mark_user_scrolled();
/// tracker.track_message_visibility(7, true);
/// assert!(unlocked.get());
/// ```
pub struct ScrollTracker<O: VisibilityObserver = Detached> {
    state: DisclosureState,
    emitter: MilestoneEmitter,
    observer: Option<O>,
    lifecycle: Lifecycle,
    scratch: Vec<ObserverEvent>,
}

impl<O: VisibilityObserver> core::fmt::Debug for ScrollTracker<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollTracker")
            .field("state", &self.state)
            .field("emitter", &self.emitter)
            .field("lifecycle", &self.lifecycle)
            .field("observer_attached", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl ScrollTracker<Detached> {
    /// Create a tracker whose visibility is reported by hand.
    pub fn new(options: TrackerOptions) -> Self {
        Self::with_observer(options, Detached)
    }
}

impl<O: VisibilityObserver> ScrollTracker<O> {
    /// Create a tracker that owns `observer`.
    pub fn with_observer(options: TrackerOptions, observer: O) -> Self {
        Self {
            state: DisclosureState::new(options),
            emitter: MilestoneEmitter::new(),
            observer: Some(observer),
            lifecycle: Lifecycle::Idle,
            scratch: Vec::new(),
        }
    }

    /// Options this tracker runs with.
    pub fn options(&self) -> &TrackerOptions {
        self.state.options()
    }

    /// Set the transcript length. Does not evaluate thresholds.
    pub fn set_message_count(&mut self, count: usize) {
        if self.is_destroyed() {
            return;
        }
        self.state.set_message_count(count);
    }

    /// Report a message's visibility and deliver any milestone it unlocks.
    ///
    /// Returns the milestones latched by this report.
    pub fn track_message_visibility(&mut self, index: usize, is_visible: bool) -> Milestones {
        if self.is_destroyed() {
            return Milestones::empty();
        }
        tracing::trace!(target: "reveal.tracker", index, is_visible, "visibility report");
        let fired = self.state.track_message_visibility(index, is_visible);
        self.dispatch(fired);
        fired
    }

    /// Record that the user scrolled. Only the first call has an effect.
    pub fn mark_user_scrolled(&mut self) {
        if self.is_destroyed() {
            return;
        }
        if self.state.mark_user_scrolled() {
            tracing::debug!(
                target: "reveal.tracker",
                seeded = self.state.visible_messages().len(),
                "first scroll observed; thresholds armed"
            );
        }
    }

    /// Register a listener for the mid-conversation milestone.
    pub fn on_turn6_reached<F, R>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut() -> R + 'static,
        R: ListenerOutcome,
    {
        self.on_milestone(Milestone::Turn6, listener)
    }

    /// Register a listener for the end milestone.
    pub fn on_end_reached<F, R>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut() -> R + 'static,
        R: ListenerOutcome,
    {
        self.on_milestone(Milestone::End, listener)
    }

    /// Register a listener for `milestone`.
    ///
    /// A listener registered after its milestone already latched is not called until the
    /// milestone latches again after a [`reset`](Self::reset). After
    /// [`destroy`](Self::destroy) the listener is dropped and the returned id is inert.
    pub fn on_milestone<F, R>(&mut self, milestone: Milestone, listener: F) -> ListenerId
    where
        F: FnMut() -> R + 'static,
        R: ListenerOutcome,
    {
        if self.is_destroyed() {
            return self.emitter.next_id();
        }
        self.emitter.on(milestone, listener)
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.emitter.remove(id)
    }

    /// Post-scroll visible indices, ascending.
    pub fn visible_messages(&self) -> Vec<usize> {
        self.state.visible_messages()
    }

    /// Snapshot for diagnostics.
    pub fn state(&self) -> TrackerSnapshot {
        self.state.snapshot()
    }

    /// Milestones latched so far.
    pub fn reached(&self) -> Milestones {
        self.state.reached()
    }

    /// Begin accepting observer events. Safe to call repeatedly.
    pub fn start_tracking(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Tracking | Lifecycle::Destroyed) {
            return;
        }
        self.lifecycle = Lifecycle::Tracking;
        tracing::debug!(target: "reveal.tracker", "tracking started");
    }

    /// Disconnect the observer. Latched milestones are kept.
    pub fn stop_tracking(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.disconnect();
        if self.lifecycle == Lifecycle::Tracking {
            tracing::debug!(target: "reveal.tracker", "tracking stopped");
        }
        self.lifecycle = Lifecycle::Stopped;
    }

    /// Clear all per-transcript state and disconnect the observer. Listeners are kept.
    ///
    /// The tracking state is unchanged, so a started tracker keeps accepting events once
    /// the observer is set up for the next transcript.
    pub fn reset(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.disconnect();
        self.state.reset();
        tracing::debug!(target: "reveal.tracker", "tracker reset");
    }

    /// Tear down for good: disconnect and drop the observer, drop listeners, clear state.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.disconnect();
        self.observer = None;
        self.emitter.clear();
        self.state.reset();
        self.scratch = Vec::new();
        self.lifecycle = Lifecycle::Destroyed;
        tracing::debug!(target: "reveal.tracker", "tracker destroyed");
    }

    /// True after [`destroy`](Self::destroy).
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    /// True between [`start_tracking`](Self::start_tracking) and
    /// [`stop_tracking`](Self::stop_tracking).
    pub fn is_tracking(&self) -> bool {
        self.lifecycle == Lifecycle::Tracking
    }

    /// The attached observer, unless destroyed.
    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    /// Run `f` against the observer, then [`pump`](Self::pump) what it produced.
    ///
    /// Returns `f`'s result with the milestones latched by the pump, or `None` after
    /// [`destroy`](Self::destroy).
    pub fn observe<R>(&mut self, f: impl FnOnce(&mut O) -> R) -> Option<(R, Milestones)> {
        let out = f(self.observer.as_mut()?);
        let fired = self.pump();
        Some((out, fired))
    }

    /// Drain the observer and apply its events in order.
    ///
    /// Events drained while not tracking are discarded. Returns every milestone latched
    /// while applying the batch.
    pub fn pump(&mut self) -> Milestones {
        let Some(observer) = self.observer.as_mut() else {
            return Milestones::empty();
        };
        let mut events = core::mem::take(&mut self.scratch);
        observer.drain_events(&mut events);
        let mut fired = Milestones::empty();
        if self.lifecycle == Lifecycle::Tracking {
            for event in events.drain(..) {
                match event {
                    ObserverEvent::Scrolled => self.mark_user_scrolled(),
                    ObserverEvent::Visibility { index, is_visible } => {
                        fired |= self.track_message_visibility(index, is_visible);
                    }
                }
            }
        } else if !events.is_empty() {
            tracing::debug!(
                target: "reveal.tracker",
                dropped = events.len(),
                "observer events dropped while not tracking"
            );
            events.clear();
        }
        self.scratch = events;
        fired
    }

    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.disconnect();
        }
    }

    fn dispatch(&mut self, fired: Milestones) {
        for milestone in fired.milestones() {
            tracing::debug!(
                target: "reveal.tracker",
                milestone = milestone.as_str(),
                highest_seen = self.state.highest_seen(),
                message_count = self.state.message_count(),
                "milestone reached"
            );
            let _ = self.emitter.emit(milestone);
        }
    }
}
