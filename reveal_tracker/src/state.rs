// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disclosure state machine: compute milestone latches from visibility reports.
//!
//! ## Usage
//!
//! 1) Set the transcript length with [`DisclosureState::set_message_count`].
//! 2) Report visibility with [`DisclosureState::track_message_visibility`]. Reports made before
//!    [`DisclosureState::mark_user_scrolled`] only calibrate the initial visible set.
//! 3) Each post-scroll report returns the [`Milestones`] it latched. Latches fire at most once
//!    until [`DisclosureState::reset`].
//!
//! ## Trigger signal
//!
//! Thresholds are compared against a high-water mark: the highest index ever seen visible after
//! the first scroll (seeded from the initial visible set). A message that was seen and then
//! scrolled past still counts, so scrolling back up can never suppress a milestone.
//!
//! ## Minimal example
//!
//! ```
//! use reveal_tracker::options::TrackerOptions;
//! use reveal_tracker::state::DisclosureState;
//! use reveal_tracker::types::Milestones;
//!
//! let mut s = DisclosureState::new(TrackerOptions::default());
//! s.set_message_count(10);
//! // First paint only calibrates; it never latches by itself.
//! assert_eq!(s.track_message_visibility(0, true), Milestones::empty());
//! // The first scroll seeds the high-water mark from the initial set (here 0).
//! s.mark_user_scrolled();
//! assert_eq!(s.track_message_visibility(7, true), Milestones::TURN6);
//! ```
//!
//! A message on screen at first paint still counts once the reviewer scrolls: had index 9
//! been visible initially, the first post-scroll report would return `TURN6 | END`.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::options::TrackerOptions;
use crate::types::Milestones;

/// Per-transcript disclosure state.
///
/// Owned by exactly one tracker. Pure data: it never calls listeners, it only reports which
/// latches a given update fired.
#[derive(Clone, Debug, PartialEq)]
pub struct DisclosureState {
    options: TrackerOptions,
    message_count: usize,
    visible: BTreeSet<usize>,
    initial_visible: BTreeSet<usize>,
    has_user_scrolled: bool,
    highest_seen: Option<usize>,
    reached: Milestones,
}

/// Point-in-time view of a tracker, for diagnostics and tests.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TrackerSnapshot {
    /// Whether the mid-conversation milestone has latched.
    pub turn6_reached: bool,
    /// Whether the end milestone has latched.
    pub end_reached: bool,
    /// Post-scroll visible indices, ascending.
    pub visible_messages: Vec<usize>,
    /// Indices visible at first paint, ascending.
    pub initial_visible_messages: Vec<usize>,
    /// Whether the first scroll has been observed.
    pub has_user_scrolled: bool,
    /// Transcript length.
    pub message_count: usize,
    /// Highest index seen visible since the first scroll.
    pub highest_seen: Option<usize>,
    /// Options the tracker runs with.
    pub options: TrackerOptions,
}

impl DisclosureState {
    /// Create an unarmed state with no transcript loaded.
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            options,
            message_count: 0,
            visible: BTreeSet::new(),
            initial_visible: BTreeSet::new(),
            has_user_scrolled: false,
            highest_seen: None,
            reached: Milestones::empty(),
        }
    }

    /// Options this state evaluates with.
    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Set the transcript length. Does not evaluate thresholds.
    ///
    /// A count below already-seen indices is allowed; it only moves the end reference point.
    pub fn set_message_count(&mut self, count: usize) {
        self.message_count = count;
    }

    /// Transcript length.
    pub fn message_count(&self) -> usize {
        self.message_count
    }

    /// Record that the user scrolled. Returns `true` on the first call only.
    ///
    /// The first call arms threshold evaluation and seeds the visible set (and the
    /// high-water mark) from the initial visible set. It never fires milestones by itself.
    pub fn mark_user_scrolled(&mut self) -> bool {
        if self.has_user_scrolled {
            return false;
        }
        self.has_user_scrolled = true;
        self.visible.clone_from(&self.initial_visible);
        self.highest_seen = self.visible.last().copied();
        true
    }

    /// Whether the first scroll has been observed.
    pub fn has_user_scrolled(&self) -> bool {
        self.has_user_scrolled
    }

    /// Apply a visibility report and return the milestones it latched.
    ///
    /// Before the first scroll the report only updates the initial visible set and
    /// nothing is evaluated. Afterwards the visible set and high-water mark are updated
    /// and both thresholds are checked independently.
    pub fn track_message_visibility(&mut self, index: usize, is_visible: bool) -> Milestones {
        if !self.has_user_scrolled {
            toggle(&mut self.initial_visible, index, is_visible);
            return Milestones::empty();
        }
        toggle(&mut self.visible, index, is_visible);
        if is_visible {
            self.highest_seen = Some(self.highest_seen.map_or(index, |h| h.max(index)));
        }
        self.evaluate()
    }

    fn evaluate(&mut self) -> Milestones {
        if self.message_count == 0 {
            return Milestones::empty();
        }
        let Some(highest) = self.highest_seen else {
            return Milestones::empty();
        };
        let mut fired = Milestones::empty();
        if !self.reached.contains(Milestones::TURN6) && highest >= self.options.turn6_threshold()
        {
            fired |= Milestones::TURN6;
        }
        if !self.reached.contains(Milestones::END) && highest >= self.message_count - 1 {
            fired |= Milestones::END;
        }
        self.reached |= fired;
        fired
    }

    /// Latches fired so far.
    pub fn reached(&self) -> Milestones {
        self.reached
    }

    /// Whether the mid-conversation milestone has latched.
    pub fn turn6_reached(&self) -> bool {
        self.reached.contains(Milestones::TURN6)
    }

    /// Whether the end milestone has latched.
    pub fn end_reached(&self) -> bool {
        self.reached.contains(Milestones::END)
    }

    /// Highest index seen visible since the first scroll.
    pub fn highest_seen(&self) -> Option<usize> {
        self.highest_seen
    }

    /// Post-scroll visible indices, ascending.
    pub fn visible_messages(&self) -> Vec<usize> {
        self.visible.iter().copied().collect()
    }

    /// Indices visible at first paint, ascending.
    pub fn initial_visible_messages(&self) -> Vec<usize> {
        self.initial_visible.iter().copied().collect()
    }

    /// Return to the unarmed state with no transcript loaded. Options are kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.options);
    }

    /// Capture a snapshot.
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            turn6_reached: self.turn6_reached(),
            end_reached: self.end_reached(),
            visible_messages: self.visible_messages(),
            initial_visible_messages: self.initial_visible_messages(),
            has_user_scrolled: self.has_user_scrolled,
            message_count: self.message_count,
            highest_seen: self.highest_seen,
            options: self.options,
        }
    }
}

fn toggle(set: &mut BTreeSet<usize>, index: usize, present: bool) {
    if present {
        set.insert(index);
    } else {
        set.remove(&index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn armed(count: usize) -> DisclosureState {
        let mut s = DisclosureState::new(TrackerOptions::default());
        s.set_message_count(count);
        s.mark_user_scrolled();
        s
    }

    #[test]
    fn pre_scroll_reports_only_calibrate() {
        let mut s = DisclosureState::new(TrackerOptions::default());
        s.set_message_count(3);
        for i in 0..3 {
            assert!(s.track_message_visibility(i, true).is_empty());
        }
        assert!(!s.turn6_reached() && !s.end_reached());
        assert_eq!(s.initial_visible_messages(), vec![0, 1, 2]);
        assert!(s.visible_messages().is_empty());
        assert_eq!(s.highest_seen(), None);
    }

    #[test]
    fn turn6_fires_at_threshold_not_below() {
        let mut s = armed(20);
        assert!(s.track_message_visibility(5, true).is_empty());
        assert_eq!(s.track_message_visibility(6, true), Milestones::TURN6);
        assert!(s.track_message_visibility(7, true).is_empty());
        assert!(s.turn6_reached() && !s.end_reached());
    }

    #[test]
    fn end_fires_only_for_last_index() {
        let mut s = armed(20);
        assert_eq!(s.track_message_visibility(18, true), Milestones::TURN6);
        assert!(!s.end_reached());
        assert_eq!(s.track_message_visibility(19, true), Milestones::END);
        assert!(s.track_message_visibility(19, true).is_empty());
    }

    #[test]
    fn single_message_latches_end_only() {
        let mut s = armed(1);
        assert_eq!(s.track_message_visibility(0, true), Milestones::END);
        assert!(!s.turn6_reached());
    }

    #[test]
    fn short_transcript_can_latch_both_at_once() {
        let mut s = DisclosureState::new(TrackerOptions::default().with_turn6_threshold(2));
        s.set_message_count(3);
        s.mark_user_scrolled();
        assert_eq!(
            s.track_message_visibility(2, true),
            Milestones::TURN6 | Milestones::END
        );
    }

    #[test]
    fn empty_transcript_never_latches() {
        let mut s = armed(0);
        for i in 0..50 {
            assert!(s.track_message_visibility(i, true).is_empty());
        }
        assert_eq!(s.reached(), Milestones::empty());
    }

    #[test]
    fn scrolling_past_the_threshold_still_counts() {
        let mut s = armed(30);
        // Seen, then scrolled back above it; the count arrives later.
        s.set_message_count(0);
        let _ = s.track_message_visibility(8, true);
        let _ = s.track_message_visibility(8, false);
        s.set_message_count(30);
        assert_eq!(s.track_message_visibility(1, true), Milestones::TURN6);
        assert_eq!(s.visible_messages(), vec![1]);
        assert_eq!(s.highest_seen(), Some(8));
    }

    #[test]
    fn first_scroll_seeds_visible_set_without_firing() {
        let mut s = DisclosureState::new(TrackerOptions::default());
        s.set_message_count(10);
        let _ = s.track_message_visibility(0, true);
        let _ = s.track_message_visibility(9, true);
        let _ = s.track_message_visibility(0, false);
        assert!(s.mark_user_scrolled());
        assert!(!s.mark_user_scrolled());
        assert_eq!(s.visible_messages(), vec![9]);
        assert!(s.reached().is_empty());
        // Any later report evaluates against the seeded high-water mark.
        assert_eq!(
            s.track_message_visibility(8, false),
            Milestones::TURN6 | Milestones::END
        );
    }

    #[test]
    fn seed_from_top_of_transcript_latches_turn6_alone() {
        let mut s = DisclosureState::new(TrackerOptions::default());
        s.set_message_count(10);
        assert!(s.track_message_visibility(0, true).is_empty());
        s.mark_user_scrolled();
        assert_eq!(s.highest_seen(), Some(0));
        assert_eq!(s.track_message_visibility(7, true), Milestones::TURN6);
        assert!(!s.end_reached());
    }

    #[test]
    fn shrinking_count_moves_end_point() {
        let mut s = armed(20);
        let _ = s.track_message_visibility(4, true);
        s.set_message_count(5);
        assert_eq!(s.track_message_visibility(3, true), Milestones::END);
    }

    #[test]
    fn reset_rearms_but_keeps_options() {
        let opts = TrackerOptions::new(2, 0.5).unwrap();
        let mut s = DisclosureState::new(opts);
        s.set_message_count(3);
        s.mark_user_scrolled();
        let _ = s.track_message_visibility(2, true);
        s.reset();
        assert_eq!(s, DisclosureState::new(opts));
        assert!(!s.has_user_scrolled());
        assert_eq!(s.message_count(), 0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut s = armed(10);
        let _ = s.track_message_visibility(7, true);
        let _ = s.track_message_visibility(3, true);
        let snap = s.snapshot();
        assert!(snap.turn6_reached);
        assert!(!snap.end_reached);
        assert_eq!(snap.visible_messages, vec![3, 7]);
        assert!(snap.has_user_scrolled);
        assert_eq!(snap.message_count, 10);
        assert_eq!(snap.highest_seen, Some(7));
        assert_eq!(snap.options, TrackerOptions::default());
    }
}
