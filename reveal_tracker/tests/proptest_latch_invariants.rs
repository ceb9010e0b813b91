// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for the scroll tracker.
//!
//! 1. Latches are monotone and fire at most once between resets
//! 2. Listeners run at most once per latch
//! 3. Reports before the first scroll never latch anything
//! 4. An empty transcript never latches
//! 5. Latches agree with the high-water mark of post-scroll reports, in both directions
//! 6. Replaying a sequence after reset fires the same milestones

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use reveal_tracker::options::TrackerOptions;
use reveal_tracker::tracker::ScrollTracker;
use reveal_tracker::types::Milestones;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Report(usize, bool),
    Scroll,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (0usize..40, any::<bool>()).prop_map(|(i, v)| Op::Report(i, v)),
        1 => Just(Op::Scroll),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..120)
}

#[derive(Default)]
struct Counts {
    turn6: usize,
    end: usize,
}

fn tracker_with_counts(turn6: usize, count: usize) -> (ScrollTracker, Rc<RefCell<Counts>>) {
    let opts = TrackerOptions::default().with_turn6_threshold(turn6);
    let mut t = ScrollTracker::new(opts);
    let counts = Rc::new(RefCell::new(Counts::default()));
    let c = counts.clone();
    t.on_turn6_reached(move || c.borrow_mut().turn6 += 1);
    let c = counts.clone();
    t.on_end_reached(move || c.borrow_mut().end += 1);
    t.set_message_count(count);
    (t, counts)
}

/// Apply operations, returning every non-empty fired set in order.
fn apply(t: &mut ScrollTracker, ops: &[Op]) -> Vec<Milestones> {
    let mut fired = Vec::new();
    for op in ops {
        match op {
            Op::Report(i, v) => {
                let f = t.track_message_visibility(*i, *v);
                if !f.is_empty() {
                    fired.push(f);
                }
            }
            Op::Scroll => t.mark_user_scrolled(),
        }
    }
    fired
}

/// True when some report comes after the first scroll, so thresholds were evaluated.
fn reported_after_scroll(ops: &[Op]) -> bool {
    ops.iter()
        .skip_while(|op| !matches!(op, Op::Scroll))
        .any(|op| matches!(op, Op::Report(..)))
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn latches_are_monotone_and_fire_once(
        turn6 in 0usize..12,
        count in 0usize..40,
        ops in ops_strategy(),
    ) {
        let (mut t, counts) = tracker_with_counts(turn6, count);
        let mut seen = Milestones::empty();
        for op in &ops {
            let before = t.reached();
            let _ = apply(&mut t, std::slice::from_ref(op));
            let after = t.reached();
            prop_assert!(after.contains(before), "latch cleared without reset");
            seen |= after;
        }
        prop_assert_eq!(t.reached(), seen);
        let counts = counts.borrow();
        prop_assert!(counts.turn6 <= 1);
        prop_assert!(counts.end <= 1);
        prop_assert_eq!(counts.turn6 == 1, t.state().turn6_reached);
        prop_assert_eq!(counts.end == 1, t.state().end_reached);
    }

    #[test]
    fn pre_scroll_reports_never_latch(
        count in 1usize..40,
        reports in prop::collection::vec((0usize..40, any::<bool>()), 0..80),
    ) {
        let (mut t, counts) = tracker_with_counts(0, count);
        for (i, v) in reports {
            prop_assert!(t.track_message_visibility(i, v).is_empty());
        }
        prop_assert!(t.reached().is_empty());
        prop_assert!(t.visible_messages().is_empty());
        prop_assert_eq!(counts.borrow().turn6 + counts.borrow().end, 0);
    }

    #[test]
    fn empty_transcript_never_latches(ops in ops_strategy()) {
        let (mut t, counts) = tracker_with_counts(0, 0);
        prop_assert!(apply(&mut t, &ops).is_empty());
        prop_assert!(t.reached().is_empty());
        prop_assert_eq!(counts.borrow().turn6 + counts.borrow().end, 0);
    }

    #[test]
    fn latches_match_high_water_mark(
        turn6 in 0usize..12,
        count in 1usize..40,
        ops in ops_strategy(),
    ) {
        let (mut t, _counts) = tracker_with_counts(turn6, count);
        let _ = apply(&mut t, &ops);
        let snap = t.state();
        if let Some(high) = snap.highest_seen {
            // Latched implies the mark passed the threshold.
            if snap.turn6_reached {
                prop_assert!(high >= turn6);
            }
            if snap.end_reached {
                prop_assert!(high + 1 >= count);
            }
            // Once any report follows the first scroll, a mark past the threshold implies a latch.
            if reported_after_scroll(&ops) {
                prop_assert_eq!(snap.turn6_reached, high >= turn6);
                prop_assert_eq!(snap.end_reached, high + 1 >= count);
            }
        } else {
            prop_assert!(t.reached().is_empty());
        }
        prop_assert!(snap.visible_messages.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reset_replays_identically(
        turn6 in 0usize..12,
        count in 0usize..40,
        ops in ops_strategy(),
    ) {
        let (mut t, counts) = tracker_with_counts(turn6, count);
        let first = apply(&mut t, &ops);
        let first_state = t.state();
        t.reset();
        t.set_message_count(count);
        let second = apply(&mut t, &ops);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first_state, &t.state());
        let counts = counts.borrow();
        prop_assert_eq!(counts.turn6, 2 * usize::from(first_state.turn6_reached));
        prop_assert_eq!(counts.end, 2 * usize::from(first_state.end_reached));
    }

    #[test]
    fn repeated_scroll_marks_equal_one(
        initial in prop::collection::btree_set(0usize..30, 0..10),
        extra_marks in 1usize..5,
    ) {
        let (mut t, _counts) = tracker_with_counts(6, 30);
        for &i in &initial {
            let _ = t.track_message_visibility(i, true);
        }
        for _ in 0..extra_marks {
            t.mark_user_scrolled();
        }
        let expected: Vec<usize> = initial.iter().copied().collect();
        prop_assert_eq!(t.visible_messages(), expected.clone());
        prop_assert_eq!(t.state().initial_visible_messages, expected);
        prop_assert!(t.reached().is_empty());
    }
}

// ── Fixed scenarios ─────────────────────────────────────────────────────

#[test]
fn turn6_threshold_boundary() {
    let (mut t, counts) = tracker_with_counts(6, 20);
    t.mark_user_scrolled();
    assert!(t.track_message_visibility(5, true).is_empty());
    assert_eq!(t.track_message_visibility(6, true), Milestones::TURN6);
    assert_eq!(counts.borrow().turn6, 1);
}

#[test]
fn seeded_mark_latches_on_the_next_report() {
    let (mut t, counts) = tracker_with_counts(6, 10);
    assert!(t.track_message_visibility(9, true).is_empty());
    t.mark_user_scrolled();
    assert!(t.reached().is_empty());
    assert_eq!(
        t.track_message_visibility(3, false),
        Milestones::TURN6 | Milestones::END
    );
    assert_eq!((counts.borrow().turn6, counts.borrow().end), (1, 1));
}

#[test]
fn one_message_transcript_latches_end_only() {
    let (mut t, counts) = tracker_with_counts(6, 1);
    t.mark_user_scrolled();
    assert_eq!(t.track_message_visibility(0, true), Milestones::END);
    assert_eq!(counts.borrow().turn6, 0);
    assert_eq!(counts.borrow().end, 1);
}
