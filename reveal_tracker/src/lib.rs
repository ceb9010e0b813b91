// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal Tracker: scroll-gated progressive disclosure for transcript review.
//!
//! ## Overview
//!
//! A reviewer rates a chat transcript at three points: the beginning, around turn six, and the end.
//! To avoid anchoring, the later rating sections stay hidden until the reviewer has actually scrolled
//! to the corresponding part of the conversation. This crate decides when that has happened.
//!
//! It does not render anything and does not measure the viewport itself.
//! Instead, feed it visibility reports (message index, visible or not), either by hand or from a
//! [`VisibilityObserver`](crate::observer::VisibilityObserver), and it fires two one-shot milestones:
//! [`Milestone::Turn6`](crate::types::Milestone::Turn6) and [`Milestone::End`](crate::types::Milestone::End).
//!
//! ## Initial paint vs. scrolling
//!
//! Messages already on screen when the transcript first paints are recorded as the initial visible set
//! and never count toward a milestone on their own. Threshold checks start after the first scroll,
//! which seeds the live visible set from the initial one.
//!
//! ## Milestones
//!
//! - `Turn6` latches once the highest message seen since the first scroll reaches
//!   [`TrackerOptions::turn6_threshold`](crate::options::TrackerOptions::turn6_threshold).
//! - `End` latches once that message is the last one of the transcript.
//! - Both are independent and can latch from the same report. Each fires its listeners at most once
//!   until [`ScrollTracker::reset`](crate::tracker::ScrollTracker::reset).
//! - Nothing latches while the message count is zero.
//!
//! ## Layering
//!
//! - [`state`]: the pure state machine. Reports which latches an update fired.
//! - [`emitter`]: ordered listener lists that log and skip failing listeners.
//! - [`tracker`]: owns state, listeners, and an observer, and adds the lifecycle
//!   (start, stop, reset, destroy).
//! - [`sections`]: the consumer-side flags for which assessment sections are shown.
//! - [`adapters`]: observers built on other Reveal crates (feature-gated).
//!
//! ## Workflow
//!
//! 1) Create a [`ScrollTracker`](crate::tracker::ScrollTracker) per transcript view and register listeners.
//! 2) Set the message count and start tracking.
//! 3) Report visibility; call `mark_user_scrolled` on the first scroll (an observer does both for you).
//! 4) On navigation to another transcript, `reset`; on unmount, `destroy`.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use reveal_tracker::options::TrackerOptions;
//! use reveal_tracker::sections::{AssessmentPoint, SectionVisibility};
//! use reveal_tracker::tracker::ScrollTracker;
//! use reveal_tracker::types::Milestone;
//!
//! let sections = Rc::new(RefCell::new(SectionVisibility::new()));
//! let mut tracker = ScrollTracker::new(TrackerOptions::default());
//! for m in Milestone::ALL {
//!     let s = sections.clone();
//!     tracker.on_milestone(m, move || {
//!         s.borrow_mut().reveal(m.flag());
//!     });
//! }
//!
//! tracker.set_message_count(10);
//! tracker.start_tracking();
//! for i in 0..3 {
//!     tracker.track_message_visibility(i, true);
//! }
//! tracker.mark_user_scrolled();
//! tracker.track_message_visibility(4, true);
//! assert!(!sections.borrow().is_visible(AssessmentPoint::Turn6));
//! tracker.track_message_visibility(7, true);
//! assert!(sections.borrow().is_visible(AssessmentPoint::Turn6));
//! assert!(!sections.borrow().is_visible(AssessmentPoint::End));
//! tracker.track_message_visibility(9, true);
//! assert!(sections.borrow().is_visible(AssessmentPoint::End));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (on by default) adds panic
//! isolation for listeners; see [`tracker`] for what happens without it.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod adapters;
pub mod emitter;
pub mod observer;
pub mod options;
pub mod sections;
pub mod state;
pub mod tracker;
pub mod types;
