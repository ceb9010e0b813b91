// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll through a ten-message transcript and watch assessment sections unlock.
//!
//! Run:
//! - `cargo run -p reveal_demos --example transcript_walkthrough`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Rect, Vec2};
use reveal_tracker::options::TrackerOptions;
use reveal_tracker::sections::{AssessmentPoint, SectionVisibility};
use reveal_tracker::tracker::ScrollTracker;
use reveal_tracker::types::Milestone;
use reveal_viewport::MessageLayout;

const ROW_H: f64 = 80.0;
const WIDTH: f64 = 640.0;
const MESSAGES: usize = 10;

fn main() {
    // The window shows three messages at a time.
    let window = Rect::new(0.0, 0.0, WIDTH, 3.0 * ROW_H);
    let mut tracker = ScrollTracker::with_viewport(TrackerOptions::default(), window);

    let sections = Rc::new(RefCell::new(SectionVisibility::new()));
    for m in Milestone::ALL {
        let s = sections.clone();
        tracker.on_milestone(m, move || {
            let newly = s.borrow_mut().reveal(m.flag());
            println!("  milestone {m}: revealed {newly:?}");
        });
    }

    let layout: MessageLayout = (0..MESSAGES)
        .map(|i| {
            let y0 = i as f64 * ROW_H;
            (i, Rect::new(0.0, y0, WIDTH, y0 + ROW_H))
        })
        .collect();

    tracker.set_message_count(MESSAGES);
    tracker.start_tracking();
    tracker.observe(|a| a.setup(layout, None));
    println!(
        "first paint: initial visible {:?}",
        tracker.state().initial_visible_messages
    );

    for y in [160.0, 400.0, 0.0, 560.0] {
        println!("scroll to {y:.0}");
        if let Some(((), fired)) = tracker.observe(|a| a.scroll_to(Vec2::new(0.0, y))) {
            if !fired.is_empty() {
                println!("  this scroll latched {fired:?}");
            }
        }
        let shown: Vec<_> = AssessmentPoint::ALL
            .into_iter()
            .filter(|p| sections.borrow().is_visible(*p))
            .map(AssessmentPoint::as_str)
            .collect();
        println!(
            "  visible messages {:?}, sections {:?}",
            tracker.visible_messages(),
            shown
        );
    }

    tracker.destroy();
}
