// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Assessment section visibility driven by milestones.
//!
//! The assessment sidebar shows the `beginning` section immediately and reveals `turn6` and
//! `end` only after the corresponding milestone. [`SectionVisibility`] is that flag set.

use crate::types::{Milestone, Milestones};

/// A point in the conversation at which ratings are collected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum AssessmentPoint {
    /// Before reading; always available.
    Beginning,
    /// Mid-conversation, after the turn6 milestone.
    Turn6,
    /// End of conversation, after the end milestone.
    End,
}

impl AssessmentPoint {
    /// Every assessment point in conversation order.
    pub const ALL: [Self; 3] = [Self::Beginning, Self::Turn6, Self::End];

    /// Stable key used by the assessment store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginning => "beginning",
            Self::Turn6 => "turn6",
            Self::End => "end",
        }
    }

    /// Parse a stable key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == key)
    }

    /// The section flag for this point.
    pub const fn section(self) -> Sections {
        match self {
            Self::Beginning => Sections::BEGINNING,
            Self::Turn6 => Sections::TURN6,
            Self::End => Sections::END,
        }
    }

    /// The milestone that unlocks this point, if any.
    pub const fn unlocked_by(self) -> Option<Milestone> {
        match self {
            Self::Beginning => None,
            Self::Turn6 => Some(Milestone::Turn6),
            Self::End => Some(Milestone::End),
        }
    }
}

bitflags::bitflags! {
    /// Set of assessment sections.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Sections: u8 {
        /// See [`AssessmentPoint::Beginning`].
        const BEGINNING = 0b0000_0001;
        /// See [`AssessmentPoint::Turn6`].
        const TURN6     = 0b0000_0010;
        /// See [`AssessmentPoint::End`].
        const END       = 0b0000_0100;
    }
}

impl Sections {
    /// Sections unlocked by a set of milestones (never includes `BEGINNING`).
    pub fn unlocked_by(milestones: Milestones) -> Self {
        let mut out = Self::empty();
        if milestones.contains(Milestones::TURN6) {
            out |= Self::TURN6;
        }
        if milestones.contains(Milestones::END) {
            out |= Self::END;
        }
        out
    }
}

/// Which assessment sections are currently shown.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SectionVisibility {
    visible: Sections,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionVisibility {
    /// Only the beginning section is visible.
    pub fn new() -> Self {
        Self {
            visible: Sections::BEGINNING,
        }
    }

    /// Reveal sections for `milestones`, returning the sections that were newly revealed.
    pub fn reveal(&mut self, milestones: Milestones) -> Sections {
        let newly = Sections::unlocked_by(milestones) - self.visible;
        self.visible |= newly;
        newly
    }

    /// Whether `point` is shown.
    pub fn is_visible(&self, point: AssessmentPoint) -> bool {
        self.visible.contains(point.section())
    }

    /// All shown sections.
    pub fn visible(&self) -> Sections {
        self.visible
    }

    /// Hide everything except the beginning section.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
