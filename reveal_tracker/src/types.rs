// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Milestone identifiers and flags.
//!
//! ## Overview
//!
//! A milestone is a one-shot event unlocked by scrolling far enough through a transcript.
//! [`Milestone`] names a single one; [`Milestones`] is the flag set returned by every
//! visibility update, holding the latches that update fired.

/// A one-shot disclosure event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Milestone {
    /// The mid-conversation threshold message has been seen.
    Turn6,
    /// The last message of the transcript has been seen.
    End,
}

impl Milestone {
    /// Every milestone, in dispatch order.
    pub const ALL: [Self; 2] = [Self::Turn6, Self::End];

    /// The flag corresponding to this milestone.
    pub const fn flag(self) -> Milestones {
        match self {
            Self::Turn6 => Milestones::TURN6,
            Self::End => Milestones::END,
        }
    }

    /// Stable name, matching the assessment point it unlocks.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Turn6 => "turn6",
            Self::End => "end",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Turn6 => 0,
            Self::End => 1,
        }
    }
}

impl core::fmt::Display for Milestone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// A set of milestones, for example the latches fired by one visibility update.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Milestones: u8 {
        /// See [`Milestone::Turn6`].
        const TURN6 = 0b0000_0001;
        /// See [`Milestone::End`].
        const END   = 0b0000_0010;
    }
}

impl Milestones {
    /// Iterate the contained milestones in dispatch order (`Turn6` before `End`).
    pub fn milestones(self) -> impl Iterator<Item = Milestone> {
        Milestone::ALL
            .into_iter()
            .filter(move |m| self.contains(m.flag()))
    }
}

impl From<Milestone> for Milestones {
    fn from(m: Milestone) -> Self {
        m.flag()
    }
}
