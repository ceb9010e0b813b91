// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracker configuration and its validation errors.

/// Default message index that unlocks the mid-conversation section.
pub const DEFAULT_TURN6_THRESHOLD: usize = 6;

/// Default minimum fraction of a message that must be on screen.
pub const DEFAULT_INTERSECTION_THRESHOLD: f64 = 0.1;

/// Rejected tracker configuration.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The intersection threshold was outside `[0, 1]`.
    #[error("intersection threshold must be within [0, 1], got {0}")]
    IntersectionThresholdOutOfRange(f64),
    /// The intersection threshold was NaN.
    #[error("intersection threshold must be a number")]
    IntersectionThresholdNotANumber,
}

/// Immutable per-tracker options.
///
/// Built with [`TrackerOptions::new`] or [`TrackerOptions::default`]. Values are
/// validated up front; an out-of-range intersection threshold is rejected rather than clamped.
///
/// ```
/// use reveal_tracker::options::{ConfigError, TrackerOptions};
///
/// let opts = TrackerOptions::new(6, 0.25).unwrap();
/// assert_eq!(opts.turn6_threshold(), 6);
/// assert_eq!(
///     TrackerOptions::new(6, 1.5),
///     Err(ConfigError::IntersectionThresholdOutOfRange(1.5))
/// );
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "OptionsRepr", rename_all = "camelCase")
)]
pub struct TrackerOptions {
    turn6_threshold: usize,
    intersection_threshold: f64,
}

impl TrackerOptions {
    /// Create validated options.
    pub fn new(turn6_threshold: usize, intersection_threshold: f64) -> Result<Self, ConfigError> {
        validate_ratio(intersection_threshold)?;
        Ok(Self {
            turn6_threshold,
            intersection_threshold,
        })
    }

    /// Return a copy with a different mid-conversation threshold.
    #[must_use]
    pub fn with_turn6_threshold(self, turn6_threshold: usize) -> Self {
        Self {
            turn6_threshold,
            ..self
        }
    }

    /// Return a copy with a different intersection threshold, validated.
    pub fn with_intersection_threshold(self, ratio: f64) -> Result<Self, ConfigError> {
        Self::new(self.turn6_threshold, ratio)
    }

    /// Message index (0-based) that unlocks the mid-conversation section once seen.
    pub fn turn6_threshold(&self) -> usize {
        self.turn6_threshold
    }

    /// Minimum visible-area fraction for a message to count as visible.
    pub fn intersection_threshold(&self) -> f64 {
        self.intersection_threshold
    }
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            turn6_threshold: DEFAULT_TURN6_THRESHOLD,
            intersection_threshold: DEFAULT_INTERSECTION_THRESHOLD,
        }
    }
}

fn validate_ratio(ratio: f64) -> Result<(), ConfigError> {
    if ratio.is_nan() {
        return Err(ConfigError::IntersectionThresholdNotANumber);
    }
    if !(0.0..=1.0).contains(&ratio) {
        return Err(ConfigError::IntersectionThresholdOutOfRange(ratio));
    }
    Ok(())
}

// Wire shape for deserialization; every value goes back through `TrackerOptions::new`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OptionsRepr {
    turn6_threshold: usize,
    intersection_threshold: f64,
}

#[cfg(feature = "serde")]
impl Default for OptionsRepr {
    fn default() -> Self {
        Self {
            turn6_threshold: DEFAULT_TURN6_THRESHOLD,
            intersection_threshold: DEFAULT_INTERSECTION_THRESHOLD,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<OptionsRepr> for TrackerOptions {
    type Error = ConfigError;

    fn try_from(repr: OptionsRepr) -> Result<Self, Self::Error> {
        Self::new(repr.turn6_threshold, repr.intersection_threshold)
    }
}
