// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the viewport: message layout, visibility changes, and ratio helpers.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map;

use kurbo::Rect;

/// Explicit mapping from message index to message bounds in content coordinates.
///
/// The renderer owns message identity; it hands the tracker a layout instead of
/// tagging elements and letting the tracker search for them. Iteration is in
/// ascending index order, which is also the order changes are reported in.
///
/// Rects are normalized on insert, so callers may pass them with either corner first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageLayout {
    entries: BTreeMap<usize, Rect>,
}

impl MessageLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bounds of message `index`, returning the previous bounds if any.
    pub fn insert(&mut self, index: usize, bounds: Rect) -> Option<Rect> {
        self.entries.insert(index, bounds.abs())
    }

    /// Remove message `index` from the layout.
    pub fn remove(&mut self, index: usize) -> Option<Rect> {
        self.entries.remove(&index)
    }

    /// Bounds of message `index`, if it is laid out.
    pub fn get(&self, index: usize) -> Option<Rect> {
        self.entries.get(&index).copied()
    }

    /// Number of laid out messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no messages are laid out.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest laid out message index.
    pub fn last_index(&self) -> Option<usize> {
        self.entries.keys().next_back().copied()
    }

    /// Iterate `(index, bounds)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        self.entries.iter().map(|(&i, &r)| (i, r))
    }

    /// Union of all message bounds. Returns `None` if empty.
    pub fn content_bounds(&self) -> Option<Rect> {
        let mut it = self.entries.values().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}

impl FromIterator<(usize, Rect)> for MessageLayout {
    fn from_iter<I: IntoIterator<Item = (usize, Rect)>>(iter: I) -> Self {
        let mut layout = Self::new();
        layout.extend(iter);
        layout
    }
}

impl Extend<(usize, Rect)> for MessageLayout {
    fn extend<I: IntoIterator<Item = (usize, Rect)>>(&mut self, iter: I) {
        for (index, bounds) in iter {
            self.insert(index, bounds);
        }
    }
}

impl IntoIterator for MessageLayout {
    type Item = (usize, Rect);
    type IntoIter = btree_map::IntoIter<usize, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A single visibility transition reported by the
/// [`IntersectionObserver`](crate::IntersectionObserver).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisibilityChange {
    /// Message index whose visibility changed.
    pub index: usize,
    /// Whether the message now counts as visible.
    pub is_visible: bool,
    /// Intersection ratio at the time of the report, in `[0, 1]`.
    pub ratio: f64,
}

/// Fraction of `element` covered by `viewport`, in `[0, 1]`.
///
/// Zero-area elements report `1.0` while they touch the viewport (edges inclusive)
/// and `0.0` otherwise.
pub fn intersection_ratio(element: Rect, viewport: Rect) -> f64 {
    let element = element.abs();
    let viewport = viewport.abs();
    if !touches(element, viewport) {
        return 0.0;
    }
    let area = element.area();
    if area <= 0.0 {
        return 1.0;
    }
    (element.intersect(viewport).area() / area).clamp(0.0, 1.0)
}

/// True if `element` counts as visible inside `viewport` at `threshold`.
///
/// Visible means the element touches the viewport and its
/// [`intersection_ratio`] is at least `threshold`. A threshold of `0.0`
/// therefore accepts elements that only share an edge with the viewport.
pub fn is_visible_at(element: Rect, viewport: Rect, threshold: f64) -> bool {
    let element = element.abs();
    let viewport = viewport.abs();
    touches(element, viewport) && intersection_ratio(element, viewport) >= threshold
}

fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}
