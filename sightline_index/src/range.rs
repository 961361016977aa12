// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contiguous runs of tree indices.

use core::fmt;
use core::ops::Range;

/// Largest exclusive end a [`NumericRange`] may have.
///
/// `u32::MAX` itself is reserved so that `from + count` never overflows.
pub const MAX_END: u32 = u32::MAX;

/// Error returned by [`NumericRange::try_new`] and [`NumericRange::try_from_interval`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The interval end lies before its start.
    #[error("interval end {to_inclusive} lies before start {from}")]
    Inverted {
        /// Requested start.
        from: u32,
        /// Requested inclusive end.
        to_inclusive: u32,
    },
    /// `from + count` would pass [`MAX_END`].
    #[error("range starting at {from} with {count} elements overflows the index space")]
    Overflow {
        /// Requested start.
        from: u32,
        /// Requested element count.
        count: u32,
    },
}

/// A half-open run `[from, from + count)` of tree indices.
///
/// Ranges are plain values: cheap to copy, compared by content. An empty range
/// (`count == 0`) is valid but carries no indices; [`IndexSet`](crate::IndexSet)
/// ignores empty ranges on insertion and removal.
///
/// ```rust
/// use sightline_index::NumericRange;
///
/// let r = NumericRange::from_interval(10, 14);
/// assert_eq!(r.count(), 5);
/// assert!(r.contains(14));
/// assert!(!r.contains(15));
/// assert_eq!(r.iter().collect::<Vec<_>>(), [10, 11, 12, 13, 14]);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct NumericRange {
    from: u32,
    count: u32,
}

impl NumericRange {
    /// Creates a range of `count` indices starting at `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from + count` passes [`MAX_END`]. Use [`try_new`](Self::try_new)
    /// for untrusted input.
    #[must_use]
    pub const fn new(from: u32, count: u32) -> Self {
        assert!(
            (from as u64) + (count as u64) <= MAX_END as u64,
            "NumericRange overflows the index space"
        );
        Self { from, count }
    }

    /// Checked variant of [`new`](Self::new).
    pub const fn try_new(from: u32, count: u32) -> Result<Self, RangeError> {
        if (from as u64) + (count as u64) > MAX_END as u64 {
            return Err(RangeError::Overflow { from, count });
        }
        Ok(Self { from, count })
    }

    /// Creates the range covering `from..=to_inclusive`.
    ///
    /// # Panics
    ///
    /// Panics if `to_inclusive < from` or if the interval reaches `u32::MAX`.
    #[must_use]
    pub const fn from_interval(from: u32, to_inclusive: u32) -> Self {
        assert!(to_inclusive >= from, "interval end lies before its start");
        Self::new(from, to_inclusive - from + 1)
    }

    /// Checked variant of [`from_interval`](Self::from_interval).
    pub const fn try_from_interval(from: u32, to_inclusive: u32) -> Result<Self, RangeError> {
        if to_inclusive < from {
            return Err(RangeError::Inverted { from, to_inclusive });
        }
        if to_inclusive >= MAX_END {
            return Err(RangeError::Overflow {
                from,
                count: MAX_END - from,
            });
        }
        Ok(Self {
            from,
            count: to_inclusive - from + 1,
        })
    }

    /// Builds a range from the exclusive-end form used internally.
    pub(crate) const fn from_bounds(from: u32, end: u32) -> Self {
        Self {
            from,
            count: end - from,
        }
    }

    /// First index in the range.
    #[must_use]
    #[inline]
    pub const fn from(&self) -> u32 {
        self.from
    }

    /// Number of indices in the range.
    #[must_use]
    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// One past the last index in the range.
    #[must_use]
    #[inline]
    pub const fn end(&self) -> u32 {
        self.from + self.count
    }

    /// Last index in the range, or `None` for an empty range.
    #[must_use]
    pub const fn to_inclusive(&self) -> Option<u32> {
        if self.count == 0 {
            None
        } else {
            Some(self.from + self.count - 1)
        }
    }

    /// Returns `true` if the range holds no indices.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if `index` lies within the range.
    #[must_use]
    #[inline]
    pub const fn contains(&self, index: u32) -> bool {
        index >= self.from && index < self.end()
    }

    /// Returns `true` if the two ranges share at least one index.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.from < other.end() && other.from < self.end()
    }

    /// Returns `true` if the ranges overlap or touch end-to-start, i.e. their
    /// union is itself a single contiguous range.
    #[must_use]
    pub const fn intersects_or_coinciding(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.from <= other.end()
            && other.from <= self.end()
    }

    /// Returns `true` if every index of `self` is also in `other`.
    ///
    /// The empty range is inside every range.
    #[must_use]
    pub const fn is_inside(&self, other: &Self) -> bool {
        self.is_empty() || (self.from >= other.from && self.end() <= other.end())
    }

    /// Smallest range covering both inputs.
    ///
    /// Only meaningful as a set union when the ranges
    /// [intersect or coincide](Self::intersects_or_coinciding); otherwise the gap
    /// between them is included too.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::from_bounds(self.from.min(other.from), self.end().max(other.end()))
    }

    /// Indices present in both ranges, or `None` if they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::from_bounds(
            self.from.max(other.from),
            self.end().min(other.end()),
        ))
    }

    /// Iterates the indices in ascending order.
    pub fn iter(&self) -> Range<u32> {
        self.from..self.end()
    }
}

impl IntoIterator for NumericRange {
    type Item = u32;
    type IntoIter = Range<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<NumericRange> for Range<u32> {
    fn from(range: NumericRange) -> Self {
        range.iter()
    }
}

impl fmt::Debug for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_inclusive() {
            Some(last) => write!(f, "[{}..={}]", self.from, last),
            None => write!(f, "[{}..{}) (empty)", self.from, self.from),
        }
    }
}
