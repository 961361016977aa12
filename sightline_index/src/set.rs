// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range-compressed index set.

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::range::{NumericRange, RangeError};

/// A set of tree indices stored as sorted, disjoint, non-adjacent runs.
///
/// Tree indices of a CAD model are dense, so styled subsets (a whole pipe
/// system, every node below an asset) tend to be a handful of long runs.
/// `IndexSet` keeps those runs as [`NumericRange`]s in ascending order and
/// merges neighbours eagerly, so two sets with the same contents always have
/// the same representation and `==` compares contents.
///
/// Membership is a binary search over the runs; union, intersection and
/// difference with another set are linear merges over both run lists.
///
/// ```rust
/// use sightline_index::{IndexSet, NumericRange};
///
/// let mut set: IndexSet = [1, 2, 3].into_iter().collect();
/// set.add_range(NumericRange::from_interval(4, 10));
/// assert_eq!(set.ranges(), &[NumericRange::from_interval(1, 10)]);
///
/// set.remove(5);
/// assert_eq!(set.count(), 9);
/// assert!(!set.contains(5));
///
/// let other: IndexSet = (8..20).collect();
/// set.intersect_with(&other);
/// assert_eq!(set.to_vec(), [8, 9, 10]);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct IndexSet {
    ranges: Vec<NumericRange>,
}

impl IndexSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Creates a set holding exactly the indices of `range`.
    #[must_use]
    pub fn from_range(range: NumericRange) -> Self {
        let mut set = Self::new();
        set.add_range(range);
        set
    }

    /// Inserts a single index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is `u32::MAX`, which lies past [`MAX_END`](crate::MAX_END).
    /// Use [`try_add`](Self::try_add) for untrusted input.
    pub fn add(&mut self, index: u32) {
        self.add_range(NumericRange::new(index, 1));
    }

    /// Inserts a single index, rejecting `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Overflow`] for `u32::MAX`; the set is unchanged.
    pub fn try_add(&mut self, index: u32) -> Result<(), RangeError> {
        self.add_range(NumericRange::try_new(index, 1)?);
        Ok(())
    }

    /// Inserts every index of `range`, merging with runs it overlaps or touches.
    pub fn add_range(&mut self, range: NumericRange) {
        if range.is_empty() {
            return;
        }
        // Runs in [first, last) overlap or touch `range` and collapse into one.
        let first = self.ranges.partition_point(|r| r.end() < range.from());
        let last = self.ranges.partition_point(|r| r.from() <= range.end());

        let mut from = range.from();
        let mut end = range.end();
        if first < last {
            from = from.min(self.ranges[first].from());
            end = end.max(self.ranges[last - 1].end());
        }
        self.ranges
            .splice(first..last, [NumericRange::from_bounds(from, end)]);
    }

    /// Removes a single index.
    ///
    /// `u32::MAX` is never a member, so removing it does nothing.
    pub fn remove(&mut self, index: u32) {
        if let Ok(range) = NumericRange::try_new(index, 1) {
            self.remove_range(range);
        }
    }

    /// Removes every index of `range`, splitting runs that straddle its bounds.
    pub fn remove_range(&mut self, range: NumericRange) {
        if range.is_empty() || self.ranges.is_empty() {
            return;
        }
        // Runs in [first, last) share at least one index with `range`.
        let first = self.ranges.partition_point(|r| r.end() <= range.from());
        let last = self.ranges.partition_point(|r| r.from() < range.end());
        if first >= last {
            return;
        }

        let head = self.ranges[first];
        let tail = self.ranges[last - 1];
        let mut remnants: [Option<NumericRange>; 2] = [None, None];
        if head.from() < range.from() {
            remnants[0] = Some(NumericRange::from_bounds(head.from(), range.from()));
        }
        if tail.end() > range.end() {
            remnants[1] = Some(NumericRange::from_bounds(range.end(), tail.end()));
        }
        self.ranges
            .splice(first..last, remnants.into_iter().flatten());
    }

    /// Returns `true` if `index` is in the set.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        let idx = self.ranges.partition_point(|r| r.end() <= index);
        self.ranges
            .get(idx)
            .is_some_and(|r| r.from() <= index)
    }

    /// Number of indices in the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.ranges.iter().map(|r| r.count() as usize).sum()
    }

    /// Returns `true` if the set holds no indices.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The runs making up the set, in ascending order.
    #[must_use]
    #[inline]
    pub fn ranges(&self) -> &[NumericRange] {
        &self.ranges
    }

    /// Smallest range covering the whole set, or `None` if the set is empty.
    #[must_use]
    pub fn bounds(&self) -> Option<NumericRange> {
        let first = self.ranges.first()?;
        let last = self.ranges.last()?;
        Some(NumericRange::from_bounds(first.from(), last.end()))
    }

    /// Iterates every index in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ranges: self.ranges.iter(),
            current: 0..0,
        }
    }

    /// Collects every index into a vector, in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.count());
        out.extend(self.iter());
        out
    }

    /// The gaps between consecutive runs.
    ///
    /// Indices below the first run and above the last run are not reported.
    #[must_use]
    pub fn inverted_ranges(&self) -> Vec<NumericRange> {
        self.ranges
            .windows(2)
            .map(|pair| NumericRange::from_bounds(pair[0].end(), pair[1].from()))
            .collect()
    }

    /// Adds every index of `other` to `self`.
    pub fn union_with(&mut self, other: &Self) -> &mut Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            self.ranges.clone_from(&other.ranges);
            return self;
        }

        let mut merged: Vec<NumericRange> =
            Vec::with_capacity(self.ranges.len() + other.ranges.len());
        let mut a = self.ranges.iter().peekable();
        let mut b = other.ranges.iter().peekable();
        loop {
            let next = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => {
                    if x.from() <= y.from() {
                        a.next()
                    } else {
                        b.next()
                    }
                }
                (Some(_), None) => a.next(),
                (None, Some(_)) => b.next(),
                (None, None) => break,
            };
            let Some(&next) = next else { break };
            if let Some(last) = merged
                .last_mut()
                .filter(|last| last.intersects_or_coinciding(&next))
            {
                *last = last.union(&next);
            } else {
                merged.push(next);
            }
        }
        self.ranges = merged;
        self
    }

    /// Keeps only the indices that are also in `other`.
    pub fn intersect_with(&mut self, other: &Self) -> &mut Self {
        let mut kept = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (x, y) = (self.ranges[i], other.ranges[j]);
            if let Some(common) = x.intersection(&y) {
                kept.push(common);
            }
            if x.end() <= y.end() {
                i += 1;
            } else {
                j += 1;
            }
        }
        self.ranges = kept;
        self
    }

    /// Removes every index that is in `other`.
    pub fn difference_with(&mut self, other: &Self) -> &mut Self {
        for &range in &other.ranges {
            if self.is_empty() {
                break;
            }
            self.remove_range(range);
        }
        self
    }

    /// Returns `true` if the two sets share at least one index.
    #[must_use]
    pub fn has_intersection_with(&self, other: &Self) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (x, y) = (self.ranges[i], other.ranges[j]);
            if x.intersects(&y) {
                return true;
            }
            if x.end() <= y.end() {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }

    /// Removes every index.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

impl fmt::Debug for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ranges.iter()).finish()
    }
}

impl From<NumericRange> for IndexSet {
    fn from(range: NumericRange) -> Self {
        Self::from_range(range)
    }
}

/// # Panics
///
/// Panics on `u32::MAX`, like [`IndexSet::add`].
impl FromIterator<u32> for IndexSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// # Panics
///
/// Panics on `u32::MAX`, like [`IndexSet::add`].
impl Extend<u32> for IndexSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for index in iter {
            self.add(index);
        }
    }
}

impl FromIterator<NumericRange> for IndexSet {
    fn from_iter<I: IntoIterator<Item = NumericRange>>(iter: I) -> Self {
        let mut set = Self::new();
        for range in iter {
            set.add_range(range);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the indices of an [`IndexSet`], returned by [`IndexSet::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    ranges: core::slice::Iter<'a, NumericRange>,
    current: core::ops::Range<u32>,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(index) = self.current.next() {
                return Some(index);
            }
            self.current = self.ranges.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest: usize = self.ranges.clone().map(|r| r.count() as usize).sum();
        let len = rest + self.current.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn set(ranges: &[(u32, u32)]) -> IndexSet {
        ranges
            .iter()
            .map(|&(a, b)| NumericRange::from_interval(a, b))
            .collect()
    }

    #[test]
    fn adjacent_adds_merge_into_one_run() {
        let mut s = IndexSet::new();
        s.add(3);
        s.add(5);
        assert_eq!(s.ranges().len(), 2);
        s.add(4);
        assert_eq!(s.ranges(), &[NumericRange::from_interval(3, 5)]);
    }

    #[test]
    fn add_range_swallows_several_runs() {
        let mut s = set(&[(0, 1), (4, 5), (8, 9), (20, 21)]);
        s.add_range(NumericRange::from_interval(2, 10));
        assert_eq!(
            s.ranges(),
            &[
                NumericRange::from_interval(0, 10),
                NumericRange::from_interval(20, 21)
            ]
        );
    }

    #[test]
    fn remove_splits_a_run() {
        let mut s = set(&[(0, 9)]);
        s.remove_range(NumericRange::from_interval(3, 5));
        assert_eq!(s, set(&[(0, 2), (6, 9)]));
        assert_eq!(s.count(), 7);
    }

    #[test]
    fn remove_across_runs_keeps_outer_remnants() {
        let mut s = set(&[(0, 4), (10, 14), (20, 24)]);
        s.remove_range(NumericRange::from_interval(2, 21));
        assert_eq!(s, set(&[(0, 1), (22, 24)]));
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut s = set(&[(0, 4)]);
        s.remove(10);
        s.remove_range(NumericRange::new(5, 0));
        assert_eq!(s, set(&[(0, 4)]));
    }

    #[test]
    fn contains_checks_run_bounds() {
        let s = set(&[(2, 4), (8, 8)]);
        assert!(!s.contains(1));
        assert!(s.contains(2));
        assert!(s.contains(4));
        assert!(!s.contains(5));
        assert!(s.contains(8));
        assert!(!s.contains(9));
    }

    #[test]
    fn union_merges_interleaved_runs() {
        let mut a = set(&[(0, 2), (10, 12)]);
        let b = set(&[(3, 5), (11, 15), (30, 30)]);
        a.union_with(&b);
        assert_eq!(a, set(&[(0, 5), (10, 15), (30, 30)]));
    }

    #[test]
    fn intersect_with_empty_clears() {
        let mut a = set(&[(0, 10)]);
        a.intersect_with(&IndexSet::new());
        assert!(a.is_empty());
    }

    #[test]
    fn intersect_keeps_common_parts() {
        let mut a = set(&[(0, 10), (20, 30)]);
        let b = set(&[(5, 25)]);
        a.intersect_with(&b);
        assert_eq!(a, set(&[(5, 10), (20, 25)]));
    }

    #[test]
    fn difference_removes_other_runs() {
        let mut a = set(&[(0, 10)]);
        a.difference_with(&set(&[(2, 3), (7, 7)]));
        assert_eq!(a.to_vec(), vec![0, 1, 4, 5, 6, 8, 9, 10]);
    }

    #[test]
    fn has_intersection_ignores_touching_runs() {
        let a = set(&[(0, 4), (10, 14)]);
        assert!(!a.has_intersection_with(&set(&[(5, 9)])));
        assert!(a.has_intersection_with(&set(&[(5, 10)])));
    }

    #[test]
    fn inverted_ranges_are_the_gaps() {
        let s = set(&[(0, 1), (5, 6), (10, 10)]);
        assert_eq!(
            s.inverted_ranges(),
            vec![
                NumericRange::from_interval(2, 4),
                NumericRange::from_interval(7, 9)
            ]
        );
    }

    #[test]
    fn iter_is_exact_size() {
        let s = set(&[(0, 2), (5, 6)]);
        let it = s.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.collect::<Vec<_>>(), vec![0, 1, 2, 5, 6]);
    }

    #[test]
    fn equality_is_by_content() {
        let a: IndexSet = [5, 1, 2, 3, 4].into_iter().collect();
        let b = IndexSet::from_range(NumericRange::from_interval(1, 5));
        assert_eq!(a, b);
    }

    #[test]
    fn last_index_is_rejected_without_panicking() {
        let mut set = IndexSet::new();
        assert_eq!(set.try_add(u32::MAX - 1), Ok(()));
        assert_eq!(
            set.try_add(u32::MAX),
            Err(RangeError::Overflow {
                from: u32::MAX,
                count: 1
            })
        );
        assert_eq!(set.to_vec(), [u32::MAX - 1]);

        set.remove(u32::MAX);
        assert_eq!(set.count(), 1);
        set.remove(u32::MAX - 1);
        assert!(set.is_empty());
    }

    #[test]
    #[should_panic(expected = "overflows the index space")]
    fn collecting_last_index_panics() {
        let _set: IndexSet = [u32::MAX].into_iter().collect();
    }
}
