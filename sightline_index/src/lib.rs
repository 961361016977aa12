// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sightline Index: range-compressed sets of tree indices.
//!
//! A CAD model's scene graph assigns every node a dense integer _tree index_.
//! Styling, filtering and visibility all operate on sets of those indices, and
//! the sets are typically made of a few long contiguous runs (a node and its
//! whole subtree occupy consecutive indices). This crate provides:
//!
//! - [`NumericRange`]: a half-open run `[from, from + count)` of indices.
//! - [`IndexSet`]: a set stored as sorted, disjoint, non-adjacent runs, with
//!   membership, union, intersection, difference and gap queries.
//!
//! Equality on [`IndexSet`] is by content: runs are merged eagerly, so two sets
//! holding the same indices always compare equal regardless of how they were
//! built.
//!
//! ```rust
//! use sightline_index::{IndexSet, NumericRange};
//!
//! let pipes = IndexSet::from_range(NumericRange::from_interval(100, 199));
//! let mut selected: IndexSet = [150, 151, 152, 300].into_iter().collect();
//!
//! assert!(selected.has_intersection_with(&pipes));
//! selected.intersect_with(&pipes);
//! assert_eq!(selected.to_vec(), [150, 151, 152]);
//! ```
//!
//! `u32::MAX` is reserved as the exclusive end of the index space, so the
//! largest storable index is `u32::MAX - 1`.
//!
//! ## Features
//!
//! - `std` (default): implements `std::error::Error` via `thiserror`'s `std` support.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod range;
mod set;

pub use range::{MAX_END, NumericRange, RangeError};
pub use set::{IndexSet, Iter};
