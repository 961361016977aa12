// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node collection abstraction shared by every collection variant.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::ptr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sightline_index::{IndexSet, NumericRange};

use crate::{EventTrigger, StylingError};

/// A source of tree indices with a loading state and change notification.
///
/// Implementors own their current [`IndexSet`] and hand out immutable
/// snapshots of it; a mutation swaps in a new snapshot and then fires
/// [`changed`](Self::changed) exactly once.
///
/// Collections are shared as `Rc<dyn NodeCollection>` and compared by
/// identity, never by content: two collections holding the same indices are
/// still distinct registrations in a
/// [`NodeAppearanceProvider`](crate::NodeAppearanceProvider).
pub trait NodeCollection: fmt::Debug {
    /// Identifies the concrete collection type in serialized descriptors.
    fn class_token(&self) -> &'static str;

    /// The latest known indices.
    ///
    /// While [`is_loading`](Self::is_loading) is `true` this may be partial.
    fn index_set(&self) -> Rc<IndexSet>;

    /// `true` while outstanding population may still change the set.
    fn is_loading(&self) -> bool;

    /// Fired once per mutation of the set or of the loading state.
    fn changed(&self) -> &EventTrigger<()>;

    /// Describes the collection so that it can be rebuilt later.
    fn serialize(&self) -> SerializedNodeCollection;
}

/// Self-describing, JSON-safe description of a [`NodeCollection`].
///
/// `state` and `options` are specific to the collection type named by
/// `token`. The format is a persistence and debugging aid, not a stable wire
/// format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedNodeCollection {
    /// The producing collection's [`class_token`](NodeCollection::class_token).
    pub token: String,
    /// Type-specific contents.
    pub state: Value,
    /// Type-specific construction options.
    pub options: Value,
}

impl SerializedNodeCollection {
    /// Creates a descriptor with empty options.
    #[must_use]
    pub fn new(token: &str, state: Value) -> Self {
        Self {
            token: token.into(),
            state,
            options: Value::Object(serde_json::Map::new()),
        }
    }

    pub(crate) fn malformed(&self, reason: impl ToString) -> StylingError {
        StylingError::MalformedState {
            token: self.token.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Returns `true` if `a` and `b` point at the same collection.
///
/// Only the data address is compared, so an `Rc<T>` and the
/// `Rc<dyn NodeCollection>` it was coerced into are recognized as the same.
#[must_use]
pub fn same_collection<A, B>(a: &Rc<A>, b: &Rc<B>) -> bool
where
    A: NodeCollection + ?Sized,
    B: NodeCollection + ?Sized,
{
    ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

#[derive(Serialize, Deserialize)]
struct RangeState {
    from: u32,
    count: u32,
}

/// Encodes the runs of `set` as `[{ "from": .., "count": .. }, ..]`.
pub(crate) fn ranges_to_state(set: &IndexSet) -> Value {
    Value::Array(
        set.ranges()
            .iter()
            .map(|r| serde_json::json!({ "from": r.from(), "count": r.count() }))
            .collect(),
    )
}

/// Decodes the output of [`ranges_to_state`].
pub(crate) fn ranges_from_state(
    descriptor: &SerializedNodeCollection,
) -> Result<IndexSet, StylingError> {
    let ranges: Vec<RangeState> = serde_json::from_value(descriptor.state.clone())
        .map_err(|err| descriptor.malformed(err))?;
    let mut set = IndexSet::new();
    for RangeState { from, count } in ranges {
        let range = NumericRange::try_new(from, count).map_err(|err| descriptor.malformed(err))?;
        set.add_range(range);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeIndexNodeCollection;

    #[test]
    fn same_collection_sees_through_unsizing() {
        let concrete = Rc::new(TreeIndexNodeCollection::new(IndexSet::new()));
        let erased: Rc<dyn NodeCollection> = concrete.clone();
        let other = Rc::new(TreeIndexNodeCollection::new(IndexSet::new()));
        assert!(same_collection(&concrete, &erased));
        assert!(!same_collection(&other, &erased));
    }

    #[test]
    fn range_state_rejects_overflow() {
        let descriptor = SerializedNodeCollection::new(
            "TreeIndexNodeCollection",
            serde_json::json!([{ "from": u32::MAX - 1, "count": 5 }]),
        );
        assert!(matches!(
            ranges_from_state(&descriptor),
            Err(StylingError::MalformedState { .. })
        ));
    }

    #[test]
    fn range_state_roundtrips_runs() {
        let set: IndexSet = [1, 2, 3, 10, 11].into_iter().collect();
        let descriptor =
            SerializedNodeCollection::new("TreeIndexNodeCollection", ranges_to_state(&set));
        assert_eq!(ranges_from_state(&descriptor).unwrap(), set);
    }
}
