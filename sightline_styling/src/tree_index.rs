// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::RefCell;

use sightline_index::{IndexSet, NumericRange};

use crate::collection::ranges_to_state;
use crate::{EventTrigger, NodeCollection, SerializedNodeCollection};

/// A collection holding an explicit, caller-managed set of tree indices.
///
/// It is never loading. Every call to [`update_set`](Self::update_set) or
/// [`clear`](Self::clear) fires `changed` once, even if the contents are equal
/// to what was there before.
///
/// ```rust
/// use sightline_index::IndexSet;
/// use sightline_styling::{NodeCollection, TreeIndexNodeCollection};
///
/// let pumps = TreeIndexNodeCollection::new([4, 5, 6].into_iter().collect());
/// pumps.update_set(IndexSet::from_iter([7, 8]));
/// assert_eq!(pumps.index_set().to_vec(), [7, 8]);
/// ```
#[derive(Debug, Default)]
pub struct TreeIndexNodeCollection {
    set: RefCell<Rc<IndexSet>>,
    changed: EventTrigger<()>,
}

impl TreeIndexNodeCollection {
    /// Token written into serialized descriptors.
    pub const CLASS_TOKEN: &'static str = "TreeIndexNodeCollection";

    /// Creates a collection holding `set`.
    #[must_use]
    pub fn new(set: IndexSet) -> Self {
        Self {
            set: RefCell::new(Rc::new(set)),
            changed: EventTrigger::new(),
        }
    }

    /// Creates a collection holding the indices of `range`.
    #[must_use]
    pub fn from_range(range: NumericRange) -> Self {
        Self::new(IndexSet::from_range(range))
    }

    /// Replaces the contents and fires `changed`.
    pub fn update_set(&self, set: IndexSet) {
        *self.set.borrow_mut() = Rc::new(set);
        self.changed.fire(&());
    }

    /// Empties the collection and fires `changed`.
    pub fn clear(&self) {
        self.update_set(IndexSet::new());
    }
}

impl NodeCollection for TreeIndexNodeCollection {
    fn class_token(&self) -> &'static str {
        Self::CLASS_TOKEN
    }

    fn index_set(&self) -> Rc<IndexSet> {
        Rc::clone(&self.set.borrow())
    }

    fn is_loading(&self) -> bool {
        false
    }

    fn changed(&self) -> &EventTrigger<()> {
        &self.changed
    }

    fn serialize(&self) -> SerializedNodeCollection {
        SerializedNodeCollection::new(Self::CLASS_TOKEN, ranges_to_state(&self.set.borrow()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn update_fires_once_and_replaces_snapshot() {
        let collection = TreeIndexNodeCollection::new([1, 2, 3].into_iter().collect());
        let before = collection.index_set();
        let fired = Rc::new(Cell::new(0));
        collection.changed().subscribe({
            let fired = Rc::clone(&fired);
            move |()| fired.set(fired.get() + 1)
        });

        collection.update_set([3, 4, 5, 6].into_iter().collect());

        assert_eq!(fired.get(), 1);
        assert_eq!(before.to_vec(), [1, 2, 3], "old snapshots are immutable");
        assert_eq!(collection.index_set().to_vec(), [3, 4, 5, 6]);
    }

    #[test]
    fn clear_leaves_empty_set() {
        let collection = TreeIndexNodeCollection::from_range(NumericRange::new(0, 10));
        collection.clear();
        assert!(collection.index_set().is_empty());
        assert!(!collection.is_loading());
    }
}
