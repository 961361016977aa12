// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use sightline_index::IndexSet;

use crate::collection::ranges_to_state;
use crate::{EventTrigger, NodeCollection, SerializedNodeCollection};

/// A collection filled incrementally by an external, asynchronous source.
///
/// The source drives the collection through its lifecycle:
///
/// 1. [`begin_loading`](Self::begin_loading) empties it and marks it loading.
/// 2. [`append`](Self::append) adds a batch of results; the partial set is
///    visible immediately.
/// 3. [`finish`](Self::finish) marks it stable, or [`fail`](Self::fail)
///    discards the partial results and marks it stable and empty.
///
/// Each step fires `changed` once.
///
/// ```rust
/// use sightline_index::IndexSet;
/// use sightline_styling::{NodeCollection, PopulatedNodeCollection};
///
/// let query = PopulatedNodeCollection::new();
/// query.begin_loading();
/// query.append(&IndexSet::from_iter([10, 11]));
/// assert!(query.is_loading());
/// query.finish();
/// assert!(!query.is_loading());
/// assert_eq!(query.index_set().count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct PopulatedNodeCollection {
    set: RefCell<Rc<IndexSet>>,
    loading: Cell<bool>,
    changed: EventTrigger<()>,
}

impl PopulatedNodeCollection {
    /// Token written into serialized descriptors.
    pub const CLASS_TOKEN: &'static str = "PopulatedNodeCollection";

    /// Creates an empty collection that is not loading.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops current contents and starts a new population run.
    pub fn begin_loading(&self) {
        *self.set.borrow_mut() = Rc::new(IndexSet::new());
        self.loading.set(true);
        self.changed.fire(&());
    }

    /// Adds one batch of results.
    pub fn append(&self, batch: &IndexSet) {
        if !self.loading.get() {
            log::warn!("appending {} indices to a collection that is not loading", batch.count());
        }
        {
            let mut set = self.set.borrow_mut();
            let mut next = IndexSet::clone(&set);
            next.union_with(batch);
            *set = Rc::new(next);
        }
        self.changed.fire(&());
    }

    /// Marks the population run as complete.
    pub fn finish(&self) {
        self.loading.set(false);
        self.changed.fire(&());
    }

    /// Aborts the population run, leaving the collection empty and stable.
    pub fn fail(&self) {
        log::warn!("node collection population failed; discarding partial results");
        *self.set.borrow_mut() = Rc::new(IndexSet::new());
        self.loading.set(false);
        self.changed.fire(&());
    }
}

impl NodeCollection for PopulatedNodeCollection {
    fn class_token(&self) -> &'static str {
        Self::CLASS_TOKEN
    }

    fn index_set(&self) -> Rc<IndexSet> {
        Rc::clone(&self.set.borrow())
    }

    fn is_loading(&self) -> bool {
        self.loading.get()
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

    #[test]
    fn failure_clears_partial_results() {
        let collection = PopulatedNodeCollection::new();
        collection.begin_loading();
        collection.append(&IndexSet::from_iter(0..50));
        assert_eq!(collection.index_set().count(), 50);

        collection.fail();
        assert!(!collection.is_loading());
        assert!(collection.index_set().is_empty());
    }

    #[test]
    fn begin_loading_discards_previous_run() {
        let collection = PopulatedNodeCollection::new();
        collection.begin_loading();
        collection.append(&IndexSet::from_iter([1, 2]));
        collection.finish();

        collection.begin_loading();
        assert!(collection.is_loading());
        assert!(collection.index_set().is_empty());
    }
}
