// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use sightline_index::{IndexSet, NumericRange};

use crate::{EventTrigger, ListenerId, NodeCollection, SerializedNodeCollection};

#[derive(Debug, Default)]
struct Shared {
    cache: RefCell<Option<Rc<IndexSet>>>,
    changed: EventTrigger<()>,
}

/// Every tree index of a model that is _not_ in an inner collection.
///
/// The model's index space is `[0, tree_index_count)`. Useful for styles such
/// as "ghost everything except the selection".
///
/// ```rust
/// use std::rc::Rc;
/// use sightline_index::IndexSet;
/// use sightline_styling::{InvertedNodeCollection, NodeCollection, TreeIndexNodeCollection};
///
/// let selected = Rc::new(TreeIndexNodeCollection::new(IndexSet::from_iter([1, 2])));
/// let rest = InvertedNodeCollection::new(selected, 5);
/// assert_eq!(rest.index_set().to_vec(), [0, 3, 4]);
/// ```
#[derive(Debug)]
pub struct InvertedNodeCollection {
    inner: Rc<dyn NodeCollection>,
    tree_index_count: u32,
    subscription: ListenerId,
    shared: Rc<Shared>,
}

impl InvertedNodeCollection {
    /// Token written into serialized descriptors.
    pub const CLASS_TOKEN: &'static str = "InvertedNodeCollection";

    /// Creates the complement of `inner` within `[0, tree_index_count)`.
    ///
    /// Counts past the index space are clamped to it.
    #[must_use]
    pub fn new(inner: Rc<dyn NodeCollection>, tree_index_count: u32) -> Self {
        let shared = Rc::new(Shared::default());
        let weak: Weak<Shared> = Rc::downgrade(&shared);
        let subscription = inner.changed().subscribe(move |()| {
            if let Some(shared) = weak.upgrade() {
                shared.cache.borrow_mut().take();
                shared.changed.fire(&());
            }
        });
        Self {
            inner,
            tree_index_count: tree_index_count.min(sightline_index::MAX_END),
            subscription,
            shared,
        }
    }

    /// The collection being inverted.
    #[must_use]
    pub fn inner(&self) -> &Rc<dyn NodeCollection> {
        &self.inner
    }

    /// Size of the model's index space.
    #[must_use]
    pub fn tree_index_count(&self) -> u32 {
        self.tree_index_count
    }
}

impl NodeCollection for InvertedNodeCollection {
    fn class_token(&self) -> &'static str {
        Self::CLASS_TOKEN
    }

    fn index_set(&self) -> Rc<IndexSet> {
        if let Some(cached) = self.shared.cache.borrow().as_ref() {
            return Rc::clone(cached);
        }
        let mut complement = IndexSet::from_range(NumericRange::new(0, self.tree_index_count));
        complement.difference_with(&self.inner.index_set());
        let complement = Rc::new(complement);
        *self.shared.cache.borrow_mut() = Some(Rc::clone(&complement));
        complement
    }

    fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    fn changed(&self) -> &EventTrigger<()> {
        &self.shared.changed
    }

    fn serialize(&self) -> SerializedNodeCollection {
        let inner = self.inner.serialize();
        SerializedNodeCollection {
            token: Self::CLASS_TOKEN.into(),
            state: serde_json::json!({
                "token": inner.token,
                "state": inner.state,
                "options": inner.options,
            }),
            options: serde_json::json!({ "treeIndexCount": self.tree_index_count }),
        }
    }
}

impl Drop for InvertedNodeCollection {
    fn drop(&mut self) {
        self.inner.changed().unsubscribe(self.subscription);
    }
}
