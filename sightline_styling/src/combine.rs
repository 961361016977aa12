// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collections derived from other collections by set algebra.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use serde_json::Value;
use sightline_index::IndexSet;

use crate::collection::same_collection;
use crate::{EventTrigger, ListenerId, NodeCollection, SerializedNodeCollection};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Union,
    Intersection,
}

/// State reachable from child listeners.
#[derive(Debug, Default)]
struct Shared {
    cache: RefCell<Option<Rc<IndexSet>>>,
    changed: EventTrigger<()>,
}

impl Shared {
    fn invalidate_and_notify(&self) {
        self.cache.borrow_mut().take();
        self.changed.fire(&());
    }
}

#[derive(Debug)]
struct Child {
    collection: Rc<dyn NodeCollection>,
    subscription: ListenerId,
}

/// Child bookkeeping shared by union and intersection.
///
/// Child listeners hold a weak reference to [`Shared`], so a child outliving
/// the combination keeps nothing alive; `Drop` detaches the listeners anyway.
#[derive(Debug)]
struct Combination {
    combinator: Combinator,
    children: RefCell<Vec<Child>>,
    shared: Rc<Shared>,
}

impl Combination {
    fn new(
        combinator: Combinator,
        children: impl IntoIterator<Item = Rc<dyn NodeCollection>>,
    ) -> Self {
        let combination = Self {
            combinator,
            children: RefCell::new(Vec::new()),
            shared: Rc::new(Shared::default()),
        };
        for child in children {
            combination.attach(child);
        }
        combination
    }

    fn attach(&self, collection: Rc<dyn NodeCollection>) {
        let shared: Weak<Shared> = Rc::downgrade(&self.shared);
        let subscription = collection.changed().subscribe(move |()| {
            if let Some(shared) = shared.upgrade() {
                shared.invalidate_and_notify();
            }
        });
        self.children.borrow_mut().push(Child {
            collection,
            subscription,
        });
    }

    fn add(&self, collection: Rc<dyn NodeCollection>) {
        self.attach(collection);
        self.shared.invalidate_and_notify();
    }

    fn remove<C: NodeCollection + ?Sized>(&self, collection: &Rc<C>) -> bool {
        let removed = {
            let mut children = self.children.borrow_mut();
            children
                .iter()
                .position(|child| same_collection(&child.collection, collection))
                .map(|pos| children.remove(pos))
        };
        match removed {
            Some(child) => {
                child.collection.changed().unsubscribe(child.subscription);
                self.shared.invalidate_and_notify();
                true
            }
            None => false,
        }
    }

    fn clear(&self) {
        self.detach_all();
        self.shared.invalidate_and_notify();
    }

    fn detach_all(&self) {
        for child in self.children.borrow_mut().drain(..) {
            child.collection.changed().unsubscribe(child.subscription);
        }
    }

    fn len(&self) -> usize {
        self.children.borrow().len()
    }

    fn index_set(&self) -> Rc<IndexSet> {
        if let Some(cached) = self.shared.cache.borrow().as_ref() {
            return Rc::clone(cached);
        }
        let combined = Rc::new(self.compute());
        *self.shared.cache.borrow_mut() = Some(Rc::clone(&combined));
        combined
    }

    fn compute(&self) -> IndexSet {
        let children = self.children.borrow();
        let mut sets = children.iter().map(|child| child.collection.index_set());
        match self.combinator {
            Combinator::Union => {
                let mut union = IndexSet::new();
                for set in sets {
                    union.union_with(&set);
                }
                union
            }
            Combinator::Intersection => {
                // No children means no indices, not every index.
                let Some(first) = sets.next() else {
                    return IndexSet::new();
                };
                let mut intersection = IndexSet::clone(&first);
                for set in sets {
                    if intersection.is_empty() {
                        break;
                    }
                    intersection.intersect_with(&set);
                }
                intersection
            }
        }
    }

    fn is_loading(&self) -> bool {
        self.children
            .borrow()
            .iter()
            .any(|child| child.collection.is_loading())
    }

    fn serialize(&self, token: &str) -> SerializedNodeCollection {
        let state = self
            .children
            .borrow()
            .iter()
            .map(|child| {
                let descriptor = child.collection.serialize();
                serde_json::json!({
                    "token": descriptor.token,
                    "state": descriptor.state,
                    "options": descriptor.options,
                })
            })
            .collect();
        SerializedNodeCollection::new(token, Value::Array(state))
    }
}

impl Drop for Combination {
    fn drop(&mut self) {
        self.detach_all();
    }
}

macro_rules! combined_collection {
    ($(#[$meta:meta])* $name:ident, $combinator:expr, $token:literal) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            inner: Combination,
        }

        impl $name {
            /// Token written into serialized descriptors.
            pub const CLASS_TOKEN: &'static str = $token;

            /// Creates a combination of `children`.
            #[must_use]
            pub fn new(children: impl IntoIterator<Item = Rc<dyn NodeCollection>>) -> Self {
                Self {
                    inner: Combination::new($combinator, children),
                }
            }

            /// Adds a child and fires `changed`.
            pub fn add(&self, collection: Rc<dyn NodeCollection>) {
                self.inner.add(collection);
            }

            /// Removes a child, firing `changed` if it was present.
            ///
            /// Returns `false` if `collection` is not a child.
            pub fn remove<C: NodeCollection + ?Sized>(&self, collection: &Rc<C>) -> bool {
                self.inner.remove(collection)
            }

            /// Removes every child and fires `changed`.
            pub fn clear(&self) {
                self.inner.clear();
            }

            /// Number of children.
            #[must_use]
            pub fn len(&self) -> usize {
                self.inner.len()
            }

            /// Returns `true` if there are no children.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.inner.len() == 0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new(core::iter::empty())
            }
        }

        impl NodeCollection for $name {
            fn class_token(&self) -> &'static str {
                Self::CLASS_TOKEN
            }

            fn index_set(&self) -> Rc<IndexSet> {
                self.inner.index_set()
            }

            fn is_loading(&self) -> bool {
                self.inner.is_loading()
            }

            fn changed(&self) -> &EventTrigger<()> {
                &self.inner.shared.changed
            }

            fn serialize(&self) -> SerializedNodeCollection {
                self.inner.serialize(Self::CLASS_TOKEN)
            }
        }
    };
}

combined_collection!(
    /// Every index present in at least one child.
    ///
    /// The combined set is computed on first read after a child changes and
    /// cached until the next change. A child's `changed` is re-fired as this
    /// collection's `changed`, so a provider sees the union as a single
    /// collection. With no children the set is empty.
    ///
    /// ```rust
    /// use std::rc::Rc;
    /// use sightline_index::IndexSet;
    /// use sightline_styling::{NodeCollection, TreeIndexNodeCollection, UnionNodeCollection};
    ///
    /// let pipes = Rc::new(TreeIndexNodeCollection::new(IndexSet::from_iter([1, 2])));
    /// let valves = Rc::new(TreeIndexNodeCollection::new(IndexSet::from_iter([7])));
    /// let both = UnionNodeCollection::new([pipes.clone() as Rc<dyn NodeCollection>, valves]);
    /// assert_eq!(both.index_set().to_vec(), [1, 2, 7]);
    ///
    /// pipes.update_set(IndexSet::from_iter([3]));
    /// assert_eq!(both.index_set().to_vec(), [3, 7]);
    /// ```
    UnionNodeCollection,
    Combinator::Union,
    "UnionNodeCollection"
);

combined_collection!(
    /// Indices present in every child.
    ///
    /// Behaves like [`UnionNodeCollection`] with respect to caching and change
    /// propagation. With no children the set is empty rather than universal.
    IntersectionNodeCollection,
    Combinator::Intersection,
    "IntersectionNodeCollection"
);
