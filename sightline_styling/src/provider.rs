// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of styled node collections.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use sightline_index::IndexSet;

use crate::collection::same_collection;
use crate::{EventTrigger, ListenerId, NodeAppearance, NodeCollection, StylingError};

/// Notification emitted by a [`NodeAppearanceProvider`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AppearanceProviderEvent {
    /// The registry or the contents of a registered collection changed.
    Changed,
    /// The aggregate loading state flipped.
    LoadingStateChanged {
        /// The new value of [`NodeAppearanceProvider::is_loading`].
        is_loading: bool,
    },
}

#[derive(Debug)]
struct StyledNodeCollection {
    collection: Rc<dyn NodeCollection>,
    appearance: NodeAppearance,
    importance: i32,
    subscription: ListenerId,
}

/// Pairs node collections with appearances and replays them in a stable order.
///
/// Associations are replayed by [`apply_styles`](Self::apply_styles) in
/// ascending importance and, within one importance, in registration order.
/// A renderer typically lets later associations win where index sets overlap;
/// the provider itself never resolves overlaps.
///
/// ## Notifications
///
/// Registry mutations ([`assign_styled_node_collection`](Self::assign_styled_node_collection),
/// [`unassign_styled_node_collection`](Self::unassign_styled_node_collection),
/// [`clear`](Self::clear)) notify synchronously: the mutation is applied, then
/// [`AppearanceProviderEvent::Changed`] fires, then
/// [`AppearanceProviderEvent::LoadingStateChanged`] fires if the aggregate
/// loading flag flipped.
///
/// Changes reported by registered collections are coalesced instead. They only
/// mark the provider dirty; the next call to
/// [`flush_pending_changes`](Self::flush_pending_changes) emits a single
/// `Changed` (and a loading event if needed) for the whole batch. Renderers
/// call it once per frame before [`apply_styles`](Self::apply_styles).
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use sightline_index::IndexSet;
/// use sightline_styling::{
///     AppearanceProviderEvent, NodeAppearance, NodeAppearanceProvider, TreeIndexNodeCollection,
/// };
///
/// let mut provider = NodeAppearanceProvider::new();
/// let changes = Rc::new(Cell::new(0));
/// provider.on({
///     let changes = Rc::clone(&changes);
///     move |event| {
///         if *event == AppearanceProviderEvent::Changed {
///             changes.set(changes.get() + 1);
///         }
///     }
/// });
///
/// let valves = Rc::new(TreeIndexNodeCollection::new(IndexSet::from_iter([1, 2, 3])));
/// provider.assign_styled_node_collection(valves.clone(), NodeAppearance::HIGHLIGHTED);
/// assert_eq!(changes.get(), 1);
///
/// // A burst of updates settles into one notification.
/// valves.update_set(IndexSet::from_iter([4]));
/// valves.update_set(IndexSet::from_iter([5, 6]));
/// assert!(provider.flush_pending_changes());
/// assert_eq!(changes.get(), 2);
///
/// provider.apply_styles(|set, appearance| {
///     assert_eq!(set.to_vec(), [5, 6]);
///     assert_eq!(*appearance, NodeAppearance::HIGHLIGHTED);
/// });
/// ```
#[derive(Debug)]
pub struct NodeAppearanceProvider {
    styled: Vec<StyledNodeCollection>,
    pending: Rc<Cell<bool>>,
    last_loading: bool,
    events: EventTrigger<AppearanceProviderEvent>,
}

impl NodeAppearanceProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            styled: Vec::new(),
            pending: Rc::new(Cell::new(false)),
            last_loading: false,
            events: EventTrigger::new(),
        }
    }

    /// Subscribes to provider notifications.
    pub fn on(&self, listener: impl Fn(&AppearanceProviderEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    /// Removes a listener added with [`on`](Self::on).
    ///
    /// Returns `false` if it was not attached.
    pub fn off(&self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Styles `collection` with `appearance` at the default importance (0).
    ///
    /// If `collection` is already assigned, its appearance is replaced in place
    /// and no second subscription is made.
    pub fn assign_styled_node_collection(
        &mut self,
        collection: Rc<dyn NodeCollection>,
        appearance: NodeAppearance,
    ) {
        self.assign_styled_node_collection_with_importance(collection, appearance, 0);
    }

    /// Styles `collection` with `appearance`, replayed after every association
    /// of lower importance.
    ///
    /// Re-assigning with the same importance keeps the association's slot.
    /// Changing the importance moves it behind the associations that already
    /// have the new importance.
    pub fn assign_styled_node_collection_with_importance(
        &mut self,
        collection: Rc<dyn NodeCollection>,
        appearance: NodeAppearance,
        importance: i32,
    ) {
        match self.position_of(&collection) {
            Some(idx) if self.styled[idx].importance == importance => {
                self.styled[idx].appearance = appearance;
                log::debug!("updated appearance of styled collection #{idx}");
            }
            Some(idx) => {
                let mut entry = self.styled.remove(idx);
                entry.appearance = appearance;
                entry.importance = importance;
                self.insert_sorted(entry);
                log::debug!("moved styled collection to importance {importance}");
            }
            None => {
                let pending = Rc::clone(&self.pending);
                let subscription = collection
                    .changed()
                    .subscribe(move |()| pending.set(true));
                log::debug!(
                    "assigned `{}` collection at importance {importance}",
                    collection.class_token()
                );
                self.insert_sorted(StyledNodeCollection {
                    collection,
                    appearance,
                    importance,
                    subscription,
                });
            }
        }
        self.notify_changed();
    }

    /// Removes the association for `collection` and detaches from it.
    ///
    /// # Errors
    ///
    /// Returns [`StylingError::NotAssigned`] if `collection` is not assigned;
    /// the registry is left untouched.
    pub fn unassign_styled_node_collection<C>(
        &mut self,
        collection: &Rc<C>,
    ) -> Result<(), StylingError>
    where
        C: NodeCollection + ?Sized,
    {
        let idx = self
            .position_of(collection)
            .ok_or(StylingError::NotAssigned)?;
        let entry = self.styled.remove(idx);
        entry.collection.changed().unsubscribe(entry.subscription);
        log::debug!("unassigned `{}` collection", entry.collection.class_token());
        self.notify_changed();
        Ok(())
    }

    /// Calls `callback` with the current index set and appearance of every
    /// association, in replay order.
    pub fn apply_styles(&self, mut callback: impl FnMut(&IndexSet, &NodeAppearance)) {
        for entry in &self.styled {
            let set = entry.collection.index_set();
            callback(&set, &entry.appearance);
        }
    }

    /// Removes every association and notifies once.
    pub fn clear(&mut self) {
        self.detach_all();
        log::debug!("cleared styled collections");
        self.notify_changed();
    }

    /// `true` if any assigned collection is loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.styled
            .iter()
            .any(|entry| entry.collection.is_loading())
    }

    /// Emits one `Changed` if any assigned collection changed since the last
    /// notification.
    ///
    /// Returns whether anything was emitted.
    pub fn flush_pending_changes(&mut self) -> bool {
        if !self.pending.get() {
            return false;
        }
        self.notify_changed();
        true
    }

    /// `true` if an assigned collection changed and the change has not been
    /// flushed yet.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.pending.get()
    }

    /// `true` if `collection` is assigned.
    #[must_use]
    pub fn is_assigned<C>(&self, collection: &Rc<C>) -> bool
    where
        C: NodeCollection + ?Sized,
    {
        self.position_of(collection).is_some()
    }

    /// Assigned collections and their appearances, in replay order.
    pub fn styled_node_collections(
        &self,
    ) -> impl Iterator<Item = (&Rc<dyn NodeCollection>, &NodeAppearance)> + '_ {
        self.styled
            .iter()
            .map(|entry| (&entry.collection, &entry.appearance))
    }

    /// Number of associations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styled.len()
    }

    /// `true` if nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styled.is_empty()
    }

    fn position_of<C>(&self, collection: &Rc<C>) -> Option<usize>
    where
        C: NodeCollection + ?Sized,
    {
        self.styled
            .iter()
            .position(|entry| same_collection(&entry.collection, collection))
    }

    fn insert_sorted(&mut self, entry: StyledNodeCollection) {
        let at = self
            .styled
            .partition_point(|other| other.importance <= entry.importance);
        self.styled.insert(at, entry);
    }

    fn notify_changed(&mut self) {
        // This notification covers anything collections reported so far.
        self.pending.set(false);
        self.events.fire(&AppearanceProviderEvent::Changed);

        let is_loading = self.is_loading();
        if is_loading != self.last_loading {
            self.last_loading = is_loading;
            log::trace!("aggregate loading state is now {is_loading}");
            self.events
                .fire(&AppearanceProviderEvent::LoadingStateChanged { is_loading });
        }
    }

    fn detach_all(&mut self) {
        for entry in self.styled.drain(..) {
            entry.collection.changed().unsubscribe(entry.subscription);
        }
    }
}

impl Default for NodeAppearanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NodeAppearanceProvider {
    fn drop(&mut self) {
        self.detach_all();
    }
}
