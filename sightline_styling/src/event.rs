// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed publish/subscribe channel.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

/// Handle returned by [`EventTrigger::subscribe`], used to unsubscribe later.
///
/// Ids are unique per trigger and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<E> = Rc<dyn Fn(&E)>;

/// An observer list for one event type.
///
/// Listeners are called in subscription order. [`fire`](Self::fire) snapshots
/// the list before calling out, so a listener may subscribe or unsubscribe
/// (itself or others) while being notified; such changes take effect from the
/// next `fire`.
///
/// All methods take `&self` so a trigger can live inside a shared
/// [`NodeCollection`](crate::NodeCollection).
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use sightline_styling::EventTrigger;
///
/// let trigger = EventTrigger::<u32>::new();
/// let sum = Rc::new(Cell::new(0));
/// let id = trigger.subscribe({
///     let sum = Rc::clone(&sum);
///     move |v| sum.set(sum.get() + v)
/// });
///
/// trigger.fire(&2);
/// trigger.fire(&3);
/// assert!(trigger.unsubscribe(id));
/// trigger.fire(&100);
/// assert_eq!(sum.get(), 5);
/// ```
pub struct EventTrigger<E> {
    listeners: RefCell<SmallVec<[(ListenerId, Listener<E>); 2]>>,
    next_id: Cell<u64>,
}

impl<E> EventTrigger<E> {
    /// Creates a trigger with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(SmallVec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Adds `listener` and returns its id.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Removes the listener with `id`.
    ///
    /// Returns `false` if no such listener is attached.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|(other, _)| *other == id) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes every listener.
    pub fn unsubscribe_all(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Calls every listener with `event`.
    pub fn fire(&self, event: &E) {
        let snapshot: SmallVec<[Listener<E>; 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if !snapshot.is_empty() {
            log::trace!("notifying {} listener(s)", snapshot.len());
        }
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<E> Default for EventTrigger<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventTrigger<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTrigger")
            .field("listeners", &self.listener_count())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn listeners_run_in_subscription_order() {
        let trigger = EventTrigger::<()>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let log = Rc::clone(&log);
            trigger.subscribe(move |()| log.borrow_mut().push(tag));
        }
        trigger.fire(&());
        assert_eq!(*log.borrow(), [0, 1, 2]);
    }

    #[test]
    fn unsubscribe_unknown_id_is_false() {
        let trigger = EventTrigger::<()>::new();
        let id = trigger.subscribe(|()| {});
        assert!(trigger.unsubscribe(id));
        assert!(!trigger.unsubscribe(id));
        assert_eq!(trigger.listener_count(), 0);
    }

    #[test]
    fn listener_may_subscribe_during_fire() {
        let trigger = Rc::new(EventTrigger::<()>::new());
        let calls = Rc::new(Cell::new(0));
        {
            let weak = Rc::downgrade(&trigger);
            let calls = Rc::clone(&calls);
            trigger.subscribe(move |()| {
                calls.set(calls.get() + 1);
                if let Some(trigger) = weak.upgrade() {
                    trigger.subscribe(|()| {});
                }
            });
        }
        trigger.fire(&());
        assert_eq!(calls.get(), 1, "new listener must not run in the same fire");
        assert_eq!(trigger.listener_count(), 2);
    }
}
