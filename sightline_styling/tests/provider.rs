// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `NodeAppearanceProvider` driven through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use sightline_index::IndexSet;
use sightline_styling::{
    AppearanceProviderEvent, IntersectionNodeCollection, NodeAppearance, NodeAppearanceProvider,
    NodeCollection, PopulatedNodeCollection, StylingError, TreeIndexNodeCollection,
    UnionNodeCollection,
};

fn leaf(indices: impl IntoIterator<Item = u32>) -> Rc<TreeIndexNodeCollection> {
    Rc::new(TreeIndexNodeCollection::new(indices.into_iter().collect()))
}

/// Records every event the provider emits.
fn record(provider: &NodeAppearanceProvider) -> Rc<RefCell<Vec<AppearanceProviderEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    provider.on({
        let events = Rc::clone(&events);
        move |event| events.borrow_mut().push(*event)
    });
    events
}

fn count_changed(events: &RefCell<Vec<AppearanceProviderEvent>>) -> usize {
    events
        .borrow()
        .iter()
        .filter(|e| **e == AppearanceProviderEvent::Changed)
        .count()
}

fn replay(provider: &NodeAppearanceProvider) -> Vec<(Vec<u32>, NodeAppearance)> {
    let mut out = Vec::new();
    provider.apply_styles(|set, appearance| out.push((set.to_vec(), *appearance)));
    out
}

#[test]
fn replay_follows_registration_order() {
    let mut provider = NodeAppearanceProvider::new();
    let collections: Vec<_> = (0..5).map(|i| leaf([i * 10])).collect();
    for c in &collections {
        provider.assign_styled_node_collection(c.clone(), NodeAppearance::DEFAULT);
    }

    // Child changes in between must not reorder anything.
    collections[3].update_set(IndexSet::from_iter([31]));
    collections[0].update_set(IndexSet::from_iter([1]));
    provider.flush_pending_changes();

    let sets: Vec<Vec<u32>> = replay(&provider).into_iter().map(|(s, _)| s).collect();
    assert_eq!(sets, [vec![1], vec![10], vec![20], vec![31], vec![40]]);
}

#[test]
fn reassignment_updates_in_place_without_second_subscription() {
    let mut provider = NodeAppearanceProvider::new();
    let a = leaf([1]);
    let b = leaf([2]);
    provider.assign_styled_node_collection(a.clone(), NodeAppearance::GHOSTED);
    provider.assign_styled_node_collection(b.clone(), NodeAppearance::DEFAULT);
    provider.assign_styled_node_collection(a.clone(), NodeAppearance::HIDDEN);

    assert_eq!(provider.len(), 2);
    assert_eq!(
        replay(&provider),
        [
            (vec![1], NodeAppearance::HIDDEN),
            (vec![2], NodeAppearance::DEFAULT)
        ]
    );
    assert_eq!(a.changed().listener_count(), 1);

    provider.unassign_styled_node_collection(&a).unwrap();
    assert_eq!(a.changed().listener_count(), 0);
}

#[test]
fn unassigning_unknown_collection_fails_and_keeps_registry() {
    let mut provider = NodeAppearanceProvider::new();
    provider.assign_styled_node_collection(leaf([7]), NodeAppearance::OUTLINED);
    let before = replay(&provider);
    let events = record(&provider);

    let stranger = leaf([7]);
    assert_eq!(
        provider.unassign_styled_node_collection(&stranger),
        Err(StylingError::NotAssigned)
    );
    assert_eq!(replay(&provider), before);
    assert!(events.borrow().is_empty());
}

#[test]
fn burst_of_updates_settles_into_one_change() {
    let mut provider = NodeAppearanceProvider::new();
    let collection = leaf([1, 2, 3]);
    provider.assign_styled_node_collection(collection.clone(), NodeAppearance::HIGHLIGHTED);
    let events = record(&provider);

    collection.update_set(IndexSet::from_iter([3, 4, 5, 6]));
    assert_eq!(count_changed(&events), 0, "child changes are deferred");
    assert!(provider.flush_pending_changes());
    assert_eq!(count_changed(&events), 1);

    for i in 0..10 {
        collection.update_set(IndexSet::from_iter([i]));
    }
    assert!(provider.flush_pending_changes());
    assert!(!provider.flush_pending_changes());
    assert_eq!(count_changed(&events), 2);
}

#[test]
fn unassigned_collection_no_longer_notifies() {
    let mut provider = NodeAppearanceProvider::new();
    let collection = leaf([1]);
    provider.assign_styled_node_collection(collection.clone(), NodeAppearance::DEFAULT);
    provider.unassign_styled_node_collection(&collection).unwrap();
    let events = record(&provider);

    collection.update_set(IndexSet::from_iter([2]));
    collection.clear();

    assert!(!provider.flush_pending_changes());
    assert!(events.borrow().is_empty());
}

#[test]
fn loading_state_is_transition_based() {
    let mut provider = NodeAppearanceProvider::new();
    let events = record(&provider);
    let loading_events = || -> Vec<bool> {
        events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                AppearanceProviderEvent::LoadingStateChanged { is_loading } => Some(*is_loading),
                AppearanceProviderEvent::Changed => None,
            })
            .collect()
    };

    let first = Rc::new(PopulatedNodeCollection::new());
    let second = Rc::new(PopulatedNodeCollection::new());
    first.begin_loading();
    second.begin_loading();

    provider.assign_styled_node_collection(first.clone(), NodeAppearance::DEFAULT);
    assert!(provider.is_loading());
    assert_eq!(loading_events(), [true]);

    // Already loading: no second `true`.
    provider.assign_styled_node_collection(second.clone(), NodeAppearance::DEFAULT);
    assert_eq!(loading_events(), [true]);

    first.finish();
    provider.flush_pending_changes();
    assert!(provider.is_loading());
    assert_eq!(loading_events(), [true]);

    second.fail();
    provider.flush_pending_changes();
    assert!(!provider.is_loading());
    assert_eq!(loading_events(), [true, false]);

    // An existing collection transitioning back to loading flips it again.
    second.begin_loading();
    provider.flush_pending_changes();
    assert_eq!(loading_events(), [true, false, true]);
}

#[test]
fn changed_precedes_loading_state_changed() {
    let mut provider = NodeAppearanceProvider::new();
    let events = record(&provider);
    let loading = Rc::new(PopulatedNodeCollection::new());
    loading.begin_loading();

    provider.assign_styled_node_collection(loading, NodeAppearance::DEFAULT);
    assert_eq!(
        *events.borrow(),
        [
            AppearanceProviderEvent::Changed,
            AppearanceProviderEvent::LoadingStateChanged { is_loading: true }
        ]
    );
}

#[test]
fn empty_combinations_style_nothing() {
    let mut provider = NodeAppearanceProvider::new();
    provider.assign_styled_node_collection(
        Rc::new(UnionNodeCollection::default()),
        NodeAppearance::HIDDEN,
    );
    provider.assign_styled_node_collection(
        Rc::new(IntersectionNodeCollection::default()),
        NodeAppearance::HIDDEN,
    );
    for (set, _) in replay(&provider) {
        assert!(set.is_empty());
    }
}

#[test]
fn composed_collection_changes_reach_provider() {
    let mut provider = NodeAppearanceProvider::new();
    let a = leaf([1, 2, 3]);
    let b = leaf([2, 3, 4]);
    let both = Rc::new(IntersectionNodeCollection::new([
        a.clone() as Rc<dyn NodeCollection>,
        b.clone(),
    ]));
    provider.assign_styled_node_collection(both, NodeAppearance::OUTLINED);
    let events = record(&provider);

    a.update_set(IndexSet::from_iter([3, 4]));
    assert!(provider.flush_pending_changes());
    assert_eq!(count_changed(&events), 1);
    assert_eq!(replay(&provider)[0].0, [3, 4]);
}

#[test]
fn off_stops_notifications() {
    let mut provider = NodeAppearanceProvider::new();
    let hits = Rc::new(RefCell::new(0));
    let id = provider.on({
        let hits = Rc::clone(&hits);
        move |_| *hits.borrow_mut() += 1
    });
    provider.assign_styled_node_collection(leaf([1]), NodeAppearance::DEFAULT);
    assert!(provider.off(id));
    provider.clear();
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn reassignment_fires_exactly_one_change() {
    let mut provider = NodeAppearanceProvider::new();
    let a = leaf([1]);
    provider.assign_styled_node_collection(a.clone(), NodeAppearance::GHOSTED);
    let events = record(&provider);

    provider.assign_styled_node_collection(a, NodeAppearance::HIDDEN);
    assert_eq!(*events.borrow(), [AppearanceProviderEvent::Changed]);
}

#[test]
fn registry_view_follows_importance_then_registration() {
    let mut provider = NodeAppearanceProvider::new();
    let low = leaf([1]);
    let high = leaf([2]);
    let also_low = leaf([3]);
    provider.assign_styled_node_collection_with_importance(
        high.clone(),
        NodeAppearance::HIGHLIGHTED,
        5,
    );
    provider.assign_styled_node_collection(low.clone(), NodeAppearance::DEFAULT);
    provider.assign_styled_node_collection(also_low.clone(), NodeAppearance::GHOSTED);

    let order: Vec<(Vec<u32>, NodeAppearance)> = provider
        .styled_node_collections()
        .map(|(collection, appearance)| (collection.index_set().to_vec(), *appearance))
        .collect();
    assert_eq!(
        order,
        [
            (vec![1], NodeAppearance::DEFAULT),
            (vec![3], NodeAppearance::GHOSTED),
            (vec![2], NodeAppearance::HIGHLIGHTED),
        ]
    );

    assert!(provider.is_assigned(&high));
    provider.unassign_styled_node_collection(&high).unwrap();
    assert!(!provider.is_assigned(&high));
    assert!(provider.is_assigned(&low));
    assert_eq!(provider.styled_node_collections().count(), 2);
}
