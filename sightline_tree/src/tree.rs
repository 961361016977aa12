// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node arena: structure, change-detecting setters and listeners.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{Ancestors, CheckBoxState, Descendants, TreeError, TreeNode, TreeNodeId};

/// Handle returned by [`Tree::add_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(TreeNodeId)>;

struct Slot<T> {
    generation: u32,
    node: Option<TreeNode<T>>,
}

/// Arena of [`TreeNode`]s addressed by [`TreeNodeId`].
///
/// Parent links are plain ids, so the parent/child relation never forms an
/// ownership cycle. Every setter compares against the stored value and
/// notifies listeners only when something actually changed.
pub struct Tree<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    roots: Vec<TreeNodeId>,
    len: usize,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            len: 0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }
}

impl<T> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("roots", &self.roots)
            .field("len", &self.len)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<T> Tree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Root nodes in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[TreeNodeId] {
        &self.roots
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: TreeNodeId) -> bool {
        self.get(id).is_some()
    }

    /// The node behind `id`, or `None` if it was removed.
    #[must_use]
    pub fn get(&self, id: TreeNodeId) -> Option<&TreeNode<T>> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Mutable access to a node's payload.
    ///
    /// Payload edits are not view state and do not notify listeners.
    pub fn user_data_mut(&mut self, id: TreeNodeId) -> Option<&mut T> {
        self.get_mut(id).map(|node| &mut node.user_data)
    }

    // --- structure ---

    /// Inserts a new root node.
    pub fn add_root(&mut self, node: TreeNode<T>) -> TreeNodeId {
        let id = self.alloc(node);
        self.roots.push(id);
        log::trace!("added root {id:?}");
        id
    }

    /// Appends `node` as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: TreeNodeId,
        node: TreeNode<T>,
    ) -> Result<TreeNodeId, TreeError> {
        let len = self.node(parent)?.children.len();
        self.insert_child(parent, len, node)
    }

    /// Inserts `node` as the child of `parent` at position `index`.
    ///
    /// `index` may equal the current number of children, which appends.
    pub fn insert_child(
        &mut self,
        parent: TreeNodeId,
        index: usize,
        mut node: TreeNode<T>,
    ) -> Result<TreeNodeId, TreeError> {
        let len = self.node(parent)?.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        node.parent = Some(parent);
        node.children.clear();
        let id = self.alloc(node);
        self.node_mut(parent)?.children.insert(index, id);
        self.update(parent);
        Ok(id)
    }

    /// Removes `id` and its whole subtree, returning the payload of `id`.
    ///
    /// Ids of removed nodes become stale.
    pub fn remove(&mut self, id: TreeNodeId) -> Result<T, TreeError> {
        let parent = self.node(id)?.parent;
        match parent {
            Some(parent) => {
                if let Some(node) = self.get_mut(parent) {
                    node.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }

        let doomed: Vec<TreeNodeId> = self.descendants(id).collect();
        for descendant in doomed {
            self.free(descendant);
        }
        let node = self.free(id).ok_or(TreeError::StaleNode(id))?;
        log::trace!("removed {id:?}");
        if let Some(parent) = parent {
            self.update(parent);
        }
        Ok(node.user_data)
    }

    /// `true` if `child` is a direct child of `parent`.
    #[must_use]
    pub fn has_child(&self, parent: TreeNodeId, child: TreeNodeId) -> bool {
        self.children(parent).contains(&child)
    }

    /// `true` if any direct child of `parent` satisfies `eq`.
    #[must_use]
    pub fn has_child_by(
        &self,
        parent: TreeNodeId,
        mut eq: impl FnMut(&TreeNode<T>) -> bool,
    ) -> bool {
        self.children(parent)
            .iter()
            .filter_map(|&child| self.get(child))
            .any(|node| eq(node))
    }

    // --- navigation ---

    /// Parent of `id`, or `None` for roots and stale ids.
    #[must_use]
    pub fn parent(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Direct children of `id`; empty for leaves and stale ids.
    #[must_use]
    pub fn children(&self, id: TreeNodeId) -> &[TreeNodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Last direct child of `id`.
    #[must_use]
    pub fn last_child(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        self.children(id).last().copied()
    }

    /// The root of the subtree containing `id`.
    #[must_use]
    pub fn root_of(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.ancestors(id).last().unwrap_or(id))
    }

    /// `true` if `id` has children or still needs to load some.
    #[must_use]
    pub fn is_parent(&self, id: TreeNodeId) -> bool {
        self.get(id).is_some_and(TreeNode::is_parent)
    }

    /// Ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: TreeNodeId) -> Ancestors<'_, T> {
        Ancestors::new(self, self.parent(id))
    }

    /// All descendants of `id` in pre-order, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: TreeNodeId) -> Descendants<'_, T> {
        Descendants::new(self, self.children(id))
    }

    /// Descendants of `id` if it is expanded; nothing otherwise.
    #[must_use]
    pub fn expanded_descendants(&self, id: TreeNodeId) -> Descendants<'_, T> {
        if self.get(id).is_some_and(TreeNode::is_expanded) {
            self.descendants(id)
        } else {
            Descendants::new(self, &[])
        }
    }

    /// `id` followed by its descendants in pre-order.
    pub fn this_and_descendants(
        &self,
        id: TreeNodeId,
    ) -> impl Iterator<Item = TreeNodeId> + '_ {
        self.is_alive(id)
            .then_some(id)
            .into_iter()
            .chain(self.descendants(id))
    }

    // --- bulk operations ---

    /// Selected nodes among `id` and its descendants.
    #[must_use]
    pub fn selected_nodes(&self, id: TreeNodeId) -> Vec<TreeNodeId> {
        self.this_and_descendants(id)
            .filter(|&node| self.get(node).is_some_and(TreeNode::is_selected))
            .collect()
    }

    /// Fully checked nodes among `id` and its descendants.
    #[must_use]
    pub fn checked_nodes(&self, id: TreeNodeId) -> Vec<TreeNodeId> {
        self.this_and_descendants(id)
            .filter(|&node| {
                self.get(node)
                    .is_some_and(|n| n.check_box_state == CheckBoxState::All)
            })
            .collect()
    }

    /// Deselects `id` and all of its descendants.
    pub fn deselect_all(&mut self, id: TreeNodeId) {
        let nodes: Vec<TreeNodeId> = self.this_and_descendants(id).collect();
        self.set_flag_on_live(&nodes, false, |node| &mut node.is_selected);
    }

    /// Expands every ancestor of `id` so that it becomes visible.
    pub fn expand_all_ancestors(&mut self, id: TreeNodeId) {
        let ancestors: Vec<TreeNodeId> = self.ancestors(id).collect();
        self.set_flag_on_live(&ancestors, true, |node| &mut node.is_expanded);
    }

    // --- checkbox aggregation ---

    /// The checkbox state of `id` derived from its direct children.
    ///
    /// Only enabled children with a visible checkbox count. Any partially
    /// checked child, or a mix of checked and unchecked ones, gives
    /// [`CheckBoxState::Some`]. When no child counts, the node keeps its own
    /// stored state.
    #[must_use]
    pub fn calculate_check_box_state(&self, id: TreeNodeId) -> Option<CheckBoxState> {
        let node = self.get(id)?;
        let mut total = 0_usize;
        let mut all = 0_usize;
        let mut none = 0_usize;
        for child in node.children.iter().filter_map(|&child| self.get(child)) {
            if !child.is_enabled {
                continue;
            }
            match child.check_box_state {
                CheckBoxState::Hidden => continue,
                CheckBoxState::Some => return Some(CheckBoxState::Some),
                CheckBoxState::All => all += 1,
                CheckBoxState::None => none += 1,
            }
            total += 1;
        }
        Some(if total == 0 {
            node.check_box_state
        } else if all == total {
            CheckBoxState::All
        } else if none == total {
            CheckBoxState::None
        } else {
            CheckBoxState::Some
        })
    }

    /// Stores the calculated checkbox state of `id` and then of each ancestor.
    ///
    /// Call this after changing a child's checkbox so that the partial states
    /// up the chain follow.
    pub fn update_check_box_states_upwards(&mut self, id: TreeNodeId) -> Result<(), TreeError> {
        let chain: Vec<TreeNodeId> = core::iter::once(id).chain(self.ancestors(id)).collect();
        for node in chain {
            let state = self
                .calculate_check_box_state(node)
                .ok_or(TreeError::StaleNode(node))?;
            self.set_check_box_state(node, state)?;
        }
        Ok(())
    }

    // --- setters ---

    /// Sets the label. Returns whether it changed.
    pub fn set_label(
        &mut self,
        id: TreeNodeId,
        label: impl Into<String>,
    ) -> Result<bool, TreeError> {
        self.set_field(id, label.into(), |node| &mut node.label)
    }

    /// Sets whether the label is bold.
    pub fn set_bold_label(&mut self, id: TreeNodeId, bold: bool) -> Result<bool, TreeError> {
        self.set_field(id, bold, |node| &mut node.has_bold_label)
    }

    /// Sets the icon name.
    pub fn set_icon(&mut self, id: TreeNodeId, icon: Option<String>) -> Result<bool, TreeError> {
        self.set_field(id, icon, |node| &mut node.icon)
    }

    /// Sets the icon color.
    pub fn set_icon_color(
        &mut self,
        id: TreeNodeId,
        color: Option<String>,
    ) -> Result<bool, TreeError> {
        self.set_field(id, color, |node| &mut node.icon_color)
    }

    /// Selects or deselects a node.
    pub fn set_selected(&mut self, id: TreeNodeId, selected: bool) -> Result<bool, TreeError> {
        self.set_field(id, selected, |node| &mut node.is_selected)
    }

    /// Enables or disables a node's checkbox.
    pub fn set_enabled(&mut self, id: TreeNodeId, enabled: bool) -> Result<bool, TreeError> {
        self.set_field(id, enabled, |node| &mut node.is_enabled)
    }

    /// Expands or collapses a node.
    pub fn set_expanded(&mut self, id: TreeNodeId, expanded: bool) -> Result<bool, TreeError> {
        self.set_field(id, expanded, |node| &mut node.is_expanded)
    }

    /// Sets the checkbox state.
    pub fn set_check_box_state(
        &mut self,
        id: TreeNodeId,
        state: CheckBoxState,
    ) -> Result<bool, TreeError> {
        self.set_field(id, state, |node| &mut node.check_box_state)
    }

    /// Marks whether the node's children still have to be loaded.
    pub fn set_need_load_children(
        &mut self,
        id: TreeNodeId,
        need: bool,
    ) -> Result<bool, TreeError> {
        self.set_field(id, need, |node| &mut node.need_load_children)
    }

    /// Marks whether the node's siblings still have to be loaded.
    pub fn set_need_load_siblings(
        &mut self,
        id: TreeNodeId,
        need: bool,
    ) -> Result<bool, TreeError> {
        self.set_field(id, need, |node| &mut node.need_load_siblings)
    }

    pub(crate) fn set_loading_children(
        &mut self,
        id: TreeNodeId,
        loading: bool,
    ) -> Result<bool, TreeError> {
        self.set_field(id, loading, |node| &mut node.is_loading_children)
    }

    pub(crate) fn set_loading_siblings(
        &mut self,
        id: TreeNodeId,
        loading: bool,
    ) -> Result<bool, TreeError> {
        self.set_field(id, loading, |node| &mut node.is_loading_siblings)
    }

    // --- listeners ---

    /// Registers a callback run with the id of every node whose view state
    /// changes.
    pub fn add_listener(&mut self, listener: impl FnMut(TreeNodeId) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregisters a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _)| *other != id);
        self.listeners.len() != before
    }

    /// Notifies listeners that `id` changed.
    pub fn update(&mut self, id: TreeNodeId) {
        for (_, listener) in &mut self.listeners {
            listener(id);
        }
    }

    // --- internals ---

    pub(crate) fn node(&self, id: TreeNodeId) -> Result<&TreeNode<T>, TreeError> {
        self.get(id).ok_or(TreeError::StaleNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: TreeNodeId) -> Result<&mut TreeNode<T>, TreeError> {
        self.get_mut(id).ok_or(TreeError::StaleNode(id))
    }

    fn get_mut(&mut self, id: TreeNodeId) -> Option<&mut TreeNode<T>> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_mut())
    }

    fn set_field<V: PartialEq>(
        &mut self,
        id: TreeNodeId,
        value: V,
        field: impl FnOnce(&mut TreeNode<T>) -> &mut V,
    ) -> Result<bool, TreeError> {
        let slot = field(self.node_mut(id)?);
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        self.update(id);
        Ok(true)
    }

    /// Change-detecting flag update over ids collected from a walk of live nodes.
    fn set_flag_on_live(
        &mut self,
        ids: &[TreeNodeId],
        value: bool,
        field: impl Fn(&mut TreeNode<T>) -> &mut bool,
    ) {
        for &id in ids {
            let Some(node) = self.get_mut(id) else {
                continue;
            };
            let flag = field(node);
            if *flag != value {
                *flag = value;
                self.update(id);
            }
        }
    }

    fn alloc(&mut self, node: TreeNode<T>) -> TreeNodeId {
        self.len += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            return TreeNodeId::new(idx, slot.generation);
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "more than u32::MAX nodes is not supported"
        )]
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            node: Some(node),
        });
        TreeNodeId::new(idx, 1)
    }

    fn free(&mut self, id: TreeNodeId) -> Option<TreeNode<T>> {
        let slot = self
            .slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)?;
        let node = slot.node.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(node)
    }
}
