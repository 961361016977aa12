// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node handles, checkbox states, and per-node view state.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a node in a [`Tree`](crate::Tree).
///
/// A slot index plus a generation counter. Removing a node frees its slot;
/// reusing the slot bumps the generation, so a stale `TreeNodeId` never
/// aliases a newer node. Use [`Tree::is_alive`](crate::Tree::is_alive) to
/// check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TreeNodeId(pub(crate) u32, pub(crate) u32);

impl TreeNodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// State of a node's checkbox.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckBoxState {
    /// Checked.
    All,
    /// Partially checked: some descendants are checked, others are not.
    Some,
    /// Unchecked.
    None,
    /// No checkbox is shown for this node.
    #[default]
    Hidden,
}

/// View state of one tree node plus the caller's payload.
///
/// Built with [`TreeNode::new`] and the `with_*` methods, then handed to
/// [`Tree::add_root`](crate::Tree::add_root) or
/// [`Tree::add_child`](crate::Tree::add_child). Once inserted, fields change
/// only through the tree's setters so that listeners are notified.
#[derive(Clone, Debug)]
pub struct TreeNode<T> {
    pub(crate) label: String,
    pub(crate) has_bold_label: bool,
    pub(crate) icon: Option<String>,
    pub(crate) icon_color: Option<String>,
    pub(crate) is_selected: bool,
    pub(crate) is_enabled: bool,
    pub(crate) is_expanded: bool,
    pub(crate) check_box_state: CheckBoxState,
    pub(crate) need_load_children: bool,
    pub(crate) need_load_siblings: bool,
    pub(crate) is_loading_children: bool,
    pub(crate) is_loading_siblings: bool,
    pub(crate) parent: Option<TreeNodeId>,
    pub(crate) children: Vec<TreeNodeId>,
    pub(crate) user_data: T,
}

impl<T> TreeNode<T> {
    /// A collapsed, unselected, enabled node without a checkbox.
    #[must_use]
    pub fn new(label: impl Into<String>, user_data: T) -> Self {
        Self {
            label: label.into(),
            has_bold_label: false,
            icon: None,
            icon_color: None,
            is_selected: false,
            is_enabled: true,
            is_expanded: false,
            check_box_state: CheckBoxState::Hidden,
            need_load_children: false,
            need_load_siblings: false,
            is_loading_children: false,
            is_loading_siblings: false,
            parent: None,
            children: Vec::new(),
            user_data,
        }
    }

    /// Sets the initial checkbox state.
    #[must_use]
    pub fn with_check_box_state(mut self, state: CheckBoxState) -> Self {
        self.check_box_state = state;
        self
    }

    /// Sets whether the checkbox is initially enabled.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    /// Marks the node as having children that still have to be loaded.
    #[must_use]
    pub fn with_need_load_children(mut self, need: bool) -> Self {
        self.need_load_children = need;
        self
    }

    /// Marks the node as having siblings that still have to be loaded.
    #[must_use]
    pub fn with_need_load_siblings(mut self, need: bool) -> Self {
        self.need_load_siblings = need;
        self
    }

    /// Sets the initial icon name.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the label is drawn in bold.
    #[must_use]
    pub fn has_bold_label(&self) -> bool {
        self.has_bold_label
    }

    /// Icon name, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Icon color, if any.
    #[must_use]
    pub fn icon_color(&self) -> Option<&str> {
        self.icon_color.as_deref()
    }

    /// Whether the node is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Whether the node's checkbox can be toggled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Whether the node's children are shown.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    /// Checkbox state.
    #[must_use]
    pub fn check_box_state(&self) -> CheckBoxState {
        self.check_box_state
    }

    /// Whether children still have to be loaded.
    #[must_use]
    pub fn need_load_children(&self) -> bool {
        self.need_load_children
    }

    /// Whether siblings still have to be loaded.
    #[must_use]
    pub fn need_load_siblings(&self) -> bool {
        self.need_load_siblings
    }

    /// Whether a children load is in flight.
    #[must_use]
    pub fn is_loading_children(&self) -> bool {
        self.is_loading_children
    }

    /// Whether a siblings load is in flight.
    #[must_use]
    pub fn is_loading_siblings(&self) -> bool {
        self.is_loading_siblings
    }

    /// `true` if the node has children or may get some from a lazy load.
    #[must_use]
    pub fn is_parent(&self) -> bool {
        self.need_load_children || !self.children.is_empty()
    }

    /// Parent node, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<TreeNodeId> {
        self.parent
    }

    /// Children in display order.
    #[must_use]
    pub fn children(&self) -> &[TreeNodeId] {
        &self.children
    }

    /// The caller's payload.
    #[must_use]
    pub fn user_data(&self) -> &T {
        &self.user_data
    }
}
