// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sightline Tree: the state model behind a tree view.
//!
//! A [`Tree`] is an arena of [`TreeNode`]s addressed by generational
//! [`TreeNodeId`]s. Each node carries what a tree-view widget needs to draw a
//! row: label, icon, selection, expansion, an enabled flag and a tri-state
//! [`CheckBoxState`], plus the caller's payload.
//!
//! - Setters compare against the stored value and notify listeners registered
//!   with [`Tree::add_listener`] only on an actual change.
//! - [`Tree::calculate_check_box_state`] folds a node's direct children into
//!   its checkbox state, ignoring disabled children and hidden checkboxes.
//! - Nodes flagged with `need_load_children` get their children from a
//!   [`NodeLoader`] on first use; sibling pages can be appended with
//!   [`Tree::load_siblings`].
//!
//! ## Example
//!
//! ```rust
//! use sightline_tree::{CheckBoxState, LoadDirection, Tree, TreeNode, TreeNodeId};
//!
//! let mut tree = Tree::new();
//! let root = tree.add_root(
//!     TreeNode::new("Models", 0_u32)
//!         .with_check_box_state(CheckBoxState::None)
//!         .with_need_load_children(true),
//! );
//!
//! let mut loader = |_: &Tree<u32>, _: TreeNodeId, _: LoadDirection| {
//!     vec![
//!         TreeNode::new("Pump", 1).with_check_box_state(CheckBoxState::All),
//!         TreeNode::new("Valve", 2).with_check_box_state(CheckBoxState::None),
//!     ]
//! };
//! let children = tree.load_children_if_needed(root, &mut loader).unwrap();
//! assert_eq!(children.len(), 2);
//!
//! assert_eq!(tree.calculate_check_box_state(root), Some(CheckBoxState::Some));
//! tree.set_check_box_state(children[1], CheckBoxState::All).unwrap();
//! assert_eq!(tree.calculate_check_box_state(root), Some(CheckBoxState::All));
//! ```
//!
//! ## Features
//!
//! - `std` (default): errors implement `std::error::Error`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod iter;
mod loader;
mod node;
mod tree;

pub use error::TreeError;
pub use iter::{Ancestors, Descendants};
pub use loader::{LoadDirection, NodeLoader};
pub use node::{CheckBoxState, TreeNode, TreeNodeId};
pub use tree::{ListenerId, Tree};
