// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy loading of children and siblings.
//!
//! A node flagged with `need_load_children` shows an expander before its
//! children exist. The first time they are wanted, a [`NodeLoader`] fetches
//! them. Callers whose loader is asynchronous use the two-phase
//! `begin_*`/`complete_*` pair instead and call `complete_*` when the data
//! arrives.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::{Tree, TreeError, TreeNode, TreeNodeId};

/// What a [`NodeLoader`] is asked to fetch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoadDirection {
    /// The node's children.
    Children,
    /// More siblings to show after the node.
    Siblings,
}

/// Supplies nodes on demand.
///
/// Closures `FnMut(&Tree<T>, TreeNodeId, LoadDirection) -> Vec<TreeNode<T>>`
/// implement this trait.
pub trait NodeLoader<T> {
    /// Fetches children or siblings of `node`.
    ///
    /// Returning nothing leaves the node's `need_load_*` flag set so that a
    /// later attempt can retry.
    fn load(
        &mut self,
        tree: &Tree<T>,
        node: TreeNodeId,
        direction: LoadDirection,
    ) -> Vec<TreeNode<T>>;

    /// Called for each node after it was inserted under `parent`.
    fn on_node_loaded(&mut self, tree: &Tree<T>, node: TreeNodeId, parent: TreeNodeId) {
        let _ = (tree, node, parent);
    }
}

impl<T, F> NodeLoader<T> for F
where
    F: FnMut(&Tree<T>, TreeNodeId, LoadDirection) -> Vec<TreeNode<T>>,
{
    fn load(
        &mut self,
        tree: &Tree<T>,
        node: TreeNodeId,
        direction: LoadDirection,
    ) -> Vec<TreeNode<T>> {
        self(tree, node, direction)
    }
}

impl<T> Tree<T> {
    /// Loads the children of `id` if it is flagged as needing them and no
    /// load is already running. Returns the ids of the inserted children.
    pub fn load_children_if_needed(
        &mut self,
        id: TreeNodeId,
        loader: &mut impl NodeLoader<T>,
    ) -> Result<Vec<TreeNodeId>, TreeError> {
        let node = self.node(id)?;
        if !node.is_parent() || !node.need_load_children || node.is_loading_children {
            return Ok(Vec::new());
        }
        self.load_children(id, loader)
    }

    /// Fetches the children of `id` through `loader` and appends them.
    ///
    /// Does nothing while another children load of `id` is running.
    pub fn load_children(
        &mut self,
        id: TreeNodeId,
        loader: &mut impl NodeLoader<T>,
    ) -> Result<Vec<TreeNodeId>, TreeError> {
        if !self.begin_load_children(id)? {
            return Ok(Vec::new());
        }
        let nodes = loader.load(self, id, LoadDirection::Children);
        let added = self.complete_load_children(id, nodes)?;
        for &child in &added {
            loader.on_node_loaded(self, child, id);
        }
        Ok(added)
    }

    /// Marks a children load of `id` as running.
    ///
    /// Returns `false` if one is already running, in which case the caller
    /// must not start another.
    pub fn begin_load_children(&mut self, id: TreeNodeId) -> Result<bool, TreeError> {
        if self.node(id)?.is_loading_children {
            log::debug!("children of {id:?} are already loading");
            return Ok(false);
        }
        self.set_loading_children(id, true)
    }

    /// Finishes a children load of `id` by appending `nodes`.
    ///
    /// An empty result keeps `need_load_children` set.
    pub fn complete_load_children(
        &mut self,
        id: TreeNodeId,
        nodes: Vec<TreeNode<T>>,
    ) -> Result<Vec<TreeNodeId>, TreeError> {
        self.set_loading_children(id, false)?;
        if nodes.is_empty() {
            log::debug!("no children loaded for {id:?}");
            return Ok(Vec::new());
        }
        let mut added = Vec::with_capacity(nodes.len());
        for node in nodes {
            added.push(self.add_child(id, node)?);
        }
        log::debug!("loaded {} child(ren) for {id:?}", added.len());
        self.set_need_load_children(id, false)?;
        Ok(added)
    }
}

impl<T: Eq + Hash> Tree<T> {
    /// Fetches more siblings of `id` through `loader` and inserts them right
    /// after it, in order.
    ///
    /// Siblings whose payload equals one the parent already has are skipped.
    pub fn load_siblings(
        &mut self,
        id: TreeNodeId,
        loader: &mut impl NodeLoader<T>,
    ) -> Result<Vec<TreeNodeId>, TreeError> {
        if !self.begin_load_siblings(id)? {
            return Ok(Vec::new());
        }
        let nodes = loader.load(self, id, LoadDirection::Siblings);
        let added = self.complete_load_siblings(id, nodes)?;
        if let Some(parent) = self.parent(id) {
            for &sibling in &added {
                loader.on_node_loaded(self, sibling, parent);
            }
        }
        Ok(added)
    }

    /// Marks a siblings load of `id` as running. Returns `false` if one is
    /// already running.
    pub fn begin_load_siblings(&mut self, id: TreeNodeId) -> Result<bool, TreeError> {
        if self.node(id)?.is_loading_siblings {
            log::debug!("siblings of {id:?} are already loading");
            return Ok(false);
        }
        self.set_loading_siblings(id, true)
    }

    /// Finishes a siblings load of `id` by inserting `nodes` after it.
    ///
    /// Roots have no parent to insert into; their result is dropped with a
    /// warning and `need_load_siblings` stays set.
    pub fn complete_load_siblings(
        &mut self,
        id: TreeNodeId,
        nodes: Vec<TreeNode<T>>,
    ) -> Result<Vec<TreeNodeId>, TreeError> {
        self.set_loading_siblings(id, false)?;
        if nodes.is_empty() {
            log::debug!("no siblings loaded for {id:?}");
            return Ok(Vec::new());
        }
        let Some(parent) = self.parent(id) else {
            log::warn!("dropping {} sibling(s) loaded for root {id:?}", nodes.len());
            return Ok(Vec::new());
        };
        let Some(position) = self.children(parent).iter().position(|&c| c == id) else {
            return Err(TreeError::StaleNode(id));
        };

        let keep: Vec<bool> = {
            let mut seen: HashSet<&T> = self
                .children(parent)
                .iter()
                .filter_map(|&child| self.get(child))
                .map(|child| &child.user_data)
                .collect();
            nodes.iter().map(|node| seen.insert(&node.user_data)).collect()
        };

        let mut added = Vec::new();
        let mut index = position;
        for (node, keep) in nodes.into_iter().zip(keep) {
            if !keep {
                continue;
            }
            index += 1;
            added.push(self.insert_child(parent, index, node)?);
        }
        log::debug!("loaded {} sibling(s) after {id:?}", added.len());
        self.set_need_load_siblings(id, false)?;
        self.update(parent);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn begin_refuses_overlapping_loads() {
        let mut tree: Tree<u32> = Tree::new();
        let root = tree.add_root(TreeNode::new("root", 0).with_need_load_children(true));
        assert_eq!(tree.begin_load_children(root), Ok(true));
        assert!(tree.get(root).unwrap().is_loading_children());
        assert_eq!(tree.begin_load_children(root), Ok(false));

        let added = tree
            .complete_load_children(root, vec![TreeNode::new("a", 1)])
            .unwrap();
        assert_eq!(added.len(), 1);
        let node = tree.get(root).unwrap();
        assert!(!node.is_loading_children());
        assert!(!node.need_load_children());
    }

    #[test]
    fn closures_are_loaders() {
        let mut tree: Tree<u32> = Tree::new();
        let root = tree.add_root(TreeNode::new("root", 0).with_need_load_children(true));
        let mut loader = |_: &Tree<u32>, _: TreeNodeId, direction: LoadDirection| {
            assert_eq!(direction, LoadDirection::Children);
            vec![TreeNode::new("a", 1), TreeNode::new("b", 2)]
        };
        let added = tree.load_children_if_needed(root, &mut loader).unwrap();
        assert_eq!(tree.children(root), added.as_slice());
        assert!(tree.load_children_if_needed(root, &mut loader).unwrap().is_empty());
    }

    #[test]
    fn siblings_of_root_are_dropped() {
        let mut tree: Tree<u32> = Tree::new();
        let root = tree.add_root(TreeNode::new("root", 0).with_need_load_siblings(true));
        tree.begin_load_siblings(root).unwrap();
        let added = tree
            .complete_load_siblings(root, vec![TreeNode::new("x", 1)])
            .unwrap();
        assert!(added.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.get(root).unwrap().need_load_siblings());
    }
}
