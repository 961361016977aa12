// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::{Tree, TreeNodeId};

/// Pre-order walk over a subtree. See [`Tree::descendants`].
#[derive(Debug)]
pub struct Descendants<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<TreeNodeId>,
}

impl<'a, T> Descendants<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, children: &[TreeNodeId]) -> Self {
        Self {
            tree,
            stack: children.iter().rev().copied().collect(),
        }
    }
}

impl<T> Iterator for Descendants<'_, T> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<TreeNodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Walk from a node's parent up to its root. See [`Tree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a, T> {
    tree: &'a Tree<T>,
    next: Option<TreeNodeId>,
}

impl<'a, T> Ancestors<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, first: Option<TreeNodeId>) -> Self {
        Self { tree, next: first }
    }
}

impl<T> Iterator for Ancestors<'_, T> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<TreeNodeId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}
