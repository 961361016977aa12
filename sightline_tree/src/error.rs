// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::TreeNodeId;

/// Errors from structural tree operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id refers to a removed node.
    #[error("tree node {0:?} is no longer alive")]
    StaleNode(TreeNodeId),
    /// An insertion index past the end of a child list.
    #[error("child index {index} is out of bounds for {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },
}
