// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Errors raised by the style registry and by collection deserialization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StylingError {
    /// The collection passed to
    /// [`unassign_styled_node_collection`](crate::NodeAppearanceProvider::unassign_styled_node_collection)
    /// was never assigned to the provider.
    #[error("node collection is not assigned to this provider")]
    NotAssigned,
    /// A serialized descriptor names a collection type this crate cannot rebuild.
    #[error("unknown node collection token `{0}`")]
    UnknownToken(String),
    /// A descriptor's `state` or `options` payload does not have the expected shape.
    #[error("malformed `{token}` descriptor: {reason}")]
    MalformedState {
        /// Token of the descriptor being rebuilt.
        token: String,
        /// What was wrong with the payload.
        reason: String,
    },
}
