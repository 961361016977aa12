// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sightline Styling: which nodes of a CAD model get which look.
//!
//! A renderer draws every node of a model with a per-node style. This crate
//! keeps the bookkeeping that decides those styles:
//!
//! - [`NodeCollection`]: a source of tree indices (an
//!   [`IndexSet`](sightline_index::IndexSet)) with a loading flag and a
//!   `changed` event. Variants cover explicit sets
//!   ([`TreeIndexNodeCollection`]), externally populated results
//!   ([`PopulatedNodeCollection`]) and set algebra over other collections
//!   ([`UnionNodeCollection`], [`IntersectionNodeCollection`],
//!   [`InvertedNodeCollection`]).
//! - [`NodeAppearance`]: an optional-field style descriptor (visibility,
//!   color, outline, in-front, ghosted) with presets and layering.
//! - [`NodeAppearanceProvider`]: the registry of (collection, appearance)
//!   associations that a renderer replays through
//!   [`apply_styles`](NodeAppearanceProvider::apply_styles).
//!
//! Everything is single-threaded: collections are shared as
//! `Rc<dyn NodeCollection>` and notify through an [`EventTrigger`].
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//! use sightline_index::IndexSet;
//! use sightline_styling::{
//!     NodeAppearance, NodeAppearanceProvider, NodeCollection, TreeIndexNodeCollection,
//!     UnionNodeCollection,
//! };
//!
//! let pipes = Rc::new(TreeIndexNodeCollection::new(IndexSet::from_iter(10..20)));
//! let pumps = Rc::new(TreeIndexNodeCollection::new(IndexSet::from_iter([42])));
//! let equipment = Rc::new(UnionNodeCollection::new([
//!     pipes.clone() as Rc<dyn NodeCollection>,
//!     pumps.clone(),
//! ]));
//!
//! let mut provider = NodeAppearanceProvider::new();
//! provider.assign_styled_node_collection(equipment, NodeAppearance::OUTLINED);
//! provider.assign_styled_node_collection(pumps.clone(), NodeAppearance::HIGHLIGHTED);
//!
//! let mut styled = Vec::new();
//! provider.apply_styles(|set, appearance| styled.push((set.count(), *appearance)));
//! assert_eq!(styled[0], (11, NodeAppearance::OUTLINED));
//! assert_eq!(styled[1], (1, NodeAppearance::HIGHLIGHTED));
//!
//! // Collections can be unassigned only once.
//! assert!(provider.unassign_styled_node_collection(&pumps).is_ok());
//! assert!(provider.unassign_styled_node_collection(&pumps).is_err());
//! ```
//!
//! ## Persistence
//!
//! [`NodeCollection::serialize`] produces a [`SerializedNodeCollection`]
//! (`{ token, state, options }` with JSON payloads), and
//! [`deserialize_node_collection`] rebuilds an equivalent collection from it.
//!
//! ## Features
//!
//! - `std` (default): standard library support in dependencies.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod appearance;
mod collection;
mod combine;
mod deserialize;
mod error;
mod event;
mod inverted;
mod populated;
mod provider;
mod tree_index;

pub use appearance::{NodeAppearance, NodeOutlineColor, Rgb};
pub use collection::{NodeCollection, SerializedNodeCollection, same_collection};
pub use combine::{IntersectionNodeCollection, UnionNodeCollection};
pub use deserialize::deserialize_node_collection;
pub use error::StylingError;
pub use event::{EventTrigger, ListenerId};
pub use inverted::InvertedNodeCollection;
pub use populated::PopulatedNodeCollection;
pub use provider::{AppearanceProviderEvent, NodeAppearanceProvider};
pub use tree_index::TreeIndexNodeCollection;
