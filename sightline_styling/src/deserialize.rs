// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::collection::ranges_from_state;
use crate::{
    IntersectionNodeCollection, InvertedNodeCollection, NodeCollection, PopulatedNodeCollection,
    SerializedNodeCollection, StylingError, TreeIndexNodeCollection, UnionNodeCollection,
};

/// Rebuilds a collection from a descriptor produced by
/// [`NodeCollection::serialize`].
///
/// A [`PopulatedNodeCollection`] descriptor comes back as a
/// [`TreeIndexNodeCollection`] holding the indices captured at serialization
/// time, since the source that populated it is not part of the descriptor.
///
/// ```rust
/// use std::rc::Rc;
/// use sightline_index::IndexSet;
/// use sightline_styling::{
///     NodeCollection, TreeIndexNodeCollection, UnionNodeCollection, deserialize_node_collection,
/// };
///
/// let leaf = Rc::new(TreeIndexNodeCollection::new(IndexSet::from_iter([4, 5])));
/// let union = UnionNodeCollection::new([leaf as Rc<dyn NodeCollection>]);
///
/// let rebuilt = deserialize_node_collection(&union.serialize()).unwrap();
/// assert_eq!(rebuilt.class_token(), "UnionNodeCollection");
/// assert_eq!(rebuilt.index_set(), union.index_set());
/// ```
pub fn deserialize_node_collection(
    descriptor: &SerializedNodeCollection,
) -> Result<Rc<dyn NodeCollection>, StylingError> {
    let collection: Rc<dyn NodeCollection> = match descriptor.token.as_str() {
        TreeIndexNodeCollection::CLASS_TOKEN | PopulatedNodeCollection::CLASS_TOKEN => {
            Rc::new(TreeIndexNodeCollection::new(ranges_from_state(descriptor)?))
        }
        UnionNodeCollection::CLASS_TOKEN => {
            Rc::new(UnionNodeCollection::new(children(descriptor)?))
        }
        IntersectionNodeCollection::CLASS_TOKEN => {
            Rc::new(IntersectionNodeCollection::new(children(descriptor)?))
        }
        InvertedNodeCollection::CLASS_TOKEN => {
            let inner: SerializedNodeCollection = serde_json::from_value(descriptor.state.clone())
                .map_err(|err| descriptor.malformed(err))?;
            let count = descriptor
                .options
                .get("treeIndexCount")
                .and_then(serde_json::Value::as_u64)
                .and_then(|count| u32::try_from(count).ok())
                .ok_or_else(|| descriptor.malformed("missing or invalid `treeIndexCount`"))?;
            Rc::new(InvertedNodeCollection::new(
                deserialize_node_collection(&inner)?,
                count,
            ))
        }
        other => return Err(StylingError::UnknownToken(other.into())),
    };
    log::debug!("rebuilt `{}` node collection", descriptor.token);
    Ok(collection)
}

fn children(
    descriptor: &SerializedNodeCollection,
) -> Result<Vec<Rc<dyn NodeCollection>>, StylingError> {
    let children: Vec<SerializedNodeCollection> =
        serde_json::from_value(descriptor.state.clone()).map_err(|err| descriptor.malformed(err))?;
    children.iter().map(deserialize_node_collection).collect()
}
