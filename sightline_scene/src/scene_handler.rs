// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracking of models and custom objects alongside the scene graph.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::object::same_object;
use crate::{Aabb, CustomObject, CustomObjectIntersection, IntersectInput, Object3D, SceneGraph};

/// Opaque identifier of a loaded model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelIdentifier(pub u64);

/// A tracked model: its root object and its identifier.
#[derive(Clone, Debug)]
pub struct ModelEntry {
    /// Root object attached to the scene graph.
    pub object: Rc<dyn Object3D>,
    /// Identifier the model was added with.
    pub model_identifier: ModelIdentifier,
}

/// Keeps CAD models, point-cloud models and custom objects in step with the
/// scene graph that renders them.
///
/// Every add attaches to the scene graph and records the object in the same
/// call; every remove does both in reverse. Removing something that is not
/// tracked is a no-op that returns `false`.
///
/// ```rust
/// use std::rc::Rc;
/// use glam::{Mat4, Vec3};
/// use sightline_scene::{Aabb, CustomObject, Mesh, SceneHandler};
///
/// let mut handler = SceneHandler::new();
/// let marker = Rc::new(CustomObject::new(Rc::new(Mesh::cuboid(
///     Aabb::new(Vec3::ZERO, Vec3::ONE),
///     Mat4::IDENTITY,
/// ))));
///
/// handler.add_custom_object(marker.clone());
/// assert_eq!(handler.scene().len(), 1);
///
/// assert!(handler.remove_custom_object(&marker));
/// assert!(!handler.remove_custom_object(&marker));
/// assert!(handler.scene().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SceneHandler {
    scene: SceneGraph,
    cad_models: Vec<ModelEntry>,
    point_cloud_models: Vec<ModelEntry>,
    custom_objects: Vec<Rc<CustomObject>>,
    disposed: bool,
}

impl SceneHandler {
    /// Creates a handler with an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene graph being rendered.
    #[must_use]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Tracked CAD models in insertion order.
    #[must_use]
    pub fn cad_models(&self) -> &[ModelEntry] {
        &self.cad_models
    }

    /// Tracked point-cloud models in insertion order.
    #[must_use]
    pub fn point_cloud_models(&self) -> &[ModelEntry] {
        &self.point_cloud_models
    }

    /// Tracked custom objects in insertion order.
    #[must_use]
    pub fn custom_objects(&self) -> &[Rc<CustomObject>] {
        &self.custom_objects
    }

    /// Tracks and attaches a CAD model.
    pub fn add_cad_model(&mut self, object: Rc<dyn Object3D>, model_identifier: ModelIdentifier) {
        log::debug!("adding CAD model {model_identifier:?}");
        self.scene.add(Rc::clone(&object));
        self.cad_models.push(ModelEntry {
            object,
            model_identifier,
        });
    }

    /// Detaches and forgets a CAD model.
    pub fn remove_cad_model<O: Object3D + ?Sized>(&mut self, object: &Rc<O>) -> bool {
        Self::remove_model(&mut self.scene, &mut self.cad_models, object)
    }

    /// Tracks and attaches a point-cloud model.
    pub fn add_point_cloud_model(
        &mut self,
        object: Rc<dyn Object3D>,
        model_identifier: ModelIdentifier,
    ) {
        log::debug!("adding point cloud model {model_identifier:?}");
        self.scene.add(Rc::clone(&object));
        self.point_cloud_models.push(ModelEntry {
            object,
            model_identifier,
        });
    }

    /// Detaches and forgets a point-cloud model.
    pub fn remove_point_cloud_model<O: Object3D + ?Sized>(&mut self, object: &Rc<O>) -> bool {
        Self::remove_model(&mut self.scene, &mut self.point_cloud_models, object)
    }

    /// Wraps `object` in a [`CustomObject`] with default options and tracks it.
    pub fn add_object3d(&mut self, object: Rc<dyn Object3D>) -> Rc<CustomObject> {
        let custom_object = Rc::new(CustomObject::new(object));
        self.add_custom_object(Rc::clone(&custom_object));
        custom_object
    }

    /// Removes the custom object wrapping `object`.
    pub fn remove_object3d<O: Object3D + ?Sized>(&mut self, object: &Rc<O>) -> bool {
        let Some(pos) = self
            .custom_objects
            .iter()
            .position(|custom| same_object(custom.object(), object))
        else {
            return false;
        };
        let custom_object = self.custom_objects.remove(pos);
        self.scene.remove(custom_object.object());
        log::debug!("removed custom object");
        true
    }

    /// Tracks a custom object and attaches its object to the scene.
    pub fn add_custom_object(&mut self, custom_object: Rc<CustomObject>) {
        log::debug!("adding custom object");
        self.scene.add(Rc::clone(custom_object.object()));
        self.custom_objects.push(custom_object);
    }

    /// Detaches and forgets a custom object.
    pub fn remove_custom_object(&mut self, custom_object: &Rc<CustomObject>) -> bool {
        let Some(pos) = self
            .custom_objects
            .iter()
            .position(|other| Rc::ptr_eq(other, custom_object))
        else {
            return false;
        };
        self.custom_objects.remove(pos);
        self.scene.remove(custom_object.object());
        log::debug!("removed custom object");
        true
    }

    /// Union of all model bounds and of custom objects that are part of the
    /// bounding box, or `None` if nothing has geometry.
    #[must_use]
    pub fn combined_bounding_box(&self) -> Option<Aabb> {
        let models = self
            .cad_models
            .iter()
            .chain(&self.point_cloud_models)
            .filter_map(|entry| entry.object.bounding_box());
        let customs = self
            .custom_objects
            .iter()
            .filter(|custom| custom.is_part_of_bounding_box())
            .filter_map(|custom| custom.bounding_box());
        models.chain(customs).reduce(|a, b| a.union(&b))
    }

    /// The closest hit among pickable custom objects.
    #[must_use]
    pub fn intersect_custom_objects(
        &self,
        input: &IntersectInput,
    ) -> Option<CustomObjectIntersection> {
        let mut closest: Option<CustomObjectIntersection> = None;
        for custom in self.custom_objects.iter().filter(|c| c.should_pick()) {
            let closest_distance = closest.as_ref().map(|hit| hit.distance_to_camera);
            if let Some(hit) = custom.intersect_if_closer(input, closest_distance) {
                closest = Some(hit);
            }
        }
        closest
    }

    /// Forgets everything, disposes every object in the scene, and empties it.
    ///
    /// Intended to be called once at teardown. Later calls only log a warning.
    pub fn dispose(&mut self) {
        if self.disposed {
            log::warn!("scene handler disposed more than once");
            return;
        }
        self.disposed = true;
        self.cad_models.clear();
        self.point_cloud_models.clear();
        self.custom_objects.clear();
        log::debug!("disposing {} scene object(s)", self.scene.len());
        self.scene.dispose_all();
    }

    fn remove_model<O: Object3D + ?Sized>(
        scene: &mut SceneGraph,
        models: &mut Vec<ModelEntry>,
        object: &Rc<O>,
    ) -> bool {
        let Some(pos) = models
            .iter()
            .position(|entry| same_object(&entry.object, object))
        else {
            return false;
        };
        let entry = models.remove(pos);
        scene.remove(&entry.object);
        log::debug!("removed model {:?}", entry.model_identifier);
        true
    }
}
