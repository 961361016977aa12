// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbitrary objects opted into bounding-box aggregation and picking.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use glam::{Vec2, Vec3};

use crate::{Aabb, Camera, Object3D, Plane, Ray, RayHit};

/// Construction options for a [`CustomObject`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CustomObjectOptions {
    /// Include the object in the scene's combined bounding box.
    pub is_part_of_bounding_box: bool,
    /// Let the scene pick the object.
    pub should_pick: bool,
    /// Attach the object's bounding box to its intersections.
    pub should_pick_bounding_box: bool,
}

impl Default for CustomObjectOptions {
    fn default() -> Self {
        Self {
            is_part_of_bounding_box: true,
            should_pick: false,
            should_pick_bounding_box: false,
        }
    }
}

/// Everything a pick query needs: the ray, where it came from, and the
/// active clipping planes.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectInput {
    /// Viewport position of the pick in normalized device coordinates.
    pub normalized_coords: Vec2,
    /// Camera the ray was cast from.
    pub camera: Camera,
    /// World-space pick ray.
    pub ray: Ray,
    /// Active clipping planes; hits must be on the kept side of all of them.
    pub clipping_planes: Vec<Plane>,
}

impl IntersectInput {
    /// Builds the pick ray for `normalized_coords` as seen by `camera`.
    #[must_use]
    pub fn new(normalized_coords: Vec2, camera: Camera, clipping_planes: Vec<Plane>) -> Self {
        Self {
            normalized_coords,
            ray: camera.ray_from_normalized_coords(normalized_coords),
            camera,
            clipping_planes,
        }
    }

    /// Returns `true` if no clipping plane removes `point`.
    #[must_use]
    pub fn is_visible(&self, point: Vec3) -> bool {
        self.clipping_planes.iter().all(|plane| plane.keeps(point))
    }
}

/// A successful pick of a [`CustomObject`].
#[derive(Clone, Debug)]
pub struct CustomObjectIntersection {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin to the hit.
    pub distance_to_camera: f32,
    /// The object that was hit.
    pub custom_object: Rc<CustomObject>,
    /// The object's bounds, if it asked for them to be picked.
    pub bounding_box: Option<Aabb>,
    /// Raw hit details for caller-specific interpretation.
    pub user_data: RayHit,
}

/// Wraps an [`Object3D`] so a [`SceneHandler`](crate::SceneHandler) can
/// include it in bounds and picking like native model geometry.
///
/// The flags start from [`CustomObjectOptions`] and may be changed later.
#[derive(Debug)]
pub struct CustomObject {
    object: Rc<dyn Object3D>,
    is_part_of_bounding_box: Cell<bool>,
    should_pick: Cell<bool>,
    should_pick_bounding_box: Cell<bool>,
}

impl CustomObject {
    /// Wraps `object` with default options.
    #[must_use]
    pub fn new(object: Rc<dyn Object3D>) -> Self {
        Self::with_options(object, CustomObjectOptions::default())
    }

    /// Wraps `object`.
    #[must_use]
    pub fn with_options(object: Rc<dyn Object3D>, options: CustomObjectOptions) -> Self {
        Self {
            object,
            is_part_of_bounding_box: Cell::new(options.is_part_of_bounding_box),
            should_pick: Cell::new(options.should_pick),
            should_pick_bounding_box: Cell::new(options.should_pick_bounding_box),
        }
    }

    /// The wrapped object.
    #[must_use]
    pub fn object(&self) -> &Rc<dyn Object3D> {
        &self.object
    }

    /// Whether the object counts toward the scene bounds.
    #[must_use]
    pub fn is_part_of_bounding_box(&self) -> bool {
        self.is_part_of_bounding_box.get()
    }

    /// Sets [`is_part_of_bounding_box`](Self::is_part_of_bounding_box).
    pub fn set_is_part_of_bounding_box(&self, value: bool) {
        self.is_part_of_bounding_box.set(value);
    }

    /// Whether the scene picks the object.
    #[must_use]
    pub fn should_pick(&self) -> bool {
        self.should_pick.get()
    }

    /// Sets [`should_pick`](Self::should_pick).
    pub fn set_should_pick(&self, value: bool) {
        self.should_pick.set(value);
    }

    /// Whether intersections carry the object's bounding box.
    #[must_use]
    pub fn should_pick_bounding_box(&self) -> bool {
        self.should_pick_bounding_box.get()
    }

    /// Sets [`should_pick_bounding_box`](Self::should_pick_bounding_box).
    pub fn set_should_pick_bounding_box(&self, value: bool) {
        self.should_pick_bounding_box.set(value);
    }

    /// World-space bounds of the wrapped object.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.object.bounding_box()
    }

    /// Intersects the input ray with the object, unless something closer was
    /// already found.
    ///
    /// Returns `None` if the ray misses, if `closest_distance` is strictly
    /// smaller than this hit's distance, or if a clipping plane removes the
    /// hit point. A hit at exactly `closest_distance` is returned.
    ///
    /// The query has no side effects, so it can fold over many candidates:
    ///
    /// ```rust
    /// use std::rc::Rc;
    /// use glam::{Mat4, Vec2, Vec3};
    /// use sightline_scene::{
    ///     Aabb, Camera, CustomObject, CustomObjectIntersection, IntersectInput, Mesh,
    /// };
    ///
    /// let cube = |z: f32| {
    ///     let mesh = Mesh::cuboid(
    ///         Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
    ///         Mat4::from_translation(Vec3::new(0.0, 0.0, z)),
    ///     );
    ///     Rc::new(CustomObject::new(Rc::new(mesh)))
    /// };
    /// let objects = [cube(-5.0), cube(0.0)];
    /// let input = IntersectInput::new(Vec2::ZERO, Camera::default(), Vec::new());
    ///
    /// let mut closest: Option<CustomObjectIntersection> = None;
    /// for object in &objects {
    ///     let distance = closest.as_ref().map(|hit| hit.distance_to_camera);
    ///     if let Some(hit) = object.intersect_if_closer(&input, distance) {
    ///         closest = Some(hit);
    ///     }
    /// }
    /// let closest = closest.unwrap();
    /// assert!(Rc::ptr_eq(&closest.custom_object, &objects[1]));
    /// ```
    #[must_use]
    pub fn intersect_if_closer(
        self: &Rc<Self>,
        input: &IntersectInput,
        closest_distance: Option<f32>,
    ) -> Option<CustomObjectIntersection> {
        let hit = self.object.raycast(&input.ray)?;
        if closest_distance.is_some_and(|closest| closest < hit.distance) {
            return None;
        }
        if !input.is_visible(hit.point) {
            return None;
        }
        let bounding_box = if self.should_pick_bounding_box() {
            self.bounding_box()
        } else {
            None
        };
        Some(CustomObjectIntersection {
            point: hit.point,
            distance_to_camera: hit.distance,
            custom_object: Rc::clone(self),
            bounding_box,
            user_data: hit,
        })
    }
}
