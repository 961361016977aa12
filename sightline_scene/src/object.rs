// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderable objects and the scene graph that holds them.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::ptr;

use glam::{Mat4, Vec2, Vec3};

use crate::{Aabb, Ray};

/// Raw details of a ray hitting an [`Object3D`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Index of the triangle that was hit, for triangle geometry.
    pub face_index: Option<usize>,
    /// Barycentric weights within that triangle.
    pub barycentric: Option<Vec2>,
}

/// Something that can be placed in a [`SceneGraph`].
///
/// Objects are shared as `Rc<dyn Object3D>` and identified by address.
pub trait Object3D: fmt::Debug {
    /// World-space bounds, or `None` for objects without geometry.
    fn bounding_box(&self) -> Option<Aabb>;

    /// The closest hit of `ray` with the object.
    fn raycast(&self, ray: &Ray) -> Option<RayHit>;

    /// Releases GPU-side resources. The object must not be rendered afterwards.
    fn dispose(&self);
}

/// Returns `true` if `a` and `b` are the same object.
#[must_use]
pub fn same_object<A, B>(a: &Rc<A>, b: &Rc<B>) -> bool
where
    A: Object3D + ?Sized,
    B: Object3D + ?Sized,
{
    ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Triangle geometry placed in the world by a transform.
#[derive(Debug)]
pub struct Mesh {
    triangles: RefCell<Vec<[Vec3; 3]>>,
    transform: Mat4,
    disposed: Cell<bool>,
}

impl Mesh {
    /// Creates a mesh from local-space triangles.
    #[must_use]
    pub fn new(triangles: Vec<[Vec3; 3]>, transform: Mat4) -> Self {
        Self {
            triangles: RefCell::new(triangles),
            transform,
            disposed: Cell::new(false),
        }
    }

    /// An axis-aligned box mesh with twelve triangles.
    #[must_use]
    pub fn cuboid(bounds: Aabb, transform: Mat4) -> Self {
        // Corner index bits: x = 1, y = 2, z = 4.
        const FACES: [[usize; 4]; 6] = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ];
        let c = bounds.corners();
        let triangles = FACES
            .iter()
            .flat_map(|[a, b, c2, d]| [[c[*a], c[*b], c[*c2]], [c[*a], c[*c2], c[*d]]])
            .collect();
        Self::new(triangles, transform)
    }

    /// Local to world transform.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Number of triangles still held.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.borrow().len()
    }

    /// Returns `true` once [`dispose`](Object3D::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn world_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let triangles = self.triangles.borrow();
        (0..triangles.len()).map(move |i| triangles[i].map(|v| self.transform.transform_point3(v)))
    }
}

impl Object3D for Mesh {
    fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.world_triangles().flatten())
    }

    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.bounding_box()?.intersect_ray(ray)?;
        self.world_triangles()
            .enumerate()
            .filter_map(|(face, [v0, v1, v2])| {
                ray.intersect_triangle(v0, v1, v2)
                    .map(|hit| (face, hit))
            })
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
            .map(|(face, hit)| RayHit {
                point: ray.point_at(hit.distance),
                distance: hit.distance,
                face_index: Some(face),
                barycentric: Some(hit.barycentric),
            })
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            log::warn!("mesh disposed twice");
        }
        self.triangles.borrow_mut().clear();
    }
}

/// The flat list of objects a renderer draws.
#[derive(Debug, Default)]
pub struct SceneGraph {
    children: Vec<Rc<dyn Object3D>>,
}

impl SceneGraph {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `object`.
    pub fn add(&mut self, object: Rc<dyn Object3D>) {
        self.children.push(object);
    }

    /// Removes `object`; returns `false` if it was not in the scene.
    pub fn remove<O: Object3D + ?Sized>(&mut self, object: &Rc<O>) -> bool {
        match self.children.iter().position(|o| same_object(o, object)) {
            Some(pos) => {
                self.children.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `object` is in the scene.
    #[must_use]
    pub fn contains<O: Object3D + ?Sized>(&self, object: &Rc<O>) -> bool {
        self.children.iter().any(|o| same_object(o, object))
    }

    /// Objects in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &Rc<dyn Object3D>> + '_ {
        self.children.iter()
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the scene holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Disposes every object and empties the scene.
    pub fn dispose_all(&mut self) {
        for object in self.children.drain(..) {
            object.dispose();
        }
    }
}
