// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sightline Scene: tracking and picking for everything a viewer renders.
//!
//! A viewer renders loaded models next to application-specific objects such
//! as measurement markers or annotation boxes. This crate lets both kinds share
//! one bounding-box and pointer-picking pipeline:
//!
//! - [`Object3D`] is anything that has bounds, can be ray cast, and owns GPU
//!   resources to dispose. [`Mesh`] is a triangle implementation.
//! - [`CustomObject`] wraps an object with flags deciding whether it counts
//!   toward scene bounds and whether it is pickable, and answers
//!   [`intersect_if_closer`](CustomObject::intersect_if_closer) queries.
//! - [`SceneHandler`] keeps CAD models, point-cloud models and custom objects
//!   in lockstep with the [`SceneGraph`] that renders them.
//!
//! Geometry comes from [`glam`]: [`Aabb`], [`Ray`], [`Plane`] and a
//! perspective [`Camera`] that turns viewport coordinates into pick rays.
//!
//! ## Picking
//!
//! ```rust
//! use std::rc::Rc;
//! use glam::{Mat4, Vec2, Vec3};
//! use sightline_scene::{
//!     Aabb, Camera, CustomObject, CustomObjectOptions, IntersectInput, Mesh, SceneHandler,
//! };
//!
//! let mut handler = SceneHandler::new();
//! let pickable = CustomObjectOptions {
//!     should_pick: true,
//!     ..CustomObjectOptions::default()
//! };
//! let marker = Rc::new(CustomObject::with_options(
//!     Rc::new(Mesh::cuboid(
//!         Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
//!         Mat4::IDENTITY,
//!     )),
//!     pickable,
//! ));
//! handler.add_custom_object(marker.clone());
//!
//! let input = IntersectInput::new(Vec2::ZERO, Camera::default(), Vec::new());
//! let hit = handler.intersect_custom_objects(&input).unwrap();
//! assert!(Rc::ptr_eq(&hit.custom_object, &marker));
//! assert!((hit.distance_to_camera - 9.0).abs() < 1e-4);
//! ```
//!
//! ## Features
//!
//! - `std` (default): uses the standard library for float math. Without it,
//!   [`glam`] falls back to `libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod aabb;
mod camera;
mod custom_object;
mod object;
mod plane;
mod ray;
mod scene_handler;

pub use aabb::Aabb;
pub use camera::Camera;
pub use custom_object::{
    CustomObject, CustomObjectIntersection, CustomObjectOptions, IntersectInput,
};
pub use object::{Mesh, Object3D, RayHit, SceneGraph, same_object};
pub use plane::Plane;
pub use ray::{Ray, TriangleHit};
pub use scene_handler::{ModelEntry, ModelIdentifier, SceneHandler};

/// Tolerance for parallel-ray and degenerate-geometry checks.
pub const EPSILON: f32 = 1e-6;
