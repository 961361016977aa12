// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking and tracking through the public `sightline_scene` API.

use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};
use sightline_scene::{
    Aabb, Camera, CustomObject, CustomObjectOptions, IntersectInput, Mesh, ModelIdentifier,
    Object3D, Plane, Ray, SceneHandler,
};

const PICKABLE: CustomObjectOptions = CustomObjectOptions {
    is_part_of_bounding_box: true,
    should_pick: true,
    should_pick_bounding_box: false,
};

/// A thin plate facing the camera whose front face is `distance` away from
/// the origin along -Z.
fn plate_at(distance: f32) -> Rc<CustomObject> {
    let mesh = Mesh::cuboid(
        Aabb::new(Vec3::new(-1.0, -1.0, -0.1), Vec3::new(1.0, 1.0, 0.0)),
        Mat4::from_translation(Vec3::new(0.0, 0.0, -distance)),
    );
    Rc::new(CustomObject::with_options(Rc::new(mesh), PICKABLE))
}

fn input_from_origin() -> IntersectInput {
    let camera = Camera {
        position: Vec3::ZERO,
        target: Vec3::NEG_Z,
        ..Camera::default()
    };
    let input = IntersectInput::new(Vec2::ZERO, camera, Vec::new());
    assert!(
        (input.ray.direction - Vec3::NEG_Z).length() < 1e-4,
        "center pick ray looks straight ahead"
    );
    input
}

#[test]
fn closer_object_wins_in_either_order() {
    let near = plate_at(5.0);
    let far = plate_at(10.0);
    let input = input_from_origin();

    let far_hit = far.intersect_if_closer(&input, None).expect("far plate is hit");
    assert!((far_hit.distance_to_camera - 10.0).abs() < 1e-3);
    let near_hit = near.intersect_if_closer(&input, Some(far_hit.distance_to_camera));
    assert!(near_hit.is_some(), "closer object replaces the current hit");

    let near_hit = near.intersect_if_closer(&input, None).expect("near plate is hit");
    assert!((near_hit.distance_to_camera - 5.0).abs() < 1e-3);
    assert!(
        far.intersect_if_closer(&input, Some(near_hit.distance_to_camera))
            .is_none(),
        "farther object must not replace a closer hit"
    );
}

#[test]
fn miss_returns_none() {
    let plate = plate_at(5.0);
    let mut input = input_from_origin();
    input.ray = Ray::new(Vec3::ZERO, Vec3::Z);
    assert!(plate.intersect_if_closer(&input, None).is_none());
}

#[test]
fn handler_picks_closest_pickable_object() {
    let mut handler = SceneHandler::new();
    let far = plate_at(10.0);
    let near = plate_at(5.0);
    let nearest_but_unpickable = plate_at(2.0);
    nearest_but_unpickable.set_should_pick(false);
    handler.add_custom_object(far.clone());
    handler.add_custom_object(near.clone());
    handler.add_custom_object(nearest_but_unpickable);

    let hit = handler
        .intersect_custom_objects(&input_from_origin())
        .expect("a plate is hit");
    assert!(Rc::ptr_eq(&hit.custom_object, &near));
}

#[test]
fn clipping_hides_closest_hit() {
    let mut handler = SceneHandler::new();
    handler.add_custom_object(plate_at(5.0));
    let far = plate_at(10.0);
    handler.add_custom_object(far.clone());

    let mut input = input_from_origin();
    // Keep only what lies beyond z = -7.
    input
        .clipping_planes
        .push(Plane::from_normal_and_point(Vec3::NEG_Z, Vec3::new(0.0, 0.0, -7.0)));

    let hit = handler.intersect_custom_objects(&input).expect("far plate is hit");
    assert!(Rc::ptr_eq(&hit.custom_object, &far));
}

#[test]
fn add_then_remove_custom_object_leaves_no_trace() {
    let mut handler = SceneHandler::new();
    let object = plate_at(3.0);

    handler.add_custom_object(object.clone());
    assert!(handler.scene().contains(object.object()));
    assert_eq!(handler.custom_objects().len(), 1);

    assert!(handler.remove_custom_object(&object));
    assert!(!handler.scene().contains(object.object()));
    assert!(handler.custom_objects().is_empty());
}

#[test]
fn removing_untracked_objects_is_a_no_op() {
    let mut handler = SceneHandler::new();
    let tracked = plate_at(1.0);
    handler.add_custom_object(tracked.clone());
    let model: Rc<dyn Object3D> = Rc::new(Mesh::cuboid(
        Aabb::new(Vec3::ZERO, Vec3::ONE),
        Mat4::IDENTITY,
    ));
    handler.add_cad_model(model.clone(), ModelIdentifier(42));

    let stranger = plate_at(1.0);
    assert!(!handler.remove_custom_object(&stranger));
    assert!(!handler.remove_object3d(stranger.object()));
    assert!(!handler.remove_point_cloud_model(&model));

    assert_eq!(handler.custom_objects().len(), 1);
    assert_eq!(handler.cad_models().len(), 1);
    assert_eq!(handler.scene().len(), 2);
}
