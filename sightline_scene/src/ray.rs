// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{Mat4, Vec2, Vec3};

use crate::EPSILON;

/// A half-line from `origin` along a unit `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// Where a ray meets a triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray.
    pub distance: f32,
    /// Barycentric weights of the second and third vertex.
    pub barycentric: Vec2,
}

impl Ray {
    /// Creates a ray; `direction` is normalized.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// The point `origin + t * direction`.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The ray seen through `matrix`.
    #[must_use]
    pub fn transform(&self, matrix: &Mat4) -> Self {
        Self::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }

    /// Double-sided Möller–Trumbore test.
    ///
    /// Hits behind the origin and rays parallel to the triangle miss.
    #[must_use]
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        (t > EPSILON).then_some(TriangleHit {
            distance: t,
            barycentric: Vec2::new(u, v),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert!((ray.direction.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn hits_triangle_in_front() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z);
        let hit = ray
            .intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y)
            .expect("ray passes through the triangle");
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!((hit.barycentric - Vec2::new(0.2, 0.2)).length() < 1e-5);
    }

    #[test]
    fn misses_triangle_behind() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::Z);
        assert_eq!(ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y), None);
    }

    #[test]
    fn transform_moves_origin_only_under_translation() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let moved = ray.transform(&Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(moved.origin, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(moved.direction, Vec3::X);
    }
}
