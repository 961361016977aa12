// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{Mat4, Vec3, Vec4};

use crate::EPSILON;

/// A plane `normal · p + constant = 0` used for clipping.
///
/// Points with a non-negative signed distance are on the kept side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the kept half-space.
    pub normal: Vec3,
    /// Offset along the normal.
    pub constant: f32,
}

impl Plane {
    /// Plane through `point` keeping the side `normal` points to.
    #[must_use]
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            constant: -normal.dot(point),
        }
    }

    /// Plane from `ax + by + cz + d = 0`, normalized.
    ///
    /// Degenerate coefficients give the `y = 0` plane.
    #[must_use]
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let length = coefficients.truncate().length();
        if length < EPSILON {
            return Self {
                normal: Vec3::Y,
                constant: 0.0,
            };
        }
        Self {
            normal: coefficients.truncate() / length,
            constant: coefficients.w / length,
        }
    }

    /// Signed distance from the plane; positive on the kept side.
    #[must_use]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Returns `true` if `point` is on the kept side or on the plane.
    #[must_use]
    pub fn keeps(&self, point: Vec3) -> bool {
        self.signed_distance(point) >= 0.0
    }

    /// The plane carried along by `matrix`.
    #[must_use]
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let inverse_transpose = matrix.inverse().transpose();
        Self::from_coefficients(inverse_transpose * self.normal.extend(self.constant))
    }
}
