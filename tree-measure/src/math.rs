//! Vector and rotation helpers for placing the measurement segment.
//!
//! All positions are world-space meters. The segment primitive is modelled
//! along [`REFERENCE_AXIS`]; [`SegmentTransform`] carries the translation,
//! rotation and length that stretch it between two captured points.

use bevy_math::{Quat, Vec3};
use constants::coordinate_system::{
    ANTIPARALLEL_FALLBACK_AXIS, AXIS_EPSILON, DEGENERATE_LENGTH_EPSILON, SEGMENT_REFERENCE_AXIS,
};
use serde::Serialize;
use std::f32::consts::PI;

/// Canonical forward axis of the segment primitive.
pub const REFERENCE_AXIS: Vec3 = Vec3::from_array(SEGMENT_REFERENCE_AXIS);

/// Euclidean distance between two points.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (b - a).length()
}

/// Halves before adding so points near the `f32` limits stay finite.
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    a * 0.5 + b * 0.5
}

/// Unit direction from `start` to `end`, or `None` when the points coincide
/// or a component is not finite.
pub fn direction(start: Vec3, end: Vec3) -> Option<Vec3> {
    (end - start).try_normalize()
}

/// Rotation taking the unit vector `from` onto `to` via angle-axis.
///
/// `from` must be normalized. `to` is normalized here; a zero or non-finite
/// `to` yields the identity. When the cross product vanishes the two vectors
/// are parallel (identity) or antiparallel (half turn about `fallback_axis`,
/// which must be perpendicular to `from`).
pub fn rotation_between(from: Vec3, to: Vec3, fallback_axis: Vec3) -> Quat {
    let Some(to) = to.try_normalize() else {
        return Quat::IDENTITY;
    };

    let cos_angle = from.dot(to).clamp(-1.0, 1.0);
    let axis = from.cross(to);

    if axis.length() < AXIS_EPSILON {
        return if cos_angle > 0.0 {
            Quat::IDENTITY
        } else {
            Quat::from_axis_angle(fallback_axis.normalize(), PI)
        };
    }

    Quat::from_axis_angle(axis.normalize(), cos_angle.acos())
}

/// Rotation aligning [`REFERENCE_AXIS`] with `direction`.
pub fn segment_rotation(direction: Vec3) -> Quat {
    rotation_between(
        REFERENCE_AXIS,
        direction,
        Vec3::from_array(ANTIPARALLEL_FALLBACK_AXIS),
    )
}

/// Placement of the connecting segment between two captured points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentTransform {
    /// Midpoint of the two points.
    pub position: Vec3,
    pub rotation: Quat,
    /// Distance between the two points (meters).
    pub length: f32,
}

impl SegmentTransform {
    pub fn between(start: Vec3, end: Vec3) -> Self {
        Self {
            position: midpoint(start, end),
            rotation: segment_rotation(end - start),
            length: distance(start, end),
        }
    }

    /// True when the segment is too short to orient or draw, or any part
    /// of it overflowed.
    pub fn is_degenerate(&self) -> bool {
        let finite =
            self.length.is_finite() && self.position.is_finite() && self.rotation.is_finite();
        !(finite && self.length > DEGENERATE_LENGTH_EPSILON)
    }

    /// The reference axis after rotation; parallel to end - start.
    pub fn direction(&self) -> Vec3 {
        self.rotation * REFERENCE_AXIS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Vec3::new(0.3, -1.2, 4.0);
        let b = Vec3::new(-2.0, 0.5, 1.0);
        assert_relative_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn three_four_five() {
        assert_relative_eq!(distance(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)), 5.0);
    }

    #[test]
    fn direction_of_coincident_points_is_none() {
        assert!(direction(Vec3::ONE, Vec3::ONE).is_none());
        assert!(direction(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)).is_none());
    }

    #[test]
    fn rotation_maps_reference_axis_onto_direction() {
        let targets = [
            Vec3::X,
            Vec3::NEG_Y,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.2, 0.0, -5.0),
        ];
        for target in targets {
            let rotation = segment_rotation(target);
            assert_vec_eq(rotation * REFERENCE_AXIS, target.normalize());
        }
    }

    #[test]
    fn parallel_direction_gives_identity() {
        assert_eq!(segment_rotation(Vec3::new(0.0, 0.0, 2.5)), Quat::IDENTITY);
    }

    #[test]
    fn antiparallel_direction_gives_half_turn() {
        let rotation = segment_rotation(Vec3::NEG_Z);
        assert!(rotation.is_finite());
        assert!(rotation.is_normalized());
        assert_vec_eq(rotation * REFERENCE_AXIS, Vec3::NEG_Z);
        let (axis, angle) = rotation.to_axis_angle();
        assert_relative_eq!(angle, PI, epsilon = 1e-5);
        assert_relative_eq!(axis.dot(REFERENCE_AXIS), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_direction_gives_identity() {
        assert_eq!(segment_rotation(Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn segment_between_unit_points() {
        let segment = SegmentTransform::between(Vec3::ZERO, Vec3::X);
        assert_vec_eq(segment.position, Vec3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(segment.length, 1.0);
        assert_vec_eq(segment.direction(), Vec3::X);
        assert!(!segment.is_degenerate());
    }

    #[test]
    fn coincident_points_make_degenerate_segment() {
        let segment = SegmentTransform::between(Vec3::ONE, Vec3::ONE);
        assert!(segment.is_degenerate());
        assert_eq!(segment.rotation, Quat::IDENTITY);
        assert_eq!(segment.length, 0.0);
    }

    #[test]
    fn overflowing_length_makes_degenerate_segment() {
        let start = Vec3::new(-3.0e38, 0.0, 0.0);
        let end = Vec3::new(3.0e38, 0.0, 0.0);
        let segment = SegmentTransform::between(start, end);
        assert!(segment.length.is_infinite());
        assert!(segment.is_degenerate());
        assert_vec_eq(midpoint(start, end), Vec3::ZERO);
        assert_eq!(midpoint(Vec3::splat(f32::MAX), Vec3::splat(f32::MAX)), Vec3::splat(f32::MAX));
    }
}
