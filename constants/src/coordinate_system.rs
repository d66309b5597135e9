/// Canonical forward axis of the unit segment primitive.
/// The segment mesh is built along this axis and rotated into place.
pub const SEGMENT_REFERENCE_AXIS: [f32; 3] = [0.0, 0.0, 1.0];

/// Axis used for the 180° turn when the segment points exactly against
/// `SEGMENT_REFERENCE_AXIS`. Must be perpendicular to it.
pub const ANTIPARALLEL_FALLBACK_AXIS: [f32; 3] = [1.0, 0.0, 0.0];

/// Below this magnitude the rotation axis is treated as degenerate.
pub const AXIS_EPSILON: f32 = 1e-6;

/// Segments shorter than this are not handed to the renderer (meters).
pub const DEGENERATE_LENGTH_EPSILON: f32 = 1e-6;

/// Rays flatter than this (|dir.y|) never hit the ground plane.
pub const GRAZING_RAY_EPSILON: f32 = 0.001;
