/// Radius of the sphere placed at each captured point (meters).
pub const MARKER_RADIUS: f32 = 0.01;

/// Cross-section edge of the box drawn between the two captured points (meters).
pub const SEGMENT_THICKNESS: f32 = 0.005;

/// Radius of the cursor reticle that previews where a tap would land.
pub const RETICLE_RADIUS: f32 = 0.0125;

/// Marker colour (sRGB).
pub const MARKER_COLOUR: [f32; 3] = [0.1, 0.8, 0.2];

/// Segment colour (sRGB).
pub const SEGMENT_COLOUR: [f32; 3] = [1.0, 0.85, 0.1];

/// Reticle colour (sRGB).
pub const RETICLE_COLOUR: [f32; 3] = [1.0, 1.0, 1.0];
