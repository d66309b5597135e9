/// Initial viewport camera position (eye height above the ground, metres).
pub const CAMERA_START_POSITION: [f32; 3] = [0.0, 1.6, 3.0];

/// Initial downward pitch of the viewport camera (radians).
pub const CAMERA_START_PITCH: f32 = -0.45;

pub const CAMERA_PITCH_LIMIT: f32 = 1.55;

/// Side length of the rendered ground patch (metres).
pub const GROUND_EXTENT: f32 = 20.0;

/// Stand-in trunk rendered in the viewport scene to measure against.
pub const REFERENCE_TRUNK_RADIUS: f32 = 0.25;
pub const REFERENCE_TRUNK_HEIGHT: f32 = 3.0;
