/// Decimal places used when a distance is shown to the user.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Upper bound accepted for `decimal_places` in settings.
pub const MAX_DECIMAL_PLACES: u32 = 6;

pub const CENTIMETERS_PER_METER: f32 = 100.0;
pub const INCHES_PER_METER: f32 = 39.3701;

/// Default height of the tracked ground plane (meters).
pub const DEFAULT_GROUND_HEIGHT: f32 = 0.0;

/// Farthest distance a capture ray is followed (meters).
pub const MAX_CAPTURE_DISTANCE: f32 = 500.0;
