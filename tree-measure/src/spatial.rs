//! Port through which the measurement core asks the tracking subsystem
//! where a screen location lands in the world.

use bevy_math::{Vec2, Vec3};

/// Resolves 2D input locations to 3D world points.
///
/// Implementors perform a single synchronous surface-intersection test per
/// call. The core never calls `raycast` concurrently with itself or with a
/// reset.
pub trait SpatialQuery {
    /// World point under `location`, or `None` when nothing was hit.
    fn raycast(&mut self, location: Vec2) -> Option<Vec3>;

    /// Whether a trackable surface has been detected yet.
    fn surface_detected(&self) -> bool;
}
