//! Ground-plane tracking backend and the cursor ray-cast built on it.
//!
//! The viewport stands in for a device camera: the tracked surface is a
//! horizontal plane at the configured ground height, detected once it comes
//! into view. [`GroundTracker`] is the [`TrackingBackend`] the measurement
//! controller arms; [`ViewportRaycast`] answers capture ray-casts against a
//! snapshot of the plane.

use bevy::prelude::*;
use constants::coordinate_system::GRAZING_RAY_EPSILON;
use constants::measurement::{DEFAULT_GROUND_HEIGHT, MAX_CAPTURE_DISTANCE};
use tree_measure::{SpatialQuery, TrackingBackend, TrackingConfig};

/// Snapshot of the tracked ground surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub height: f32,
    /// Horizontal plane detection is running.
    pub armed: bool,
    /// The plane has been seen since the last tracking reset.
    pub detected: bool,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self {
            height: DEFAULT_GROUND_HEIGHT,
            armed: false,
            detected: false,
        }
    }
}

impl GroundPlane {
    /// Intersect `ray` with the plane, ignoring grazing rays, hits behind the
    /// origin and hits beyond the capture range.
    pub fn intersect(&self, ray: Ray3d) -> Option<Vec3> {
        if !self.armed {
            return None;
        }
        if ray.direction.y.abs() < GRAZING_RAY_EPSILON {
            return None;
        }
        let t = (self.height - ray.origin.y) / ray.direction.y;
        if t > 0.0 && t <= MAX_CAPTURE_DISTANCE {
            Some(ray.origin + ray.direction * t)
        } else {
            None
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct GroundTracker {
    viewport_available: bool,
    plane: GroundPlane,
}

impl GroundTracker {
    /// Record whether a window and 3D camera exist to track through.
    pub fn set_viewport_available(&mut self, available: bool) {
        self.viewport_available = available;
    }

    pub fn plane(&self) -> GroundPlane {
        self.plane
    }

    /// Mark the plane as seen. Returns true the first time after a reset.
    pub fn mark_detected(&mut self) -> bool {
        if !self.plane.armed || self.plane.detected {
            return false;
        }
        self.plane.detected = true;
        true
    }
}

impl TrackingBackend for GroundTracker {
    fn is_supported(&self) -> bool {
        self.viewport_available
    }

    fn run(&mut self, config: &TrackingConfig, reset: bool) {
        self.plane.height = config.ground_height;
        self.plane.armed = config.plane_detection.horizontal;
        if reset {
            self.plane.detected = false;
        }

        if !self.plane.armed {
            warn!("Horizontal plane detection is disabled; no ground surface will be tracked");
        }
        if config.plane_detection.vertical {
            debug!("Vertical plane detection requested; only the ground plane is tracked");
        }
        if config.scene_reconstruction {
            debug!("Scene reconstruction unavailable in the viewport tracker");
        }
        info!(
            "Ground tracking armed at y = {} (reset: {reset})",
            self.plane.height
        );
    }
}

/// Screen-space ray-cast from the 3D camera onto the tracked ground plane.
pub struct ViewportRaycast<'a> {
    camera: Option<(&'a Camera, &'a GlobalTransform)>,
    plane: GroundPlane,
}

impl<'a> ViewportRaycast<'a> {
    pub fn new(camera: Option<(&'a Camera, &'a GlobalTransform)>, plane: GroundPlane) -> Self {
        Self { camera, plane }
    }
}

impl SpatialQuery for ViewportRaycast<'_> {
    fn raycast(&mut self, location: Vec2) -> Option<Vec3> {
        let (camera, transform) = self.camera?;
        let ray = camera.viewport_to_world(transform, location).ok()?;
        self.plane.intersect(ray)
    }

    fn surface_detected(&self) -> bool {
        self.plane.detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed_plane() -> GroundPlane {
        GroundPlane {
            height: 0.0,
            armed: true,
            detected: true,
        }
    }

    #[test]
    fn downward_ray_hits_ground() {
        let ray = Ray3d {
            origin: Vec3::new(1.0, 2.0, -3.0),
            direction: Dir3::NEG_Y,
        };
        assert_eq!(armed_plane().intersect(ray), Some(Vec3::new(1.0, 0.0, -3.0)));
    }

    #[test]
    fn upward_and_grazing_rays_miss() {
        let plane = armed_plane();
        let up = Ray3d {
            origin: Vec3::new(0.0, 2.0, 0.0),
            direction: Dir3::Y,
        };
        let grazing = Ray3d {
            origin: Vec3::new(0.0, 2.0, 0.0),
            direction: Dir3::X,
        };
        assert_eq!(plane.intersect(up), None);
        assert_eq!(plane.intersect(grazing), None);
    }

    #[test]
    fn disarmed_plane_never_hits() {
        let plane = GroundPlane {
            armed: false,
            ..armed_plane()
        };
        let ray = Ray3d {
            origin: Vec3::new(0.0, 2.0, 0.0),
            direction: Dir3::NEG_Y,
        };
        assert_eq!(plane.intersect(ray), None);
    }

    #[test]
    fn far_hits_are_out_of_range() {
        let ray = Ray3d {
            origin: Vec3::new(0.0, MAX_CAPTURE_DISTANCE * 2.0, 0.0),
            direction: Dir3::NEG_Y,
        };
        assert_eq!(armed_plane().intersect(ray), None);
    }

    #[test]
    fn run_arms_and_reset_clears_detection() {
        let mut tracker = GroundTracker::default();
        assert!(!tracker.is_supported());
        tracker.set_viewport_available(true);
        assert!(tracker.is_supported());

        let config = TrackingConfig {
            ground_height: -1.5,
            ..TrackingConfig::default()
        };
        tracker.run(&config, true);
        assert!(tracker.mark_detected());
        assert!(!tracker.mark_detected());
        assert_eq!(tracker.plane().height, -1.5);

        tracker.run(&config, false);
        assert!(tracker.plane().detected);
        tracker.run(&config, true);
        assert!(!tracker.plane().detected);
    }

    #[test]
    fn raycast_without_camera_misses() {
        let mut query = ViewportRaycast::new(None, armed_plane());
        assert_eq!(query.raycast(Vec2::new(10.0, 10.0)), None);
        assert!(query.surface_detected());
    }
}
