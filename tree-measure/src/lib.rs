//! Two-point tree diameter measurement.
//!
//! A user taps two points on a tracked surface; each tap is resolved to a
//! world point through a [`SpatialQuery`], markers and a connecting segment
//! are drawn through a [`Visualizer`], and the distance between the points is
//! reported. Tracking lifecycle signals share the same event stream as user
//! input so the [`MeasurementController`] is the only writer.
//!
//! This crate has no ECS dependency; `measure-engine` supplies the Bevy
//! implementations of both ports.
//!
//! ```
//! use bevy_math::{Quat, Vec2, Vec3};
//! use tree_measure::{CaptureOutcome, MeasurementSession, SpatialQuery, Visualizer};
//!
//! struct Fixed(Vec<Vec3>);
//! impl SpatialQuery for Fixed {
//!     fn raycast(&mut self, _: Vec2) -> Option<Vec3> { self.0.pop() }
//!     fn surface_detected(&self) -> bool { true }
//! }
//!
//! struct NoOp;
//! impl Visualizer for NoOp {
//!     type Marker = ();
//!     type Segment = ();
//!     fn place_marker(&mut self, _: Vec3) {}
//!     fn remove_marker(&mut self, _: ()) {}
//!     fn place_segment(&mut self, _: Vec3, _: Quat, _: f32) {}
//!     fn remove_segment(&mut self, _: ()) {}
//! }
//!
//! let mut query = Fixed(vec![Vec3::new(0.3, 0.0, 0.0), Vec3::ZERO]);
//! let mut session = MeasurementSession::new();
//! session.capture(&mut query, Vec2::ZERO, &mut NoOp);
//! let CaptureOutcome::Completed(m) = session.capture(&mut query, Vec2::ZERO, &mut NoOp) else {
//!     unreachable!()
//! };
//! assert_eq!(m.rounded_distance(2), 0.3);
//! ```

pub mod display;
pub mod error;
pub mod lifecycle;
pub mod math;
pub mod session;
pub mod settings;
pub mod spatial;
pub mod visual;

#[cfg(test)]
mod testing;

pub use display::DisplayUnit;
pub use error::{SettingsError, TrackingError};
pub use lifecycle::{
    EventOutcome, MeasureEvent, MeasurementController, SessionNotice, TrackingBackend,
    TrackingSignal, TrackingStatus,
};
pub use math::SegmentTransform;
pub use session::{CaptureOutcome, Measurement, MeasurementPhase, MeasurementSession, MeasurementState};
pub use settings::{InterruptionPolicy, MeasureSettings, PlaneDetection, TrackingConfig};
pub use spatial::SpatialQuery;
pub use visual::{VisualHandles, Visualizer};
