//! The two-point measurement state machine.
//!
//! ```text
//! Ready ──capture hit──> FirstPointSet ──capture hit──> Complete
//!   ^                                                      │
//!   └──────────── capture / reset / invalidate ────────────┘
//! ```
//!
//! Misses leave the state untouched. Reset and invalidation are accepted
//! from every state and release every visual the session placed.

use crate::error::TrackingError;
use crate::math::{SegmentTransform, distance};
use crate::spatial::SpatialQuery;
use crate::visual::{VisualHandles, Visualizer};
use bevy_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A completed two-point measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub id: u32,
    pub start: Vec3,
    pub end: Vec3,
    /// Unrounded distance in meters.
    pub distance: f32,
    pub segment: SegmentTransform,
}

impl Measurement {
    fn between(id: u32, start: Vec3, end: Vec3) -> Self {
        Self {
            id,
            start,
            end,
            distance: distance(start, end),
            segment: SegmentTransform::between(start, end),
        }
    }

    /// Distance rounded for display.
    pub fn rounded_distance(&self, decimal_places: u32) -> f32 {
        crate::display::round_to(self.distance, decimal_places)
    }
}

/// Where the session is in the capture sequence. Each variant carries only
/// the data valid for it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasurementState {
    #[default]
    Ready,
    FirstPointSet {
        start: Vec3,
    },
    Complete(Measurement),
}

impl MeasurementState {
    pub fn phase(&self) -> MeasurementPhase {
        match self {
            Self::Ready => MeasurementPhase::Ready,
            Self::FirstPointSet { .. } => MeasurementPhase::FirstPointSet,
            Self::Complete(_) => MeasurementPhase::Complete,
        }
    }

    pub fn start_point(&self) -> Option<Vec3> {
        match self {
            Self::Ready => None,
            Self::FirstPointSet { start } => Some(*start),
            Self::Complete(measurement) => Some(measurement.start),
        }
    }

    pub fn end_point(&self) -> Option<Vec3> {
        self.measurement().map(|m| m.end)
    }

    pub fn distance(&self) -> Option<f32> {
        self.measurement().map(|m| m.distance)
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            Self::Complete(measurement) => Some(measurement),
            _ => None,
        }
    }
}

/// Data-free view of [`MeasurementState`] for display and wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementPhase {
    Ready,
    FirstPointSet,
    Complete,
}

impl MeasurementPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::FirstPointSet => "first_point_set",
            Self::Complete => "complete",
        }
    }
}

/// Result of a single capture request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureOutcome {
    /// First point stored.
    StartPlaced(Vec3),
    /// Second point stored and the measurement derived.
    Completed(Measurement),
    /// The request arrived in `Complete` and reset the session.
    Cleared,
    /// The ray-cast hit nothing usable.
    Missed,
    /// No surface has been detected yet, so no ray-cast was attempted.
    NoSurface,
    /// Tracking is not running; the request was dropped.
    Ignored,
}

impl CaptureOutcome {
    /// Whether the request changed the session.
    pub fn changed_state(&self) -> bool {
        matches!(
            self,
            Self::StartPlaced(_) | Self::Completed(_) | Self::Cleared
        )
    }
}

/// One measurement screen's worth of state. `M` and `S` are the renderer's
/// marker and segment handle types.
#[derive(Debug)]
pub struct MeasurementSession<M, S> {
    state: MeasurementState,
    visuals: VisualHandles<M, S>,
    next_id: u32,
}

impl<M, S> Default for MeasurementSession<M, S> {
    fn default() -> Self {
        Self {
            state: MeasurementState::Ready,
            visuals: VisualHandles::default(),
            next_id: 0,
        }
    }
}

impl<M, S> MeasurementSession<M, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MeasurementState {
        &self.state
    }

    pub fn phase(&self) -> MeasurementPhase {
        self.state.phase()
    }

    pub fn visuals(&self) -> &VisualHandles<M, S> {
        &self.visuals
    }

    /// Number of renderer handles this session still owns.
    pub fn outstanding_handles(&self) -> usize {
        self.visuals.outstanding()
    }

    /// Handle a capture request at `location`.
    ///
    /// In `Complete` the request resets the session without querying. In the
    /// other states the spatial query is consulted once; a miss or a
    /// non-finite point is a no-op.
    pub fn capture<Q, V>(&mut self, query: &mut Q, location: Vec2, visuals: &mut V) -> CaptureOutcome
    where
        Q: SpatialQuery + ?Sized,
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
    {
        if matches!(self.state, MeasurementState::Complete(_)) {
            self.reset(visuals);
            return CaptureOutcome::Cleared;
        }

        let Some(point) = query.raycast(location) else {
            debug!("Capture at {location} missed every surface");
            return CaptureOutcome::Missed;
        };

        if !point.is_finite() {
            warn!("Discarding non-finite capture point {point}");
            return CaptureOutcome::Missed;
        }

        self.place_point(point, visuals)
    }

    /// Advance the state with an already-resolved world point.
    fn place_point<V>(&mut self, point: Vec3, visuals: &mut V) -> CaptureOutcome
    where
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
    {
        match self.state {
            MeasurementState::Ready => {
                self.visuals.track_marker(visuals.place_marker(point));
                self.state = MeasurementState::FirstPointSet { start: point };
                info!("Measurement start point set at {point}");
                CaptureOutcome::StartPlaced(point)
            }
            MeasurementState::FirstPointSet { start } => {
                let measurement = Measurement::between(self.next_id, start, point);
                if !measurement.distance.is_finite() {
                    warn!("Discarding capture point {point}: distance from {start} overflows");
                    return CaptureOutcome::Missed;
                }

                self.visuals.track_marker(visuals.place_marker(point));
                self.next_id = self.next_id.wrapping_add(1);

                let segment = measurement.segment;
                if segment.is_degenerate() {
                    debug!("Zero-length measurement; segment not rendered");
                } else {
                    let handle =
                        visuals.place_segment(segment.position, segment.rotation, segment.length);
                    if let Some(stale) = self.visuals.track_segment(handle) {
                        visuals.remove_segment(stale);
                    }
                }

                self.state = MeasurementState::Complete(measurement);
                info!(
                    "Measurement {} completed: {:.3} m",
                    measurement.id, measurement.distance
                );
                CaptureOutcome::Completed(measurement)
            }
            MeasurementState::Complete(_) => {
                self.reset(visuals);
                CaptureOutcome::Cleared
            }
        }
    }

    /// Remove every placed visual and return to `Ready`. Returns whether
    /// anything was cleared.
    pub fn reset<V>(&mut self, visuals: &mut V) -> bool
    where
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
    {
        let released = self.visuals.release_all(visuals);
        let previous = std::mem::take(&mut self.state);
        let cleared = released > 0 || previous != MeasurementState::Ready;
        if cleared {
            info!(
                "Measurement reset from {} ({released} visuals released)",
                previous.phase().as_str()
            );
        }
        cleared
    }

    /// Forced reset caused by the tracking session going away.
    pub fn invalidate<V>(&mut self, visuals: &mut V, cause: &TrackingError) -> bool
    where
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
    {
        let cleared = self.reset(visuals);
        if cleared {
            warn!("In-progress measurement invalidated: {cause}");
        }
        cleared
    }
}
