//! Property-based tests for measurement geometry and the state sequence.
//!
//! Run with: cargo test -p tree-measure --test properties

use bevy_math::{Quat, Vec2, Vec3};
use proptest::prelude::*;
use tree_measure::math::{REFERENCE_AXIS, SegmentTransform, distance, segment_rotation};
use tree_measure::{CaptureOutcome, MeasurementPhase, MeasurementSession, SpatialQuery, Visualizer};

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(-50.0..50.0f32).prop_map(Vec3::from_array)
}

/// Points large enough for their differences to overflow `f32`.
fn arb_extreme_point() -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(-1.0e38..1.0e38f32).prop_map(Vec3::from_array)
}

/// A capture result: mostly hits, some misses.
fn arb_capture() -> impl Strategy<Value = Option<Vec3>> {
    prop_oneof![3 => arb_point().prop_map(Some), 1 => Just(None)]
}

// =============================================================================
// Minimal ports
// =============================================================================

struct Replay(std::vec::IntoIter<Option<Vec3>>);

impl SpatialQuery for Replay {
    fn raycast(&mut self, _location: Vec2) -> Option<Vec3> {
        self.0.next().flatten()
    }

    fn surface_detected(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct Counter {
    live: i64,
}

impl Visualizer for Counter {
    type Marker = ();
    type Segment = ();

    fn place_marker(&mut self, _at: Vec3) {
        self.live += 1;
    }

    fn remove_marker(&mut self, _marker: ()) {
        self.live -= 1;
    }

    fn place_segment(&mut self, _at: Vec3, rotation: Quat, length: f32) {
        assert!(rotation.is_finite() && length.is_finite());
        self.live += 1;
    }

    fn remove_segment(&mut self, _segment: ()) {
        self.live -= 1;
    }
}

proptest! {
    #[test]
    fn proptest_distance_is_symmetric(a in arb_point(), b in arb_point()) {
        prop_assert!((distance(a, b) - distance(b, a)).abs() < 1e-4);
        prop_assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn proptest_rotation_aligns_reference_axis(a in arb_point(), b in arb_point()) {
        prop_assume!(a.distance(b) > 1e-3);
        let direction = (b - a).normalize();
        let rotated = segment_rotation(b - a) * REFERENCE_AXIS;
        prop_assert!(rotated.is_finite());
        prop_assert!(rotated.dot(direction) > 1.0 - 1e-4, "{rotated} vs {direction}");
    }

    #[test]
    fn proptest_segment_transform_is_finite(a in arb_point(), b in arb_point()) {
        let segment = SegmentTransform::between(a, b);
        prop_assert!(segment.rotation.is_finite());
        prop_assert!(segment.position.is_finite());
        prop_assert!(segment.length >= 0.0);
    }

    #[test]
    fn proptest_drawable_segment_is_finite(a in arb_extreme_point(), b in arb_extreme_point()) {
        let segment = SegmentTransform::between(a, b);
        if !segment.is_degenerate() {
            prop_assert!(segment.length.is_finite());
            prop_assert!(segment.position.is_finite());
            prop_assert!(segment.rotation.is_finite());
        }
    }

    #[test]
    fn proptest_extreme_captures_never_draw_non_finite_segment(
        points in prop::collection::vec(arb_extreme_point(), 2..8),
    ) {
        let mut query = Replay(points.iter().copied().map(Some).collect::<Vec<_>>().into_iter());
        let mut visuals = Counter::default();
        let mut session = MeasurementSession::new();

        for _ in 0..points.len() {
            session.capture(&mut query, Vec2::ZERO, &mut visuals);
            if let Some(distance) = session.state().distance() {
                prop_assert!(distance.is_finite());
            }
        }
    }

    #[test]
    fn proptest_state_sequence_is_legal(captures in prop::collection::vec(arb_capture(), 0..24)) {
        let mut query = Replay(captures.clone().into_iter());
        let mut visuals = Counter::default();
        let mut session = MeasurementSession::new();

        for _ in 0..captures.len() {
            let before = session.phase();
            let outcome = session.capture(&mut query, Vec2::ZERO, &mut visuals);
            let after = session.phase();

            let legal = matches!(
                (before, after),
                (MeasurementPhase::Ready, MeasurementPhase::Ready)
                    | (MeasurementPhase::Ready, MeasurementPhase::FirstPointSet)
                    | (MeasurementPhase::FirstPointSet, MeasurementPhase::FirstPointSet)
                    | (MeasurementPhase::FirstPointSet, MeasurementPhase::Complete)
                    | (MeasurementPhase::Complete, MeasurementPhase::Ready)
            );
            prop_assert!(legal, "{before:?} -> {after:?}");

            if outcome == CaptureOutcome::Missed {
                prop_assert_eq!(before, after);
            }
            if session.state().end_point().is_some() {
                prop_assert!(session.state().start_point().is_some());
            }
            prop_assert_eq!(visuals.live, session.outstanding_handles() as i64);
        }

        session.reset(&mut visuals);
        prop_assert_eq!(visuals.live, 0);
        prop_assert_eq!(session.outstanding_handles(), 0);
    }
}
