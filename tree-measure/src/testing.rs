//! Recording fakes for the measurement ports.

use crate::lifecycle::TrackingBackend;
use crate::settings::TrackingConfig;
use crate::spatial::SpatialQuery;
use crate::visual::Visualizer;
use bevy_math::{Quat, Vec2, Vec3};
use std::collections::{HashSet, VecDeque};

/// Returns scripted ray-cast results in order, then misses.
#[derive(Debug, Default)]
pub struct ScriptedQuery {
    results: VecDeque<Option<Vec3>>,
    pub surface: bool,
    pub raycasts: usize,
}

impl ScriptedQuery {
    pub fn new(results: impl IntoIterator<Item = Option<Vec3>>) -> Self {
        Self {
            results: results.into_iter().collect(),
            surface: true,
            raycasts: 0,
        }
    }

    pub fn hits(points: impl IntoIterator<Item = Vec3>) -> Self {
        Self::new(points.into_iter().map(Some))
    }

    pub fn misses() -> Self {
        Self::new([])
    }
}

impl SpatialQuery for ScriptedQuery {
    fn raycast(&mut self, _location: Vec2) -> Option<Vec3> {
        self.raycasts += 1;
        self.results.pop_front().flatten()
    }

    fn surface_detected(&self) -> bool {
        self.surface
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualCall {
    PlaceMarker { handle: u32, at: Vec3 },
    RemoveMarker(u32),
    PlaceSegment { handle: u32, at: Vec3, rotation: Quat, length: f32 },
    RemoveSegment(u32),
}

/// Hands out numeric handles and panics on unknown or repeated removal.
#[derive(Debug, Default)]
pub struct RecordingVisualizer {
    next: u32,
    markers: HashSet<u32>,
    segments: HashSet<u32>,
    pub calls: Vec<VisualCall>,
}

impl RecordingVisualizer {
    pub fn live_markers(&self) -> usize {
        self.markers.len()
    }

    pub fn live_segments(&self) -> usize {
        self.segments.len()
    }

    fn next_handle(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

impl Visualizer for RecordingVisualizer {
    type Marker = u32;
    type Segment = u32;

    fn place_marker(&mut self, at: Vec3) -> u32 {
        let handle = self.next_handle();
        self.markers.insert(handle);
        self.calls.push(VisualCall::PlaceMarker { handle, at });
        handle
    }

    fn remove_marker(&mut self, marker: u32) {
        assert!(self.markers.remove(&marker), "marker {marker} released twice");
        self.calls.push(VisualCall::RemoveMarker(marker));
    }

    fn place_segment(&mut self, at: Vec3, rotation: Quat, length: f32) -> u32 {
        assert!(rotation.is_finite(), "non-finite segment rotation");
        assert!(length.is_finite(), "non-finite segment length");
        let handle = self.next_handle();
        self.segments.insert(handle);
        self.calls.push(VisualCall::PlaceSegment {
            handle,
            at,
            rotation,
            length,
        });
        handle
    }

    fn remove_segment(&mut self, segment: u32) {
        assert!(self.segments.remove(&segment), "segment {segment} released twice");
        self.calls.push(VisualCall::RemoveSegment(segment));
    }
}

/// Records every (re)arm request.
#[derive(Debug)]
pub struct FakeBackend {
    pub supported: bool,
    pub runs: Vec<(TrackingConfig, bool)>,
}

impl FakeBackend {
    pub fn supported() -> Self {
        Self {
            supported: true,
            runs: Vec::new(),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            runs: Vec::new(),
        }
    }
}

impl TrackingBackend for FakeBackend {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn run(&mut self, config: &TrackingConfig, reset: bool) {
        self.runs.push((config.clone(), reset));
    }
}
