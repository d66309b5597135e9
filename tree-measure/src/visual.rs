//! Port through which the measurement core drives the renderer, and the
//! per-session list of handles it has been given back.

use bevy_math::{Quat, Vec3};

/// Renderer-side operations for measurement visuals.
///
/// Handles are opaque to the core. They are moved into the removal calls, so
/// a handle can be released at most once.
pub trait Visualizer {
    type Marker;
    type Segment;

    fn place_marker(&mut self, at: Vec3) -> Self::Marker;

    fn remove_marker(&mut self, marker: Self::Marker);

    /// Place a segment of `length` along the reference axis, rotated by
    /// `rotation` and centred at `at`.
    fn place_segment(&mut self, at: Vec3, rotation: Quat, length: f32) -> Self::Segment;

    fn remove_segment(&mut self, segment: Self::Segment);
}

/// Handles of every visual a session has asked the renderer to create.
#[derive(Debug)]
pub struct VisualHandles<M, S> {
    markers: Vec<M>,
    segment: Option<S>,
}

impl<M, S> Default for VisualHandles<M, S> {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            segment: None,
        }
    }
}

impl<M, S> VisualHandles<M, S> {
    pub fn track_marker(&mut self, marker: M) {
        self.markers.push(marker);
    }

    /// Track the segment handle. A previously tracked segment is returned so
    /// the caller can release it.
    pub fn track_segment(&mut self, segment: S) -> Option<S> {
        self.segment.replace(segment)
    }

    /// Number of handles not yet released.
    pub fn outstanding(&self) -> usize {
        self.markers.len() + usize::from(self.segment.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding() == 0
    }

    pub fn markers(&self) -> &[M] {
        &self.markers
    }

    pub fn segment(&self) -> Option<&S> {
        self.segment.as_ref()
    }

    /// Ask the renderer to remove every tracked visual, then forget them.
    /// Returns how many handles were released.
    pub fn release_all<V>(&mut self, visuals: &mut V) -> usize
    where
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
    {
        let released = self.outstanding();
        if let Some(segment) = self.segment.take() {
            visuals.remove_segment(segment);
        }
        for marker in self.markers.drain(..) {
            visuals.remove_marker(marker);
        }
        released
    }
}
