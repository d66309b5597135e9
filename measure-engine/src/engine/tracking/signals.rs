use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowFocused};
use tree_measure::{MeasureEvent, SpatialQuery, TrackingBackend, TrackingSignal, TrackingStatus};

use super::ground_tracker::{GroundTracker, ViewportRaycast};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::measure::{InputSource, MeasureInput, MeasureTool};

/// Report the ground plane once it comes into view through the viewport centre.
pub fn detect_ground_surface(
    mut tracker: ResMut<GroundTracker>,
    measure_tool: Res<MeasureTool>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut inputs: EventWriter<MeasureInput>,
) {
    if measure_tool.controller.status() != TrackingStatus::Running {
        return;
    }
    let plane = tracker.plane();
    if !plane.armed || plane.detected {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };

    let mut query = ViewportRaycast::new(cameras.single().ok(), plane);
    if query.raycast(window.size() * 0.5).is_some() && tracker.mark_detected() {
        inputs.write(MeasureInput::new(
            MeasureEvent::Tracking(TrackingSignal::SurfaceDetected),
            InputSource::Tracker,
        ));
    }
}

/// Losing window focus interrupts tracking; regaining it ends the interruption.
pub fn forward_window_focus(
    mut focus_events: EventReader<WindowFocused>,
    mut inputs: EventWriter<MeasureInput>,
) {
    for event in focus_events.read() {
        let signal = if event.focused {
            TrackingSignal::InterruptionEnded
        } else {
            TrackingSignal::Interrupted
        };
        inputs.write(MeasureInput::new(
            MeasureEvent::Tracking(signal),
            InputSource::Window,
        ));
    }
}

/// Fail the session when the viewport camera or window disappears.
pub fn watch_viewport(
    mut tracker: ResMut<GroundTracker>,
    measure_tool: Res<MeasureTool>,
    windows: Query<(), With<PrimaryWindow>>,
    cameras: Query<(), With<Camera3d>>,
    mut inputs: EventWriter<MeasureInput>,
) {
    let available = !windows.is_empty() && !cameras.is_empty();
    tracker.set_viewport_available(available);

    let tracking = matches!(
        measure_tool.controller.status(),
        TrackingStatus::Running | TrackingStatus::Interrupted
    );
    if tracking && !available {
        inputs.write(MeasureInput::new(
            MeasureEvent::Tracking(TrackingSignal::Failed {
                reason: "viewport camera lost".to_string(),
            }),
            InputSource::Tracker,
        ));
    }
}

/// Re-arm a failed session once the viewport is available again.
pub fn restart_failed_tracking(
    mut tracker: ResMut<GroundTracker>,
    mut measure_tool: ResMut<MeasureTool>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if measure_tool.controller.status() != TrackingStatus::Failed || !tracker.is_supported() {
        return;
    }
    if measure_tool.controller.start(&mut *tracker).is_ok() {
        rpc_interface.send_notification("tracking_restored", serde_json::json!({}));
    }
}
