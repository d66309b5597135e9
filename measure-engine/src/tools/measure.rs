use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use tree_measure::{
    CaptureOutcome, EventOutcome, MeasureEvent, MeasureSettings, MeasurementController,
    MeasurementPhase, SpatialQuery, TrackingStatus,
};

use super::input::handle_measure_input;
use super::measure_visuals::{EntityVisualizer, MeasureReticle, spawn_capture_reticle};
use crate::engine::core::app_state::AppState;
use crate::engine::tracking::ground_tracker::{GroundTracker, ViewportRaycast};
use crate::engine::tracking::signals::{
    detect_ground_surface, forward_window_focus, restart_failed_tracking, watch_viewport,
};
use crate::rpc::web_rpc::WebRpcInterface;

/// Where a [`MeasureInput`] came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Pointer,
    Touch,
    Keyboard,
    Rpc,
    Window,
    Tracker,
}

/// One entry of the serialized measurement event stream.
#[derive(Event, Debug, Clone)]
pub struct MeasureInput {
    pub event: MeasureEvent,
    pub source: InputSource,
}

impl MeasureInput {
    pub fn new(event: MeasureEvent, source: InputSource) -> Self {
        Self { event, source }
    }
}

/// The measurement screen. Markers and the segment are entity handles.
#[derive(Resource, Debug)]
pub struct MeasureTool {
    pub controller: MeasurementController<Entity, Entity>,
}

impl MeasureTool {
    pub fn new(settings: MeasureSettings) -> Self {
        Self {
            controller: MeasurementController::new(settings),
        }
    }

    /// Current state as sent to the frontend.
    pub fn snapshot(&self) -> serde_json::Value {
        let controller = &self.controller;
        let state = controller.state();
        serde_json::json!({
            "phase": controller.phase().as_str(),
            "status": controller.status(),
            "start": state.start_point().map(|p| p.to_array()),
            "end": state.end_point().map(|p| p.to_array()),
            "distance": state.distance(),
            "formatted": controller.formatted_distance(),
            "unit": controller.settings().display_unit,
            "prompt": controller.prompt(),
        })
    }
}

/// Drain the measurement event stream in arrival order. This is the only
/// system that applies captures, resets and tracking signals.
pub fn process_measure_events(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut inputs: EventReader<MeasureInput>,
    mut measure_tool: ResMut<MeasureTool>,
    mut tracker: ResMut<GroundTracker>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let camera = cameras.single().ok();
    let settings = measure_tool.controller.settings();
    let mut visuals = EntityVisualizer::new(
        &mut commands,
        &mut meshes,
        &mut materials,
        settings.marker_radius,
        settings.segment_thickness,
    );

    for input in inputs.read() {
        let mut query = ViewportRaycast::new(camera, tracker.plane());
        let outcome = measure_tool.controller.handle(
            input.event.clone(),
            &mut query,
            &mut visuals,
            &mut *tracker,
        );
        debug!("{:?} from {:?}: {:?}", input.event, input.source, outcome);
        notify_outcome(&outcome, &measure_tool, &mut rpc_interface);
    }
}

fn notify_outcome(outcome: &EventOutcome, measure_tool: &MeasureTool, rpc: &mut WebRpcInterface) {
    match outcome {
        EventOutcome::Capture(CaptureOutcome::StartPlaced(position)) => {
            rpc.send_notification(
                "measure_started",
                serde_json::json!({ "position": position.to_array() }),
            );
        }
        EventOutcome::Capture(CaptureOutcome::Completed(measurement)) => {
            info!(
                "Measurement {} complete: {}",
                measurement.id,
                measure_tool.controller.prompt()
            );
            rpc.send_notification(
                "measure_completed",
                serde_json::json!({
                    "id": measurement.id,
                    "start": measurement.start.to_array(),
                    "end": measurement.end.to_array(),
                    "distance": measurement.distance,
                    "formatted": measure_tool.controller.formatted_distance(),
                }),
            );
        }
        EventOutcome::Capture(CaptureOutcome::Cleared) | EventOutcome::Reset { cleared: true } => {
            rpc.send_notification("measure_clear", serde_json::json!({}));
        }
        EventOutcome::Notice(notice) => {
            rpc.send_notification(
                "tracking_error",
                serde_json::json!({
                    "message": notice.error.to_string(),
                    "fatal": notice.error.is_fatal(),
                    "invalidated": notice.invalidated,
                }),
            );
            if notice.invalidated {
                rpc.send_notification("measure_clear", serde_json::json!({}));
            }
        }
        EventOutcome::Restored => {
            rpc.send_notification("tracking_restored", serde_json::json!({}));
        }
        EventOutcome::SurfaceDetected => {
            rpc.send_notification("surface_detected", serde_json::json!({}));
        }
        EventOutcome::Capture(_) | EventOutcome::Reset { .. } | EventOutcome::Unchanged => {}
    }
}

/// Move the reticle to where the cursor meets the ground while a point is awaited.
pub fn update_capture_reticle(
    measure_tool: Res<MeasureTool>,
    tracker: Res<GroundTracker>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut reticles: Query<(&mut Transform, &mut Visibility), With<MeasureReticle>>,
) {
    let Ok((mut transform, mut visibility)) = reticles.single_mut() else {
        return;
    };

    let controller = &measure_tool.controller;
    let awaiting_point = controller.status() == TrackingStatus::Running
        && controller.phase() != MeasurementPhase::Complete;

    let hit = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .filter(|_| awaiting_point)
        .and_then(|cursor| ViewportRaycast::new(cameras.single().ok(), tracker.plane()).raycast(cursor));

    match hit {
        Some(position) if tracker.plane().detected => {
            transform.translation = position;
            *visibility = Visibility::Visible;
        }
        _ => *visibility = Visibility::Hidden,
    }
}

pub struct MeasureToolPlugin;

impl Plugin for MeasureToolPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MeasureInput>()
            .init_resource::<GroundTracker>()
            .add_systems(OnEnter(AppState::Running), spawn_capture_reticle)
            .add_systems(
                Update,
                (
                    watch_viewport,
                    forward_window_focus,
                    detect_ground_surface,
                    handle_measure_input,
                    process_measure_events,
                    restart_failed_tracking,
                    update_capture_reticle,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
