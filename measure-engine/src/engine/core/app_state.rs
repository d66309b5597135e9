use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::tracking::ground_tracker::GroundTracker;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::measure::MeasureTool;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    /// Tracking is not available; the screen only shows the error.
    Unsupported,
}

#[derive(Component)]
pub struct PromptText;

/// Check tracking capability and arm the ground tracker.
pub fn start_tracking_session(
    mut tracker: ResMut<GroundTracker>,
    mut measure_tool: ResMut<MeasureTool>,
    windows: Query<(), With<PrimaryWindow>>,
    cameras: Query<(), With<Camera3d>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    tracker.set_viewport_available(!windows.is_empty() && !cameras.is_empty());

    match measure_tool.controller.start(&mut *tracker) {
        Ok(()) => info!("→ Tracking session running"),
        Err(e) => {
            error!("Cannot start measurement: {}", e);
            rpc_interface.send_notification(
                "tracking_error",
                serde_json::json!({
                    "message": e.to_string(),
                    "fatal": e.is_fatal(),
                    "invalidated": false,
                }),
            );
            next_state.set(AppState::Unsupported);
        }
    }
}

/// Keep the overlay in sync with the measurement prompt.
pub fn update_prompt_text(
    measure_tool: Option<Res<MeasureTool>>,
    mut query: Query<&mut Text, With<PromptText>>,
) {
    let Some(measure_tool) = measure_tool else {
        return;
    };
    for mut text in &mut query {
        let prompt = measure_tool.controller.prompt();
        if text.0 != prompt {
            text.0 = prompt;
        }
    }
}
