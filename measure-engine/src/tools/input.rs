use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use tree_measure::MeasureEvent;

use super::measure::{InputSource, MeasureInput};

/// Map pointer, touch and keyboard input onto the measurement event stream.
pub fn handle_measure_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut inputs: EventWriter<MeasureInput>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        if let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) {
            inputs.write(MeasureInput::new(
                MeasureEvent::Capture { location: cursor },
                InputSource::Pointer,
            ));
        }
    }

    for touch in touches.iter_just_pressed() {
        inputs.write(MeasureInput::new(
            MeasureEvent::Capture {
                location: touch.position(),
            },
            InputSource::Touch,
        ));
    }

    handle_measure_shortcuts(&keyboard, &mut inputs);
}

#[cfg(not(target_arch = "wasm32"))]
fn handle_measure_shortcuts(keyboard: &ButtonInput<KeyCode>, inputs: &mut EventWriter<MeasureInput>) {
    if keyboard.any_just_pressed([KeyCode::KeyR, KeyCode::Escape]) {
        inputs.write(MeasureInput::new(MeasureEvent::Reset, InputSource::Keyboard));
    }
}

#[cfg(target_arch = "wasm32")]
fn handle_measure_shortcuts(_keyboard: &ButtonInput<KeyCode>, _inputs: &mut EventWriter<MeasureInput>) {
    // Reset comes from the frontend over RPC in WASM builds.
}
