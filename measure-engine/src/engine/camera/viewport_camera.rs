use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use constants::viewport::{CAMERA_PITCH_LIMIT, CAMERA_START_PITCH, CAMERA_START_POSITION};

/// Free-look camera standing in for the handheld device pose.
#[derive(Resource)]
pub struct ViewportCamera {
    /// Eye position the camera eases towards.
    pub focus_point: Vec3,
    /// Eye height; scales movement speed.
    pub height: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        let focus_point = Vec3::from_array(CAMERA_START_POSITION);
        Self {
            focus_point,
            height: focus_point.y,
            pitch: CAMERA_START_PITCH,
            yaw: 0.0,
        }
    }
}

impl ViewportCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.focus_point).with_rotation(self.rotation())
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Right drag looks around
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport_camera.yaw += -mouse_delta.x * yaw_sens;
        viewport_camera.pitch = (viewport_camera.pitch - mouse_delta.y * pitch_sens)
            .clamp(-CAMERA_PITCH_LIMIT, CAMERA_PITCH_LIMIT);
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    // Scroll dollies along the view direction
    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (viewport_camera.height * 0.2).clamp(0.05, 5.0);
        let forward = viewport_camera.rotation() * Vec3::Z;
        viewport_camera.focus_point -= forward * (scroll_accum * dolly_speed);
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        move_input.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        move_input.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_input.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        move_input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        move_input.y -= 1.0;
    }

    if move_input != Vec3::ZERO {
        let view_rot = viewport_camera.rotation();
        let forward = view_rot * Vec3::Z;
        let right = view_rot * Vec3::X;

        // Shift = faster, ctrl = slower
        let mut speed = viewport_camera.height.clamp(0.5, 20.0);
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 3.5;
        }
        if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
            speed *= 0.25;
        }

        let world_delta = right * move_input.x + Vec3::Y * move_input.y + forward * move_input.z;
        viewport_camera.focus_point += world_delta.normalize_or_zero() * speed * time.delta_secs();
        viewport_camera.height = viewport_camera.focus_point.y.max(0.1);
    }

    let target = viewport_camera.transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}
