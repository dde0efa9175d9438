use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::engine::director::Director;
use crate::engine::input::InputFrame;

/// Collect this frame's mouse and keyboard input for the active camera.
///
/// Right drag looks around, middle drag pans, the wheel zooms, WASD/QE move.
pub fn sample_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<InputFrame>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    let mut move_axis = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        move_axis.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        move_axis.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_axis.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_axis.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        move_axis.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        move_axis.y -= 1.0;
    }

    *input = InputFrame {
        zoom_delta: scroll_accum,
        is_zooming: scroll_accum.abs() > f32::EPSILON,
        look_delta: if mouse_button.pressed(MouseButton::Right) {
            mouse_delta
        } else {
            Vec2::ZERO
        },
        pan_delta: if mouse_button.pressed(MouseButton::Middle) {
            mouse_delta
        } else {
            Vec2::ZERO
        },
        move_axis,
    };
}

const CAMERA_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const OUTPUT_KEYS: [KeyCode; 4] = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4];

/// Digits fly to the listed cameras, F-keys switch outputs, Escape skips
/// the flight in progress.
pub fn handle_director_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    director: Option<ResMut<Director>>,
) {
    let Some(mut director) = director else {
        return;
    };

    if let Some(index) = CAMERA_KEYS.iter().position(|k| keyboard.just_pressed(*k)) {
        if let Some(id) = director.available_cameras().get(index).cloned() {
            info!("Shortcut: fly to camera '{}'", id);
            director.go_to(&id, None);
        }
    }

    if let Some(index) = OUTPUT_KEYS.iter().position(|k| keyboard.just_pressed(*k)) {
        if let Some(id) = director.available_outputs().get(index).cloned() {
            info!("Shortcut: output '{}'", id);
            director.activate_output(&id);
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        if let Some(destination) = director.transition().map(|t| t.destination.clone()) {
            director.activate_camera(&destination);
        }
    }
}
