use bevy::math::{Vec2, Vec3};
use bevy::prelude::Resource;

/// Input sampled once per frame and handed to the active camera.
///
/// Host adapters fill this from mouse, keyboard or touch; the core only
/// sees these normalised signals.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Positive zooms in.
    pub zoom_delta: f32,
    /// Whether a zoom gesture is in progress this frame.
    pub is_zooming: bool,
    /// Look/orbit drag in pixels.
    pub look_delta: Vec2,
    /// Pan drag in pixels.
    pub pan_delta: Vec2,
    /// Camera-relative movement: x right, y up, z forward.
    pub move_axis: Vec3,
}

impl InputFrame {
    pub fn zoom(delta: f32) -> Self {
        Self {
            zoom_delta: delta,
            is_zooming: true,
            ..Default::default()
        }
    }

    pub fn look(delta: Vec2) -> Self {
        Self {
            look_delta: delta,
            ..Default::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
