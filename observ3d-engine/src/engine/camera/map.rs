use bevy::math::{Quat, Vec2, Vec3};
use constants::projection::DEFAULT_ORTHOGRAPHIC_SIZE;

use super::SceneCamera;
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::input::InputFrame;
use crate::engine::render::pose::{CameraPose, Lens, top_down_rotation};

const PAN_SENSITIVITY: f32 = 0.002;

/// Orthographic top-down view over a focus point.
pub struct MapCamera {
    lifecycle: Lifecycle,
    pub focus_point: Vec3,
    pub altitude: f32,
    pub yaw: f32,
    pub size: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl MapCamera {
    pub fn new(lifecycle: Lifecycle, focus_point: Vec3, altitude: f32) -> Self {
        Self {
            lifecycle,
            focus_point,
            altitude,
            yaw: 0.0,
            size: DEFAULT_ORTHOGRAPHIC_SIZE,
            min_size: 1.0,
            max_size: 2000.0,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size.clamp(self.min_size, self.max_size);
        self
    }
}

crate::impl_activatable!(MapCamera);

impl SceneCamera for MapCamera {
    fn pose(&self) -> CameraPose {
        CameraPose::new(
            Vec3::new(self.focus_point.x, self.altitude, self.focus_point.z),
            top_down_rotation(self.yaw),
        )
        .with_lens(Lens::Orthographic { size: self.size })
    }

    fn update(&mut self, input: &InputFrame, _dt: f32) {
        if input.is_zooming && input.zoom_delta != 0.0 {
            self.size *= 0.9f32.powf(input.zoom_delta);
            self.size = self.size.clamp(self.min_size, self.max_size);
        }

        if input.pan_delta != Vec2::ZERO {
            let yaw_rot = Quat::from_rotation_y(self.yaw);
            let right = yaw_rot * Vec3::X;
            let up_on_screen = yaw_rot * Vec3::NEG_Z;
            let scale = self.size * PAN_SENSITIVITY;
            self.focus_point -= right * input.pan_delta.x * scale;
            self.focus_point += up_on_screen * input.pan_delta.y * scale;
        }
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        self.focus_point = Vec3::new(pose.position.x, self.focus_point.y, pose.position.z);
        if let Lens::Orthographic { size } = pose.lens {
            self.size = size.clamp(self.min_size, self.max_size);
        }
    }
}
