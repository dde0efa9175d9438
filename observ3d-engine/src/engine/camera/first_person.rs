use bevy::math::{EulerRot, Quat, Vec2, Vec3};

use super::SceneCamera;
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::input::InputFrame;
use crate::engine::render::pose::{CameraPose, Lens};

const PITCH_LIMIT: f32 = 1.55;
const YAW_SENSITIVITY: f32 = 0.0035;
const PITCH_SENSITIVITY: f32 = 0.0030;

/// Free-flying camera moved along its own axes.
pub struct FirstPersonCamera {
    lifecycle: Lifecycle,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Units per second at full axis deflection.
    pub speed: f32,
    pub lens: Lens,
}

impl FirstPersonCamera {
    pub fn new(lifecycle: Lifecycle, position: Vec3) -> Self {
        Self {
            lifecycle,
            position,
            yaw: 0.0,
            pitch: 0.0,
            speed: 10.0,
            lens: Lens::default(),
        }
    }

    fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

crate::impl_activatable!(FirstPersonCamera);

impl SceneCamera for FirstPersonCamera {
    fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.view_rotation()).with_lens(self.lens)
    }

    fn update(&mut self, input: &InputFrame, dt: f32) {
        if input.look_delta != Vec2::ZERO {
            self.yaw -= input.look_delta.x * YAW_SENSITIVITY;
            self.pitch -= input.look_delta.y * PITCH_SENSITIVITY;
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        if input.move_axis != Vec3::ZERO {
            let rotation = self.view_rotation();
            let forward = rotation * Vec3::NEG_Z;
            let right = rotation * Vec3::X;
            let world_delta =
                right * input.move_axis.x + Vec3::Y * input.move_axis.y + forward * input.move_axis.z;
            if let Some(direction) = world_delta.try_normalize() {
                let magnitude = input.move_axis.length().min(1.0);
                self.position += direction * magnitude * self.speed * dt;
            }
        }
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        let (yaw, pitch, _) = pose.rotation.to_euler(EulerRot::YXZ);
        self.position = pose.position;
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}
