use bevy::math::{EulerRot, Quat, Vec2, Vec3};

use super::SceneCamera;
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::input::InputFrame;
use crate::engine::render::pose::{CameraPose, Lens};

const PITCH_LIMIT: f32 = 1.55;
const LOOK_SENSITIVITY: f32 = 0.003;
const ZOOM_STEP_DEGREES: f32 = 5.0;

/// Stands at a fixed point and looks around; zoom narrows the field of view.
pub struct PanoramicCamera {
    lifecycle: Lifecycle,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_degrees: f32,
    pub min_fov_degrees: f32,
    pub max_fov_degrees: f32,
}

impl PanoramicCamera {
    pub fn new(lifecycle: Lifecycle, position: Vec3) -> Self {
        Self {
            lifecycle,
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: 70.0,
            min_fov_degrees: 20.0,
            max_fov_degrees: 90.0,
        }
    }

    pub fn facing(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self
    }
}

crate::impl_activatable!(PanoramicCamera);

impl SceneCamera for PanoramicCamera {
    fn pose(&self) -> CameraPose {
        CameraPose::new(
            self.position,
            Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0),
        )
        .with_lens(Lens::Perspective {
            fov_degrees: self.fov_degrees,
        })
    }

    fn update(&mut self, input: &InputFrame, _dt: f32) {
        if input.look_delta != Vec2::ZERO {
            // Slower look when zoomed in.
            let scale = self.fov_degrees / self.max_fov_degrees;
            self.yaw -= input.look_delta.x * LOOK_SENSITIVITY * scale;
            self.pitch -= input.look_delta.y * LOOK_SENSITIVITY * scale;
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        if input.is_zooming && input.zoom_delta != 0.0 {
            self.fov_degrees -= input.zoom_delta * ZOOM_STEP_DEGREES;
            self.fov_degrees = self
                .fov_degrees
                .clamp(self.min_fov_degrees, self.max_fov_degrees);
        }
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        let (yaw, pitch, _) = pose.rotation.to_euler(EulerRot::YXZ);
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_never_moves() {
        let mut camera = PanoramicCamera::new(Lifecycle::new("pano"), Vec3::new(1.0, 2.0, 3.0));
        camera.update(
            &InputFrame {
                look_delta: Vec2::new(50.0, 20.0),
                move_axis: Vec3::ONE,
                ..Default::default()
            },
            0.1,
        );
        assert_eq!(camera.pose().position, Vec3::new(1.0, 2.0, 3.0));
        assert!(camera.yaw < 0.0);
    }

    #[test]
    fn test_zoom_narrows_fov_within_limits() {
        let mut camera = PanoramicCamera::new(Lifecycle::new("pano"), Vec3::ZERO);
        camera.update(&InputFrame::zoom(2.0), 0.1);
        assert_eq!(camera.fov_degrees, 60.0);

        camera.update(&InputFrame::zoom(100.0), 0.1);
        assert_eq!(camera.fov_degrees, camera.min_fov_degrees);

        camera.update(&InputFrame::zoom(-100.0), 0.1);
        assert_eq!(camera.fov_degrees, camera.max_fov_degrees);
    }
}
