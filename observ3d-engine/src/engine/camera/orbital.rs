use bevy::math::{Quat, Vec3};

use super::SceneCamera;
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::input::InputFrame;
use crate::engine::render::pose::{CameraPose, Lens, look_rotation};

const MIN_PITCH: f32 = -1.5;
const MAX_PITCH: f32 = -0.1;
const LOOK_SENSITIVITY: f32 = 0.0035;
const PAN_SENSITIVITY: f32 = 0.001;
const SMOOTHING: f32 = 12.0;

/// Orbits a focus point; zoom changes the orbit distance.
pub struct OrbitalCamera {
    lifecycle: Lifecycle,
    pub focus_point: Vec3,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub lens: Lens,
    current: CameraPose,
}

impl OrbitalCamera {
    pub fn new(lifecycle: Lifecycle, focus_point: Vec3, distance: f32) -> Self {
        let mut camera = Self {
            lifecycle,
            focus_point,
            distance,
            min_distance: 5.0,
            max_distance: 5000.0,
            pitch: -0.6,
            yaw: 0.0,
            lens: Lens::default(),
            current: CameraPose::default(),
        };
        camera.distance = camera.distance.clamp(camera.min_distance, camera.max_distance);
        camera.current = camera.target_pose();
        camera
    }

    pub fn with_angles(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        self.current = self.target_pose();
        self
    }

    fn orbit_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Pose the camera is easing towards.
    pub fn target_pose(&self) -> CameraPose {
        let offset = self.orbit_rotation() * Vec3::new(0.0, 0.0, self.distance);
        CameraPose::looking_at(self.focus_point + offset, self.focus_point).with_lens(self.lens)
    }
}

crate::impl_activatable!(OrbitalCamera {
    fn on_activated(&mut self) {
        self.current = self.target_pose();
    }
});

impl SceneCamera for OrbitalCamera {
    fn pose(&self) -> CameraPose {
        self.current
    }

    fn update(&mut self, input: &InputFrame, dt: f32) {
        if input.is_zooming && input.zoom_delta != 0.0 {
            self.distance *= 0.9f32.powf(input.zoom_delta);
            self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        }

        if input.look_delta != bevy::math::Vec2::ZERO {
            self.yaw -= input.look_delta.x * LOOK_SENSITIVITY;
            self.pitch -= input.look_delta.y * LOOK_SENSITIVITY;
            self.pitch = self.pitch.clamp(MIN_PITCH, MAX_PITCH);
        }

        if input.pan_delta != bevy::math::Vec2::ZERO {
            let sensitivity = self.distance * PAN_SENSITIVITY;
            let yaw_rot = Quat::from_rotation_y(self.yaw);
            let right = yaw_rot * Vec3::X;
            let forward = yaw_rot * Vec3::Z;
            self.focus_point += right * -input.pan_delta.x * sensitivity;
            self.focus_point += forward * -input.pan_delta.y * sensitivity;
        }

        let target = self.target_pose();
        let lerp_speed = (SMOOTHING * dt).min(1.0);
        self.current.position = self.current.position.lerp(target.position, lerp_speed);
        self.current.rotation = self.current.rotation.slerp(target.rotation, lerp_speed);
        self.current.lens = target.lens;
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        let offset = pose.position - self.focus_point;
        let distance = offset.length();
        if distance > f32::EPSILON {
            self.distance = distance.clamp(self.min_distance, self.max_distance);
            self.yaw = offset.x.atan2(offset.z);
            let horizontal = Vec3::new(offset.x, 0.0, offset.z).length();
            self.pitch = (-offset.y.atan2(horizontal)).clamp(MIN_PITCH, MAX_PITCH);
        }
        self.current = CameraPose {
            rotation: look_rotation(self.focus_point - pose.position),
            ..*pose
        };
    }
}
