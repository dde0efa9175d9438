use bevy::math::{Quat, Vec3};

use super::SceneCamera;
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::input::InputFrame;
use crate::engine::render::pose::{CameraPose, Lens};

/// One point on an animated camera path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Seconds from the start of the path.
    pub time: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub lens: Lens,
}

/// Plays back a keyframed path, restarting on activation.
pub struct AnimatedCamera {
    lifecycle: Lifecycle,
    keyframes: Vec<Keyframe>,
    pub looping: bool,
    elapsed: f32,
}

impl AnimatedCamera {
    /// Keyframes are sorted by time.
    pub fn new(lifecycle: Lifecycle, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            lifecycle,
            keyframes,
            looping: true,
            elapsed: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn sample(&self, time: f32) -> CameraPose {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return CameraPose::default();
        };
        if time <= first.time {
            return pose_of(first);
        }
        if time >= last.time {
            return pose_of(last);
        }

        let next = self
            .keyframes
            .iter()
            .position(|k| k.time > time)
            .unwrap_or(self.keyframes.len() - 1);
        let a = &self.keyframes[next - 1];
        let b = &self.keyframes[next];
        let span = (b.time - a.time).max(f32::EPSILON);
        let t = ((time - a.time) / span).clamp(0.0, 1.0);

        CameraPose::new(a.position.lerp(b.position, t), a.rotation.slerp(b.rotation, t))
            .with_lens(a.lens.lerp(&b.lens, t))
    }
}

fn pose_of(keyframe: &Keyframe) -> CameraPose {
    CameraPose::new(keyframe.position, keyframe.rotation).with_lens(keyframe.lens)
}

crate::impl_activatable!(AnimatedCamera {
    fn on_activated(&mut self) {
        self.elapsed = 0.0;
    }
});

impl SceneCamera for AnimatedCamera {
    fn pose(&self) -> CameraPose {
        self.sample(self.elapsed)
    }

    fn update(&mut self, _input: &InputFrame, dt: f32) {
        let duration = self.duration();
        self.elapsed += dt;
        if duration <= 0.0 {
            self.elapsed = 0.0;
        } else if self.looping {
            self.elapsed %= duration;
        } else {
            self.elapsed = self.elapsed.min(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Vec<Keyframe> {
        vec![
            Keyframe {
                time: 2.0,
                position: Vec3::new(10.0, 0.0, 0.0),
                rotation: Quat::IDENTITY,
                lens: Lens::Perspective { fov_degrees: 80.0 },
            },
            Keyframe {
                time: 0.0,
                position: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                lens: Lens::Perspective { fov_degrees: 40.0 },
            },
        ]
    }

    #[test]
    fn test_samples_between_keyframes() {
        let mut camera = AnimatedCamera::new(Lifecycle::new("tour"), path());
        camera.update(&InputFrame::default(), 1.0);

        let pose = camera.pose();
        assert!(pose.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
        assert_eq!(pose.lens, Lens::Perspective { fov_degrees: 60.0 });
    }

    #[test]
    fn test_loops_and_clamps() {
        let mut looping = AnimatedCamera::new(Lifecycle::new("tour"), path());
        looping.update(&InputFrame::default(), 2.5);
        assert!((looping.elapsed() - 0.5).abs() < 1e-5);

        let mut clamped = AnimatedCamera::new(Lifecycle::new("tour"), path());
        clamped.looping = false;
        clamped.update(&InputFrame::default(), 5.0);
        assert_eq!(clamped.elapsed(), 2.0);
        assert_eq!(clamped.pose().position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_path_is_default_pose() {
        let camera = AnimatedCamera::new(Lifecycle::new("tour"), Vec::new());
        assert_eq!(camera.pose(), CameraPose::default());
    }
}
