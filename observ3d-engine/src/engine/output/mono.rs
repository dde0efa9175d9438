use super::{CameraBinding, OutputMode};
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::render::pose::CameraPose;
use crate::engine::render::target::{RenderTarget, Viewport};

/// Plain 2D output: the camera fills the whole target.
pub struct MonoOutput {
    lifecycle: Lifecycle,
    binding: CameraBinding,
}

impl MonoOutput {
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self {
            lifecycle,
            binding: CameraBinding::default(),
        }
    }
}

impl Default for MonoOutput {
    fn default() -> Self {
        Self::new(Lifecycle::new("mono").as_default())
    }
}

crate::impl_activatable!(MonoOutput);

impl OutputMode for MonoOutput {
    fn attach_to_camera(&mut self, camera: &CameraPose) {
        self.binding.attach(camera);
    }

    fn detach_from_camera(&mut self) {
        self.binding.detach();
    }

    fn render_image(&mut self, source: &CameraPose, destination: &mut dyn RenderTarget) {
        let rig = self.binding.follow(source);
        destination.set_active();
        destination.draw_view(Viewport::FULL, &rig);
    }

    fn render_gui(&mut self, target: &mut dyn RenderTarget) {
        target.draw_gui(Viewport::FULL);
    }

    fn is_attached(&self) -> bool {
        self.binding.is_attached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render::target::FramePlan;
    use bevy::math::{Quat, Vec3};

    #[test]
    fn test_single_full_view() {
        let mut output = MonoOutput::default();
        let pose = CameraPose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        output.attach_to_camera(&pose);
        assert!(output.is_attached());

        let mut plan = FramePlan::new(640, 480);
        output.render_image(&pose, &mut plan);

        let views: Vec<_> = plan.views().collect();
        assert_eq!(views.len(), 1);
        assert_eq!(*views[0].0, Viewport::FULL);
        assert_eq!(views[0].1.position, pose.position);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let mut output = MonoOutput::default();
        output.detach_from_camera();
        assert!(!output.is_attached());
        output.attach_to_camera(&CameraPose::default());
        output.detach_from_camera();
        output.detach_from_camera();
        assert!(!output.is_attached());
    }
}
