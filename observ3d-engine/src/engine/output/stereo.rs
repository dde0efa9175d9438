use serde::{Deserialize, Serialize};

use super::{CameraBinding, OutputMode};
use crate::config::StereoConfig;
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::render::pose::CameraPose;
use crate::engine::render::projection::Eye;
use crate::engine::render::target::{RenderTarget, Viewport};

/// How the two eye images share the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StereoLayout {
    #[default]
    SideBySide,
    TopBottom,
}

impl StereoLayout {
    pub fn viewport(&self, eye: Eye) -> Viewport {
        let first = matches!(eye, Eye::Left);
        match self {
            StereoLayout::SideBySide => {
                Viewport::new(if first { 0.0 } else { 0.5 }, 0.0, 0.5, 1.0)
            }
            StereoLayout::TopBottom => {
                Viewport::new(0.0, if first { 0.0 } else { 0.5 }, 1.0, 0.5)
            }
        }
    }
}

/// Stereo pair with off-axis eye frustums.
pub struct StereoOutput {
    lifecycle: Lifecycle,
    binding: CameraBinding,
    pub layout: StereoLayout,
    pub stereo: StereoConfig,
}

impl StereoOutput {
    pub fn new(lifecycle: Lifecycle, layout: StereoLayout, stereo: StereoConfig) -> Self {
        Self {
            lifecycle,
            binding: CameraBinding::default(),
            layout,
            stereo,
        }
    }
}

crate::impl_activatable!(StereoOutput);

impl OutputMode for StereoOutput {
    fn attach_to_camera(&mut self, camera: &CameraPose) {
        self.binding.attach(camera);
    }

    fn detach_from_camera(&mut self) {
        self.binding.detach();
    }

    fn render_image(&mut self, source: &CameraPose, destination: &mut dyn RenderTarget) {
        let rig = self.binding.follow(source);
        destination.set_active();
        for eye in [Eye::Left, Eye::Right] {
            let viewport = self.layout.viewport(eye);
            let aspect = viewport.aspect(destination.width(), destination.height());
            let eye_rig = rig.for_eye(
                eye,
                self.stereo.eye_separation,
                self.stereo.convergence,
                aspect,
            );
            destination.draw_view(viewport, &eye_rig);
        }
    }

    fn render_gui(&mut self, target: &mut dyn RenderTarget) {
        for eye in [Eye::Left, Eye::Right] {
            target.draw_gui(self.layout.viewport(eye));
        }
    }

    fn is_attached(&self) -> bool {
        self.binding.is_attached()
    }
}
