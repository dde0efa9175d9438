//! Output modes.
//!
//! An output decides how the active camera's view is laid out on the final
//! image: one view, two eyes, or a row of screens. Exactly one output is
//! active at a time and it is attached to the active camera.

use crate::engine::entity::lifecycle::Activatable;
use crate::engine::render::pose::CameraPose;
use crate::engine::render::rig::CameraRig;
use crate::engine::render::target::RenderTarget;

/// Single full-frame view.
pub mod mono;

/// Row of yaw-offset views for multi-screen walls.
pub mod split_screen;

/// Side-by-side or top-bottom stereo pair.
pub mod stereo;

/// An output entity the coordinator switches between.
pub trait OutputMode: Activatable {
    /// Bind to the camera that just became active.
    fn attach_to_camera(&mut self, camera: &CameraPose);

    /// Release the camera binding. Calling it while detached is a no-op.
    fn detach_from_camera(&mut self);

    /// Compose the scene as seen from `source` into `destination`.
    fn render_image(&mut self, source: &CameraPose, destination: &mut dyn RenderTarget);

    /// Compose the GUI layer into `target`.
    fn render_gui(&mut self, target: &mut dyn RenderTarget);

    fn is_attached(&self) -> bool;
}

/// Camera binding shared by the output implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraBinding {
    rig: Option<CameraRig>,
}

impl CameraBinding {
    pub fn attach(&mut self, camera: &CameraPose) {
        self.rig = Some(CameraRig::from_pose(camera));
    }

    pub fn detach(&mut self) {
        self.rig = None;
    }

    pub fn is_attached(&self) -> bool {
        self.rig.is_some()
    }

    /// Refresh the bound rig from the live camera pose and return it.
    pub fn follow(&mut self, source: &CameraPose) -> CameraRig {
        let rig = CameraRig::from_pose(source);
        if self.rig.is_some() {
            self.rig = Some(rig);
        }
        rig
    }

    pub fn rig(&self) -> Option<&CameraRig> {
        self.rig.as_ref()
    }
}
