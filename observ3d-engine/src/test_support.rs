//! Recording entities shared by unit tests.

use std::sync::{Arc, Mutex};

use bevy::math::{Quat, Vec3};

use crate::engine::camera::SceneCamera;
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::input::InputFrame;
use crate::engine::output::OutputMode;
use crate::engine::render::pose::CameraPose;
use crate::engine::render::target::{RenderTarget, Viewport};

/// Bare activatable that records its hook calls.
pub struct Recorder {
    lifecycle: Lifecycle,
    pub hooks: Vec<&'static str>,
}

impl Recorder {
    pub fn new(id: &str) -> Self {
        Self::with_lifecycle(Lifecycle::new(id))
    }

    pub fn with_lifecycle(lifecycle: Lifecycle) -> Self {
        Self {
            lifecycle,
            hooks: Vec::new(),
        }
    }
}

crate::impl_activatable!(Recorder {
    fn on_pre_activate(&mut self) {
        self.hooks.push("pre_activate");
    }

    fn on_activated(&mut self) {
        self.hooks.push("activated");
    }

    fn on_deactivated(&mut self) {
        self.hooks.push("deactivated");
    }
});

/// Camera parked at a fixed pose, counting updates.
pub struct RecordingCamera {
    lifecycle: Lifecycle,
    pub pose: CameraPose,
    pub updates: u32,
}

impl RecordingCamera {
    pub fn at(id: &str, position: Vec3) -> Self {
        Self {
            lifecycle: Lifecycle::new(id),
            pose: CameraPose::new(position, Quat::IDENTITY),
            updates: 0,
        }
    }
}

crate::impl_activatable!(RecordingCamera);

impl SceneCamera for RecordingCamera {
    fn pose(&self) -> CameraPose {
        self.pose
    }

    fn update(&mut self, _input: &InputFrame, _dt: f32) {
        self.updates += 1;
    }
}

/// Calls made on recording outputs, as `<id>:<call>`, across every output.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Output that records attach and detach calls.
pub struct RecordingOutput {
    lifecycle: Lifecycle,
    log: CallLog,
    attached: bool,
}

impl RecordingOutput {
    pub fn new(id: &str, log: &CallLog) -> Self {
        Self {
            lifecycle: Lifecycle::new(id),
            log: log.clone(),
            attached: false,
        }
    }

    fn record(&self, call: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.lifecycle.id(), call));
    }
}

crate::impl_activatable!(RecordingOutput);

impl OutputMode for RecordingOutput {
    fn attach_to_camera(&mut self, _camera: &CameraPose) {
        self.attached = true;
        self.record("attach");
    }

    fn detach_from_camera(&mut self) {
        self.attached = false;
        self.record("detach");
    }

    fn render_image(&mut self, source: &CameraPose, destination: &mut dyn RenderTarget) {
        destination.draw_view(
            Viewport::FULL,
            &crate::engine::render::rig::CameraRig::from_pose(source),
        );
    }

    fn render_gui(&mut self, target: &mut dyn RenderTarget) {
        target.draw_gui(Viewport::FULL);
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
