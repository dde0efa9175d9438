//! Scene cameras ("moving modes").
//!
//! Each camera owns its own pose controller; only the active camera receives
//! input. The hidden transition camera flies between the others.

use crate::engine::entity::lifecycle::Activatable;
use crate::engine::input::InputFrame;
use crate::engine::render::pose::CameraPose;

/// Keyframed path playback.
pub mod animated;

/// Free-flying first person camera.
pub mod first_person;

/// Orthographic top-down map camera.
pub mod map;

/// Orbit around a focus point with zoom-controlled distance.
pub mod orbital;

/// Fixed-position look-around camera.
pub mod panoramic;

/// Hidden camera animating between two poses.
pub mod transition;

/// A camera entity the single-active coordinator switches between.
pub trait SceneCamera: Activatable {
    /// Current render pose.
    fn pose(&self) -> CameraPose;

    /// Advance the camera's controller by one frame.
    fn update(&mut self, _input: &InputFrame, _dt: f32) {}

    /// Jump to a pose, where the controller can express it.
    fn set_pose(&mut self, _pose: &CameraPose) {}
}
