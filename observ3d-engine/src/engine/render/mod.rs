//! Render host abstraction.
//!
//! Camera poses, the copyable rig descriptor outputs draw with, projection
//! matrix construction, and the `RenderTarget` seam the compositor writes to.

/// Camera pose and lens types.
pub mod pose;

/// Perspective, orthographic and off-axis stereo projection matrices.
pub mod projection;

/// Per-view camera rig descriptor.
pub mod rig;

/// Render targets and the recording `FramePlan`.
pub mod target;
