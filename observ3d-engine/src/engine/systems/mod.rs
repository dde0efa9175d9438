//! Bevy systems hosting the director.
//!
//! Input sampling, per-frame director phases, replay of the composed frame
//! onto Bevy cameras, and the on-screen status line.

/// Director plugin and the per-frame update, compose and publish systems.
///
/// The director runs as a resource; each frame's events are re-published as
/// Bevy events for other plugins.
pub mod director_systems;

/// Mouse and keyboard sampling into `InputFrame`, plus director shortcuts.
pub mod input_sampling;

/// Status text and FPS notifications.
pub mod status_overlay;

/// Camera slots the composed frame is replayed onto.
pub mod view_slots;
