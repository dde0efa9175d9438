use bevy::color::Color;

/// Colour written by the compositor for the single frame after an output switch,
/// and whenever no output or camera is available.
pub const CLEAR_FRAME_COLOR: Color = Color::BLACK;

/// Number of columns used by the split screen output when none is configured.
pub const DEFAULT_SPLIT_COLUMNS: u32 = 3;

/// Yaw offset between neighbouring split screen columns (degrees).
pub const DEFAULT_SPLIT_YAW_STEP_DEGREES: f32 = 60.0;

/// Culling mask that renders every layer.
pub const ALL_LAYERS: u32 = u32::MAX;
