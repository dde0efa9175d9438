/// Seconds spent on a direct flight, and on each leg of a deviated one.
pub const TRANSITION_TIME: f32 = 2.0;

/// Altitude reached by the climb leg of a deviated transition.
pub const TRANSITION_ANIMATION_Y: f32 = 100.0;

/// Pause between the legs of a deviated transition (seconds).
pub const TRANSITION_WAIT: f32 = 0.5;

/// Maximum raycast length used by the occlusion heuristic.
pub const TRANSITION_RAYCAST_MAX_DISTANCE: f32 = 10_000.0;

/// Below this distance origin and destination are treated as the same point.
pub const TRANSITION_MIN_DISTANCE: f32 = 1e-4;
