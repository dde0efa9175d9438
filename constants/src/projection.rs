/// Smallest vertical field of view accepted by projection builders (degrees).
pub const MIN_FOV_DEGREES: f32 = 10.0;

/// Largest vertical field of view accepted by projection builders (degrees).
pub const MAX_FOV_DEGREES: f32 = 170.0;

/// Aspect ratios below this are replaced by `FALLBACK_ASPECT`.
pub const MIN_ASPECT: f32 = 1e-3;

pub const FALLBACK_ASPECT: f32 = 1.0;

pub const DEFAULT_FOV_DEGREES: f32 = 60.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 5_000.0;
pub const DEFAULT_ORTHOGRAPHIC_SIZE: f32 = 50.0;

/// Closest subject distance used when matching a perspective lens to an
/// orthographic one (scene units).
pub const LENS_MATCH_MIN_DISTANCE: f32 = 1.0;

/// Default distance between the eyes of a stereo rig (scene units).
pub const DEFAULT_EYE_SEPARATION: f32 = 0.064;

/// Default zero-parallax distance of a stereo rig (scene units).
pub const DEFAULT_CONVERGENCE: f32 = 10.0;
