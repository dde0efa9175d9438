//! Projection matrix construction, OpenGL clip conventions (-1..1 depth).
//!
//! Inputs outside the usable range are clamped and logged, never rejected.

use bevy::log::warn;
use bevy::math::{Mat4, Vec4};
use constants::projection::{FALLBACK_ASPECT, MAX_FOV_DEGREES, MIN_ASPECT, MIN_FOV_DEGREES};

/// Which eye of a stereo pair a view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Signed lateral offset of this eye for a given separation.
    pub fn offset(&self, separation: f32) -> f32 {
        match self {
            Self::Left => -separation * 0.5,
            Self::Right => separation * 0.5,
        }
    }
}

/// Clamp field of view into [MIN_FOV_DEGREES, MAX_FOV_DEGREES].
pub fn sanitize_fov(fov_degrees: f32) -> f32 {
    if !fov_degrees.is_finite() {
        warn!("Non-finite field of view {}, using {}", fov_degrees, MIN_FOV_DEGREES);
        return MIN_FOV_DEGREES;
    }
    if !(MIN_FOV_DEGREES..=MAX_FOV_DEGREES).contains(&fov_degrees) {
        let clamped = fov_degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
        warn!("Field of view {} out of range, clamped to {}", fov_degrees, clamped);
        return clamped;
    }
    fov_degrees
}

/// Replace near-zero or invalid aspect ratios with FALLBACK_ASPECT.
pub fn sanitize_aspect(aspect: f32) -> f32 {
    if !aspect.is_finite() || aspect < MIN_ASPECT {
        warn!("Aspect ratio {} unusable, using {}", aspect, FALLBACK_ASPECT);
        return FALLBACK_ASPECT;
    }
    aspect
}

fn sanitize_planes(near: f32, far: f32) -> (f32, f32) {
    let near = if near > 0.0 { near } else { 0.01 };
    let far = if far > near { far } else { near + 1.0 };
    (near, far)
}

/// Off-centre frustum projection.
pub fn off_axis(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let (near, far) = sanitize_planes(near, far);
    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -(2.0 * far * near) / (far - near);

    Mat4::from_cols(
        Vec4::new(x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y, 0.0, 0.0),
        Vec4::new(a, b, c, -1.0),
        Vec4::new(0.0, 0.0, d, 0.0),
    )
}

/// Symmetric perspective projection from a vertical field of view.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let fov = sanitize_fov(fov_degrees).to_radians();
    let aspect = sanitize_aspect(aspect);
    let top = near.max(0.01) * (fov * 0.5).tan();
    let right = top * aspect;
    off_axis(-right, right, -top, top, near, far)
}

/// Orthographic projection where `size` is half the vertical extent.
pub fn orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let aspect = sanitize_aspect(aspect);
    let size = if size > 0.0 { size } else { 1.0 };
    let (near, far) = sanitize_planes(near, far);
    let half_width = size * aspect;
    Mat4::orthographic_rh_gl(-half_width, half_width, -size, size, near, far)
}

/// Asymmetric frustum for one eye of a parallel-axis stereo rig.
///
/// Both frusta meet at the `convergence` plane, so objects at that distance
/// have zero parallax.
pub fn stereo_eye(
    eye: Eye,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    separation: f32,
    convergence: f32,
) -> Mat4 {
    let fov = sanitize_fov(fov_degrees).to_radians();
    let aspect = sanitize_aspect(aspect);
    let near = near.max(0.01);
    let convergence = if convergence > near { convergence } else { near * 2.0 };

    let top = near * (fov * 0.5).tan();
    let half_width = top * aspect;
    let shift = eye.offset(separation) * near / convergence;

    off_axis(-half_width - shift, half_width - shift, -top, top, near, far)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_matches_glam() {
        let ours = perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
        let glam = Mat4::perspective_rh_gl(60f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        assert!(ours.abs_diff_eq(glam, 1e-4));
    }

    #[test]
    fn test_fov_is_clamped() {
        assert_eq!(sanitize_fov(5.0), MIN_FOV_DEGREES);
        assert_eq!(sanitize_fov(179.0), MAX_FOV_DEGREES);
        assert_eq!(sanitize_fov(f32::NAN), MIN_FOV_DEGREES);
        assert_eq!(sanitize_fov(90.0), 90.0);

        let clamped = perspective(1.0, 1.0, 0.1, 100.0);
        let expected = perspective(MIN_FOV_DEGREES, 1.0, 0.1, 100.0);
        assert!(clamped.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_aspect_fallback() {
        assert_eq!(sanitize_aspect(0.0), FALLBACK_ASPECT);
        assert_eq!(sanitize_aspect(-2.0), FALLBACK_ASPECT);
        assert_eq!(sanitize_aspect(1.5), 1.5);
    }

    #[test]
    fn test_stereo_eyes_are_mirrored() {
        let left = stereo_eye(Eye::Left, 60.0, 1.0, 0.1, 100.0, 0.064, 10.0);
        let right = stereo_eye(Eye::Right, 60.0, 1.0, 0.1, 100.0, 0.064, 10.0);

        // The x skew term lives in column 2, row 0.
        let left_skew = left.z_axis.x;
        let right_skew = right.z_axis.x;
        assert!(left_skew > 0.0);
        assert!((left_skew + right_skew).abs() < 1e-6);
        assert!(left.x_axis.abs_diff_eq(right.x_axis, 1e-6));
    }

    #[test]
    fn test_zero_separation_is_symmetric() {
        let eye = stereo_eye(Eye::Left, 60.0, 1.5, 0.1, 100.0, 0.0, 10.0);
        let mono = perspective(60.0, 1.5, 0.1, 100.0);
        assert!(eye.abs_diff_eq(mono, 1e-5));
    }
}
