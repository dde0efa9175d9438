use bevy::math::{EulerRot, Quat, Vec3};
use constants::projection::{
    DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR, LENS_MATCH_MIN_DISTANCE, MAX_FOV_DEGREES,
    MIN_FOV_DEGREES,
};
use constants::render_settings::ALL_LAYERS;
use serde::{Deserialize, Serialize};

/// Projection of a camera: perspective by vertical field of view, or
/// orthographic by half the vertical extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Lens {
    Perspective { fov_degrees: f32 },
    Orthographic { size: f32 },
}

impl Lens {
    pub fn is_orthographic(&self) -> bool {
        matches!(self, Self::Orthographic { .. })
    }

    /// The lens of `target`'s kind framing the same extent at `distance`:
    /// half height `distance * tan(fov / 2)` one way, `2 * atan(size / distance)`
    /// the other. Same-kind lenses come back unchanged.
    pub fn matched_to(&self, target: &Lens, distance: f32) -> Lens {
        let distance = distance.max(LENS_MATCH_MIN_DISTANCE);
        match (self, target) {
            (Self::Perspective { fov_degrees }, Self::Orthographic { .. }) => Self::Orthographic {
                size: distance * (fov_degrees.to_radians() * 0.5).tan(),
            },
            (Self::Orthographic { size }, Self::Perspective { .. }) => Self::Perspective {
                fov_degrees: (2.0 * (size / distance).atan())
                    .to_degrees()
                    .clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES),
            },
            _ => *self,
        }
    }

    /// Interpolate towards `to`. Mixed projections snap to `to` at the end;
    /// match them with [`Lens::matched_to`] first for a smooth change.
    pub fn lerp(&self, to: &Lens, t: f32) -> Lens {
        match (self, to) {
            (Self::Perspective { fov_degrees: a }, Self::Perspective { fov_degrees: b }) => {
                Self::Perspective {
                    fov_degrees: a + (b - a) * t,
                }
            }
            (Self::Orthographic { size: a }, Self::Orthographic { size: b }) => {
                Self::Orthographic {
                    size: a + (b - a) * t,
                }
            }
            _ => {
                if t >= 1.0 {
                    *to
                } else {
                    *self
                }
            }
        }
    }
}

impl Default for Lens {
    fn default() -> Self {
        Self::Perspective {
            fov_degrees: DEFAULT_FOV_DEGREES,
        }
    }
}

/// Everything the render host needs to draw through a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub lens: Lens,
    pub near: f32,
    pub far: f32,
    pub culling_mask: u32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            lens: Lens::default(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            culling_mask: ALL_LAYERS,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, look_rotation(target - position))
    }

    pub fn with_lens(mut self, lens: Lens) -> Self {
        self.lens = lens;
        self
    }

    pub fn orthographic(size: f32) -> Self {
        Self {
            lens: Lens::Orthographic { size },
            ..Default::default()
        }
    }

    /// Camera looks down its local -Z axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.to_euler(EulerRot::YXZ).0
    }
}

/// Rotation whose -Z axis points along `direction`, with +Y kept up.
pub fn look_rotation(direction: Vec3) -> Quat {
    let Some(forward) = direction.try_normalize() else {
        return Quat::IDENTITY;
    };
    let up = if forward.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
    let right = up.cross(-forward).normalize();
    let corrected_up = (-forward).cross(right);
    Quat::from_mat3(&bevy::math::Mat3::from_cols(right, corrected_up, -forward))
}

/// Rotation looking straight down while keeping the given yaw.
pub fn top_down_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_rotation_points_forward() {
        let pose = CameraPose::looking_at(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert!(pose.forward().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_look_rotation_straight_down() {
        let rotation = look_rotation(Vec3::NEG_Y);
        assert!((rotation * Vec3::NEG_Z).abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn test_top_down_rotation_keeps_yaw() {
        let rotation = top_down_rotation(0.7);
        assert!((rotation * Vec3::NEG_Z).abs_diff_eq(Vec3::NEG_Y, 1e-5));
        let up = rotation * Vec3::Y;
        let expected = Quat::from_rotation_y(0.7) * Vec3::NEG_Z;
        assert!(up.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_lens_lerp() {
        let a = Lens::Perspective { fov_degrees: 40.0 };
        let b = Lens::Perspective { fov_degrees: 80.0 };
        assert_eq!(a.lerp(&b, 0.5), Lens::Perspective { fov_degrees: 60.0 });

        let ortho = Lens::Orthographic { size: 10.0 };
        assert_eq!(a.lerp(&ortho, 0.5), a);
        assert_eq!(a.lerp(&ortho, 1.0), ortho);
    }
}
