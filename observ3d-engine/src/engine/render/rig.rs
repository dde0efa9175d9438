use bevy::math::{Mat4, Quat, Vec3};

use super::pose::{CameraPose, Lens};
use super::projection::{self, Eye};

/// The exact set of camera fields an output copies onto the views it draws.
///
/// Outputs never clone a camera wholesale; they build one of these per view
/// and, for stereo or multi-screen layouts, adjust it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub rotation: Quat,
    pub lens: Lens,
    pub near: f32,
    pub far: f32,
    pub culling_mask: u32,
    /// Explicit projection overriding the one implied by `lens`.
    pub projection: Option<Mat4>,
}

impl CameraRig {
    pub fn from_pose(pose: &CameraPose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            lens: pose.lens,
            near: pose.near,
            far: pose.far,
            culling_mask: pose.culling_mask,
            projection: None,
        }
    }

    /// Projection for a viewport with the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        if let Some(matrix) = self.projection {
            return matrix;
        }
        match self.lens {
            Lens::Perspective { fov_degrees } => {
                projection::perspective(fov_degrees, aspect, self.near, self.far)
            }
            Lens::Orthographic { size } => {
                projection::orthographic(size, aspect, self.near, self.far)
            }
        }
    }

    /// Rig for one eye: shifted sideways along the camera's right axis with an
    /// off-axis frustum converging at `convergence`.
    pub fn for_eye(&self, eye: Eye, separation: f32, convergence: f32, aspect: f32) -> Self {
        let right = self.rotation * Vec3::X;
        let mut rig = *self;
        rig.position += right * eye.offset(separation);
        if let Lens::Perspective { fov_degrees } = self.lens {
            rig.projection = Some(projection::stereo_eye(
                eye,
                fov_degrees,
                aspect,
                self.near,
                self.far,
                separation,
                convergence,
            ));
        }
        rig
    }

    /// Same rig turned about the world up axis.
    pub fn yawed(&self, radians: f32) -> Self {
        let mut rig = *self;
        rig.rotation = Quat::from_rotation_y(radians) * self.rotation;
        rig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pose_copies_fields() {
        let pose = CameraPose {
            culling_mask: 0b101,
            near: 0.5,
            ..CameraPose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.3))
        };
        let rig = CameraRig::from_pose(&pose);
        assert_eq!(rig.position, pose.position);
        assert_eq!(rig.rotation, pose.rotation);
        assert_eq!(rig.culling_mask, 0b101);
        assert_eq!(rig.near, 0.5);
        assert!(rig.projection.is_none());
    }

    #[test]
    fn test_eye_rigs_are_separated() {
        let rig = CameraRig::from_pose(&CameraPose::default());
        let left = rig.for_eye(Eye::Left, 0.1, 10.0, 1.0);
        let right = rig.for_eye(Eye::Right, 0.1, 10.0, 1.0);

        assert!((right.position - left.position).abs_diff_eq(Vec3::X * 0.1, 1e-6));
        assert!(left.projection.is_some());
        assert_ne!(left.projection, right.projection);
    }

    #[test]
    fn test_orthographic_eye_keeps_lens_projection() {
        let rig = CameraRig::from_pose(&CameraPose::orthographic(20.0));
        let left = rig.for_eye(Eye::Left, 0.1, 10.0, 1.0);
        assert!(left.projection.is_none());
    }
}
