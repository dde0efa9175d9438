use bevy::math::{Vec3A, Vec4};
use bevy::prelude::*;
use bevy::render::camera::{
    CameraProjection, ClearColorConfig, ScalingMode, SubCameraView, Viewport as PhysicalViewport,
};
use bevy::render::view::RenderLayers;
use constants::render_settings::CLEAR_FRAME_COLOR;

use crate::engine::render::pose::Lens;
use crate::engine::render::projection::{sanitize_aspect, sanitize_fov};
use crate::engine::render::rig::CameraRig;
use crate::engine::render::target::RenderTarget;
use crate::engine::systems::director_systems::FrameTargets;

/// Render layer nothing in the scene lives on.
const CLEAR_SLOT_LAYER: usize = 31;

/// Bevy camera showing the n-th view of the composed frame.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSlot(pub usize);

/// Camera that renders nothing and only clears the window.
#[derive(Component)]
pub struct ClearSlot;

/// UI root hidden on GUI clear frames.
#[derive(Component)]
pub struct GuiRoot;

pub fn spawn_clear_slot(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            order: 0,
            is_active: false,
            clear_color: ClearColorConfig::Custom(CLEAR_FRAME_COLOR),
            ..default()
        },
        RenderLayers::layer(CLEAR_SLOT_LAYER),
        ClearSlot,
    ));
}

fn view_slot(index: usize) -> impl Bundle {
    (
        Camera3d::default(),
        Camera {
            order: index as isize + 1,
            is_active: false,
            ..default()
        },
        ViewSlot(index),
    )
}

/// Replay the composed image onto Bevy cameras, spawning slots as needed.
pub fn apply_frame_plan(
    mut commands: Commands,
    targets: Res<FrameTargets>,
    mut slots: Query<
        (
            Entity,
            &ViewSlot,
            &mut Camera,
            &mut Transform,
            &mut Projection,
            Option<&RenderLayers>,
        ),
        Without<ClearSlot>,
    >,
    mut clear_slots: Query<&mut Camera, (With<ClearSlot>, Without<ViewSlot>)>,
) {
    let plan = &targets.image;
    let (width, height) = (plan.width(), plan.height());
    if width == 0 || height == 0 {
        return;
    }

    let cleared = plan.cleared_with();
    for mut camera in &mut clear_slots {
        camera.is_active = cleared.is_some();
        if let Some(color) = cleared {
            camera.clear_color = ClearColorConfig::Custom(color);
        }
    }

    let views: Vec<_> = plan.views().collect();
    let mut present = vec![false; views.len()];

    for (entity, slot, mut camera, mut transform, mut projection, layers) in &mut slots {
        let Some((viewport, rig)) = views.get(slot.0) else {
            camera.is_active = false;
            continue;
        };
        present[slot.0] = true;

        let (physical_position, physical_size) = viewport.to_physical(width, height);
        camera.is_active = true;
        camera.order = slot.0 as isize + 1;
        camera.clear_color = ClearColorConfig::Custom(CLEAR_FRAME_COLOR);
        camera.viewport = Some(PhysicalViewport {
            physical_position,
            physical_size,
            ..default()
        });

        *transform = Transform::from_translation(rig.position).with_rotation(rig.rotation);
        *projection = projection_for(rig, viewport.aspect(width, height));

        let wanted = render_layers(rig.culling_mask);
        if layers != Some(&wanted) {
            commands.entity(entity).insert(wanted);
        }
    }

    for (index, _) in present.iter().enumerate().filter(|(_, present)| !**present) {
        debug!("Spawning view slot {}", index);
        commands.spawn(view_slot(index));
    }
}

/// Show the GUI layer only on frames where the output drew it.
pub fn apply_gui_plan(
    targets: Res<FrameTargets>,
    mut roots: Query<&mut Visibility, With<GuiRoot>>,
) {
    let visible = targets.gui.gui_viewports().next().is_some();
    for mut visibility in &mut roots {
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Asymmetric perspective frustum for Bevy's reverse-Z clip space.
///
/// Extents are slopes on the plane one unit in front of the camera, so the
/// frustum is independent of the near plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffAxisProjection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OffAxisProjection {
    /// Recover the frustum slopes of an OpenGL-style perspective matrix.
    pub fn from_gl(matrix: Mat4, near: f32, far: f32) -> Self {
        let (sx, sy) = (matrix.x_axis.x, matrix.y_axis.y);
        let (a, b) = (matrix.z_axis.x, matrix.z_axis.y);
        Self {
            left: (a - 1.0) / sx,
            right: (a + 1.0) / sx,
            bottom: (b - 1.0) / sy,
            top: (b + 1.0) / sy,
            near,
            far,
        }
    }

    fn corners_at(&self, z: f32) -> [Vec3A; 4] {
        let d = z.abs();
        [
            Vec3A::new(self.right * d, self.bottom * d, z),
            Vec3A::new(self.right * d, self.top * d, z),
            Vec3A::new(self.left * d, self.top * d, z),
            Vec3A::new(self.left * d, self.bottom * d, z),
        ]
    }
}

impl CameraProjection for OffAxisProjection {
    fn get_clip_from_view(&self) -> Mat4 {
        let width = self.right - self.left;
        let height = self.top - self.bottom;
        Mat4::from_cols(
            Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
            Vec4::new(
                (self.right + self.left) / width,
                (self.top + self.bottom) / height,
                0.0,
                -1.0,
            ),
            Vec4::new(0.0, 0.0, self.near, 0.0),
        )
    }

    // Sub views are not used by any output.
    fn get_clip_from_view_for_sub(&self, _sub_view: &SubCameraView) -> Mat4 {
        self.get_clip_from_view()
    }

    // Aspect is baked into the extents when the frame is composed.
    fn update(&mut self, _width: f32, _height: f32) {}

    fn far(&self) -> f32 {
        self.far
    }

    fn get_frustum_corners(&self, z_near: f32, z_far: f32) -> [Vec3A; 8] {
        let [a, b, c, d] = self.corners_at(z_near);
        let [e, f, g, h] = self.corners_at(z_far);
        [a, b, c, d, e, f, g, h]
    }
}

/// Bevy projection matching a rig's lens, or its explicit off-axis matrix
/// when it carries one.
pub fn projection_for(rig: &CameraRig, aspect: f32) -> Projection {
    if let Some(matrix) = rig.projection {
        return Projection::custom(OffAxisProjection::from_gl(matrix, rig.near, rig.far));
    }
    match rig.lens {
        Lens::Perspective { fov_degrees } => Projection::Perspective(PerspectiveProjection {
            fov: sanitize_fov(fov_degrees).to_radians(),
            aspect_ratio: sanitize_aspect(aspect),
            near: rig.near,
            far: rig.far,
        }),
        Lens::Orthographic { size } => Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: size * 2.0,
            },
            near: rig.near,
            far: rig.far,
            ..OrthographicProjection::default_3d()
        }),
    }
}

/// Layers set in a 32-bit culling mask.
pub fn render_layers(mask: u32) -> RenderLayers {
    let layers: Vec<usize> = (0..32).filter(|bit| mask & (1 << bit) != 0).collect();
    RenderLayers::from_layers(&layers)
}
