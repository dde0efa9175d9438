use constants::render_settings::{DEFAULT_SPLIT_COLUMNS, DEFAULT_SPLIT_YAW_STEP_DEGREES};

use super::{CameraBinding, OutputMode};
use crate::engine::entity::lifecycle::Lifecycle;
use crate::engine::render::pose::CameraPose;
use crate::engine::render::target::{RenderTarget, Viewport};

/// Equal-width columns, each showing the camera turned by a fixed yaw step.
///
/// The middle column looks straight ahead; columns to the left turn left.
pub struct SplitScreenOutput {
    lifecycle: Lifecycle,
    binding: CameraBinding,
    columns: u32,
    yaw_step_degrees: f32,
}

impl SplitScreenOutput {
    pub fn new(lifecycle: Lifecycle, columns: u32, yaw_step_degrees: f32) -> Self {
        Self {
            lifecycle,
            binding: CameraBinding::default(),
            columns: columns.max(1),
            yaw_step_degrees,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    fn column_viewport(&self, column: u32) -> Viewport {
        let width = 1.0 / self.columns as f32;
        Viewport::new(column as f32 * width, 0.0, width, 1.0)
    }

    /// Yaw of a column relative to the camera, positive turning left.
    fn column_yaw(&self, column: u32) -> f32 {
        let centre = (self.columns - 1) as f32 / 2.0;
        (centre - column as f32) * self.yaw_step_degrees.to_radians()
    }
}

impl Default for SplitScreenOutput {
    fn default() -> Self {
        Self::new(
            Lifecycle::new("split"),
            DEFAULT_SPLIT_COLUMNS,
            DEFAULT_SPLIT_YAW_STEP_DEGREES,
        )
    }
}

crate::impl_activatable!(SplitScreenOutput);

impl OutputMode for SplitScreenOutput {
    fn attach_to_camera(&mut self, camera: &CameraPose) {
        self.binding.attach(camera);
    }

    fn detach_from_camera(&mut self) {
        self.binding.detach();
    }

    fn render_image(&mut self, source: &CameraPose, destination: &mut dyn RenderTarget) {
        let rig = self.binding.follow(source);
        destination.set_active();
        for column in 0..self.columns {
            destination.draw_view(self.column_viewport(column), &rig.yawed(self.column_yaw(column)));
        }
    }

    fn render_gui(&mut self, target: &mut dyn RenderTarget) {
        target.draw_gui(Viewport::FULL);
    }

    fn is_attached(&self) -> bool {
        self.binding.is_attached()
    }
}
