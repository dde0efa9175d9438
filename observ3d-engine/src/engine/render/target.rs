use bevy::color::Color;
use bevy::math::UVec2;

use super::rig::CameraRig;

/// Normalised sub-rectangle of a render target, origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const FULL: Viewport = Viewport {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Aspect ratio of this viewport on a target of the given pixel size.
    pub fn aspect(&self, target_width: u32, target_height: u32) -> f32 {
        let w = self.width * target_width as f32;
        let h = self.height * target_height as f32;
        if h <= 0.0 { 0.0 } else { w / h }
    }

    /// Pixel position and size on a target, clipped to it and never smaller
    /// than one pixel.
    pub fn to_physical(&self, target_width: u32, target_height: u32) -> (UVec2, UVec2) {
        let position = UVec2::new(
            ((self.x * target_width as f32).round() as u32).min(target_width.saturating_sub(1)),
            ((self.y * target_height as f32).round() as u32).min(target_height.saturating_sub(1)),
        );
        let size = UVec2::new(
            ((self.width * target_width as f32).round() as u32)
                .min(target_width.saturating_sub(position.x))
                .max(1),
            ((self.height * target_height as f32).round() as u32)
                .min(target_height.saturating_sub(position.y))
                .max(1),
        );
        (position, size)
    }
}

/// Destination of image and GUI composition.
pub trait RenderTarget {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Make this the target subsequent draws go to.
    fn set_active(&mut self) {}

    /// Fill the whole target.
    fn clear(&mut self, color: Color);

    /// Draw the scene through `rig` into `viewport`.
    fn draw_view(&mut self, viewport: Viewport, rig: &CameraRig);

    /// Draw the GUI layer into `viewport`.
    fn draw_gui(&mut self, viewport: Viewport);
}

/// A single recorded draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    View { viewport: Viewport, rig: CameraRig },
    Gui { viewport: Viewport },
}

/// Render target that records what was drawn into it this frame.
///
/// The host adapter replays the plan onto real cameras; tests inspect it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl FramePlan {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Forget the previous frame's commands.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Colour of the last clear, if the frame was cleared.
    pub fn cleared_with(&self) -> Option<Color> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    pub fn views(&self) -> impl Iterator<Item = (&Viewport, &CameraRig)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::View { viewport, rig } => Some((viewport, rig)),
            _ => None,
        })
    }

    pub fn gui_viewports(&self) -> impl Iterator<Item = &Viewport> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Gui { viewport } => Some(viewport),
            _ => None,
        })
    }
}

impl RenderTarget for FramePlan {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_view(&mut self, viewport: Viewport, rig: &CameraRig) {
        self.commands.push(DrawCommand::View {
            viewport,
            rig: *rig,
        });
    }

    fn draw_gui(&mut self, viewport: Viewport) {
        self.commands.push(DrawCommand::Gui { viewport });
    }
}
