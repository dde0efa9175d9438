/// Per-frame composition state of the output coordinator.
///
/// Each clear flag is raised on every output switch and consumed by the next
/// render of its layer, whether that render clears or delegates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compositor {
    render_width: u32,
    render_height: u32,
    clear_image: bool,
    clear_gui: bool,
}

impl Compositor {
    pub fn render_size(&self) -> (u32, u32) {
        (self.render_width, self.render_height)
    }

    /// Record the destination size; true when it differs from last frame.
    pub fn track_size(&mut self, width: u32, height: u32) -> bool {
        if (width, height) == self.render_size() {
            return false;
        }
        self.render_width = width;
        self.render_height = height;
        true
    }

    pub fn request_clear(&mut self) {
        self.clear_image = true;
        self.clear_gui = true;
    }

    pub fn take_image_clear(&mut self) -> bool {
        std::mem::take(&mut self.clear_image)
    }

    pub fn take_gui_clear(&mut self) -> bool {
        std::mem::take(&mut self.clear_gui)
    }
}
