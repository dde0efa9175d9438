pub mod camera;
pub mod core;
pub mod director;
pub mod entity;
pub mod input;
pub mod output;
pub mod render;
pub mod settings;
pub mod systems;
pub mod transition;
