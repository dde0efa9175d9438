/// Shared tuning values for the viewer workspace.
pub mod projection;
pub mod render_settings;
pub mod settings_keys;
pub mod transition;
