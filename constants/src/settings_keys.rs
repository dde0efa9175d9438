/// Settings key holding the kind of the last activated output.
pub const LAST_OUTPUT_KIND: &str = "output.last_kind";

/// Settings file used when the configuration does not name one.
pub const DEFAULT_SETTINGS_FILE: &str = "observ3d_settings.json";
