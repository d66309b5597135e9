/// Measurement settings document, relative to the asset root.
pub const SETTINGS_PATH: &str = "measure_settings.json";
