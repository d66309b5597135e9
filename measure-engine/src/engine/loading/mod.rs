//! Settings loading before the measurement session starts.

/// JSON settings asset loading with fallback to defaults.
pub mod settings_loader;
