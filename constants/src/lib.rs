pub mod coordinate_system;
pub mod measurement;
pub mod path;
pub mod render_settings;
pub mod viewport;
