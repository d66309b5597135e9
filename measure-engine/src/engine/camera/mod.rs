//! Viewport camera for walking around the scene.
//!
//! Right-drag looks around, WASD/QE moves and the wheel dollies along the view.

/// Viewport camera resource and controller system.
pub mod viewport_camera;
