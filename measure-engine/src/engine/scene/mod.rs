//! Scene the viewport looks at: ground, grid overlay, a reference trunk
//! and lighting.

/// Ground surface and the detected-plane grid overlay.
pub mod ground;
