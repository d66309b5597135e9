//! Viewport tracking: the ground-plane backend and the systems that turn
//! window and camera changes into tracking signals.

/// Ground-plane tracking backend and cursor ray-casting.
pub mod ground_tracker;

/// Surface detection, window focus and camera watchdog signal producers.
pub mod signals;
