//! Two-point diameter measurement on the tracked ground.
//!
//! ## Event Flow
//!
//! Every producer writes a `MeasureInput`; `process_measure_events()` is the
//! only system that applies them, strictly in arrival order. Arming the
//! tracking session is the one exception: `start_tracking_session()` on
//! entering `Running` and `restart_failed_tracking()`, chained right after
//! the event system, call `MeasurementController::start` directly.
//!
//! ```text
//! Mouse / Touch / Keyboard ─┐
//! RPC (capture, reset) ─────┤
//! Window focus ─────────────┼─> MeasureInput ─> process_measure_events()
//! Surface detection ────────┤                      ├─> MeasurementController::handle
//! Viewport watchdog ────────┘                      ├─> spawn / despawn markers and segment
//!                                                  └─> RPC notification to the frontend
//! ```
//!
//! ## Controls
//!
//! - **Left click / tap**: Set the first point, then the second. A further
//!   tap clears the completed measurement.
//! - **`R` or `Escape`** (native only): Reset.
//! - The reticle follows the cursor on the ground while a point is awaited.
//!
//! ## Lifecycle
//!
//! - Focus loss interrupts tracking. With the default `discard` policy the
//!   points are cleared and tracking is re-armed from scratch on refocus.
//! - Losing the viewport camera fails the session; it restarts once the
//!   camera is back.

/// Pointer, touch and keyboard mapping onto the measurement event stream.
pub mod input;

/// Measure tool resource, event processing and frontend notifications.
pub mod measure;

/// Entity-backed markers, segment and capture reticle.
pub mod measure_visuals;
