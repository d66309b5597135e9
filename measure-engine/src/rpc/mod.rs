//! JSON-RPC 2.0 communication layer for a web frontend hosting the engine.
//!
//! Implements bidirectional messaging between the Bevy engine and the host page
//! via iframe postMessage, supporting both request-response and notification patterns.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Request Handling
//!
//! `handle_rpc_request()` dispatches on the method name. Measurement requests
//! never touch the session directly: captures and resets are written to the
//! same `MeasureInput` stream as pointer and keyboard input, so the outcome
//! arrives later as a notification. Only `set_display_unit` edits settings in
//! place.
//!
//! ```json
//! { "jsonrpc": "2.0", "method": "capture_point", "params": { "x": 412, "y": 230 }, "id": 1 }
//! ```
//!
//! ## Sending Notifications from Bevy
//!
//! Use `WebRpcInterface::send_notification()` to push updates to the host:
//!
//! ```rust,ignore
//! fn announce_start(mut rpc: ResMut<WebRpcInterface>, start: Vec3) {
//!     rpc.send_notification("measure_started", json!({
//!         "position": start.to_array()
//!     }));
//! }
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (bad coordinates, unknown unit)
//! - `-32603`: Internal error (session not ready yet)
//!
//! Malformed messages are logged and dropped.
//!
//! ## Existing Methods
//!
//! ### Measurement
//! - `capture_point {x, y}`: Queue a capture at viewport coordinates
//! - `reset_measurement`: Queue an explicit reset
//! - `get_measurement`: Current phase, status, points, distance and prompt
//! - `set_display_unit {unit}`: Switch between `m`, `cm` and `in`
//!
//! ### Notifications
//! - `measure_started`: First point placed
//! - `measure_completed`: Second point placed, distance available
//! - `measure_clear`: Markers and segment removed
//! - `surface_detected`: Ground plane came into view
//! - `tracking_error`: Tracking interrupted or failed
//! - `tracking_restored`: Tracking resumed

/// JSON-RPC 2.0 bidirectional communication with the host page.
///
/// Handles request-response patterns, notifications and the WASM message listener.
pub mod web_rpc;
