//! JSON-RPC 2.0 remote control for the director.
//!
//! Exposes camera and output switching to an external controller. Raw JSON
//! text is pushed into [`remote_control::RemoteControl`] and serialized
//! replies are taken out. Web builds do this over `postMessage` with the
//! parent window; other hosts drive the queue themselves.
//!
//! ## Message Flow
//!
//! ```text
//! Controller                                  Viewer
//!     │                                          │
//!     ├─ Request (with ID) ────────────────────> │
//!     │                                          ├─ Run against Director
//!     │ <─────────────────── Response (with ID) ─┤
//!     │                                          │
//!     │ <──────────── Notification (no ID) ──────┤  camera_changed, ...
//! ```
//!
//! ## Methods
//!
//! - `get_cameras`, `get_outputs`: listed ids and the active one
//! - `activate_camera { id }`, `activate_output { id }`: switch immediately
//! - `deactivate_cameras`: leave no camera active
//! - `go_to_camera { id }`: fly to a camera
//! - `get_state`: active camera, output, flight and render size
//!
//! ## Notifications
//!
//! `camera_changed`, `output_changed`, `render_size_changed`,
//! `transition_completed`.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (including unknown ids)
//! - `-32603`: Internal error

pub mod remote_control;

#[cfg(target_arch = "wasm32")]
pub mod web_bridge;
