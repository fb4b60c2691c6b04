//! JSON-RPC 2.0 communication layer for the hosting web page.
//!
//! Implements bidirectional messaging between the Bevy engine and the page
//! UI via iframe postMessage, supporting both request-response and
//! notification patterns.
//!
//! ## Message Flow
//!
//! ```text
//! Page (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Decode to RpcCommand, write events
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        ├─ hand_landmarks (no ID) ─────────────> │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! Requests are decoded by `parse_command` and turned into the same events
//! the keyboard shortcuts and gesture systems use, so every input path goes
//! through one code path inside the engine.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! ### Morph
//! - `set_morph_state {state}`: `"axis_shape"` or `"scattered"`
//! - `toggle_morph_state`: flip the current target
//!
//! ### Photos
//! - `set_photos {sources}`: replace the list, diffed by source identity
//! - `add_photo {source}` / `remove_photo {source}`
//!
//! ### Gesture
//! - `set_gesture_tracking {enabled}`: start or stop landmark capture
//! - `hand_landmarks {hands}`: one landmark frame, sent as a notification
//!
//! ### Queries
//! - `get_scene_state`: progress, target, photos, tracking and drag flags
//! - `get_fps`: current frame rate
//!
//! ## Notifications
//!
//! - `morph_state_changed {state, source}`
//! - `drag_state_changed {dragging}`
//! - `photo_clicked {source}`
//! - `gesture_tracking_changed {enabled}`
//! - `scene_stats {fps, progress, ornaments}`

/// JSON-RPC 2.0 bidirectional communication system for the page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
