//! Runtime diagnostics.

/// FPS tracking and scene stats notifications.
///
/// Sends frame rate and morph summaries to the frontend via RPC and updates
/// the native overlay text.
pub mod fps_tracking;
