//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, the loading to
//! running transition and the per-frame system ordering, for both native
//! and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app, registers the photo tree plugins and wires the
/// engine systems into their frame sets.
pub mod app_setup;

/// Application state machine and per-frame system sets.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
