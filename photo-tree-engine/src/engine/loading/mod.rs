//! Startup loading for the photo tree scene.
//!
//! The app stays in `AppState::Loading` until the scene configuration asset
//! resolves, successfully or not.

/// Scene configuration asset, its sections and the loading systems.
///
/// Falls back to built-in defaults when the file is missing or malformed.
pub mod scene_config;
