//! Tuning constants shared by the photo tree engine.
//!
//! Runtime configuration (`SceneConfig`) falls back to these values for any
//! field it does not override.

pub mod gesture;
pub mod layout;
pub mod morph;
pub mod ornament;
pub mod particles;
pub mod path;
pub mod render_settings;
pub mod rotation;
