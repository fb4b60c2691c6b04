//! Viewport camera for the photo tree scene.
//!
//! The camera keeps a fixed viewing direction onto the scene origin; the
//! scene itself spins. Scroll wheel dollies between near and far limits.

/// Viewport camera resource, spawn and zoom controller.
pub mod viewport_camera;
