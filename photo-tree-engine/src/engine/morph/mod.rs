//! Morph progress driver.
//!
//! Holds the single eased scalar every animator reads and turns UI, gesture
//! and RPC requests into target changes.

/// `MorphState`, the `MorphProgress` resource and its request handling systems.
pub mod progress;
