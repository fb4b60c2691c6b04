//! Scene graph root and its spin.
//!
//! Every particle field and ornament hangs off a single `SceneRoot` entity
//! whose Y rotation is driven by scene drag, hand movement and idle drift.

/// Rotation controller resource, its pure step function and the frame system.
pub mod rotation;
