//! Interactive tools layered on the engine.

/// Hand landmark capture and gesture classification.
pub mod gesture;

/// Draggable photo billboards.
pub mod ornaments;
