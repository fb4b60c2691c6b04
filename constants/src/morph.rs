/// Fraction of the remaining distance covered per second by the morph driver.
/// The per-frame step is clamped to 1 so long frames never overshoot.
pub const MORPH_EASE_RATE: f32 = 2.0;

/// Progress the scene starts at (fully scattered).
pub const INITIAL_PROGRESS: f32 = 0.0;
