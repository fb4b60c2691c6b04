/// Half-length of each arm of the axis/cross tree shape.
pub const TREE_ARM_LENGTH: f32 = 6.0;

/// Radius of the spherical jitter added around every axis point.
pub const TREE_JITTER_RADIUS: f32 = 0.35;

/// Cross-section thickness of an axis arm.
pub const TREE_ARM_THICKNESS: f32 = 0.6;

/// Radius of the scattered cloud.
pub const SCATTER_RADIUS: f32 = 12.0;

/// Ring radius for photo ornament rest positions.
pub const ORNAMENT_RING_RADIUS: f32 = 4.5;

/// Width of the band the ornament ring occupies.
pub const ORNAMENT_BAND_WIDTH: f32 = 3.0;

/// Radius of the scattered positions used by ornaments.
pub const ORNAMENT_SCATTER_RADIUS: f32 = 9.0;

/// Dust rests on a wide shell around the tree and scatters further out.
pub const DUST_REST_RADIUS: f32 = 14.0;
pub const DUST_SCATTER_RADIUS: f32 = 20.0;

/// Lengths below this are treated as zero before normalising.
pub const MIN_NORMALISE_LENGTH: f32 = 1.0e-6;
