pub const FOLIAGE_COUNT: usize = 18_000;
pub const DUST_COUNT: usize = 1_200;

/// Base colours indexed by colour category (linear RGB).
pub const FOLIAGE_PALETTE: [[f32; 3]; 3] = [
    [0.05, 0.55, 0.22], // deep green
    [0.95, 0.78, 0.25], // gold
    [0.85, 0.12, 0.18], // berry red
];
pub const DUST_PALETTE: [[f32; 3]; 3] = [
    [0.85, 0.9, 1.0],
    [1.0, 0.86, 0.55],
    [0.6, 0.75, 1.0],
];

/// Relative frequency of each colour category when a field is built.
pub const FOLIAGE_CATEGORY_WEIGHTS: [f32; 3] = [0.8, 0.12, 0.08];
pub const DUST_CATEGORY_WEIGHTS: [f32; 3] = [0.6, 0.25, 0.15];

/// World-space quad edge of a particle before multipliers.
pub const FOLIAGE_BASE_SIZE: f32 = 0.09;
pub const DUST_BASE_SIZE: f32 = 0.06;

/// Per-particle random size range (multiplies the base size).
pub const PARTICLE_SIZE_MIN: f32 = 0.6;
pub const PARTICLE_SIZE_MAX: f32 = 1.4;

/// Size multiplier at blend 0 and blend 1.
pub const SCATTER_SIZE_MULTIPLIER: f32 = 1.0;
pub const TREE_SIZE_MULTIPLIER: f32 = 0.65;

/// Peak outward displacement of the mid-morph burst.
pub const EXPLOSION_STRENGTH: f32 = 3.5;

/// Amplitude of the chaotic jitter while scattered.
pub const CHAOS_AMPLITUDE: f32 = 0.45;

/// Radial breathing while scattered.
pub const BREATH_AMPLITUDE: f32 = 0.3;
pub const BREATH_FREQUENCY: f32 = 0.8;

/// Relative brightness swing of the twinkle.
pub const TWINKLE_AMOUNT: f32 = 0.15;
pub const TWINKLE_FREQUENCY: f32 = 3.0;

/// Alpha at blend 0 and blend 1.
pub const SCATTERED_ALPHA: f32 = 0.7;
pub const TREE_ALPHA: f32 = 0.9;

/// Seconds a freshly created field takes to fade in from zero alpha.
pub const FADE_IN_SECONDS: f32 = 1.2;

/// Screen-space scale applied when converting a particle size to pixels.
pub const PERSPECTIVE_SCALE: f32 = 300.0;
pub const MAX_POINT_SIZE_PX: f32 = 64.0;

/// Dust attraction toward the cursor.
pub const DUST_ATTRACTION_RADIUS: f32 = 4.0;
pub const DUST_ATTRACTION_STRENGTH: f32 = 2.5;
pub const DUST_ATTRACTION_POWER: f32 = 1.5;
pub const DUST_ATTRACTION_SOFTENING: f32 = 0.25;
