/// Photo quad dimensions in world units.
pub const ORNAMENT_WIDTH: f32 = 1.0;
pub const ORNAMENT_HEIGHT: f32 = 1.2;
/// Pick volume depth used for ray tests against the quad.
pub const ORNAMENT_PICK_DEPTH: f32 = 0.05;

pub const ORNAMENT_SCALE_MIN: f32 = 0.8;
pub const ORNAMENT_SCALE_MAX: f32 = 1.2;
pub const GLOBAL_ORNAMENT_SCALE: f32 = 1.0;

pub const ORNAMENT_CHAOS_AMPLITUDE: f32 = 0.6;

/// Vertical float: base amplitude plus the extra applied while scattered.
pub const FLOAT_AMPLITUDE: f32 = 0.08;
pub const FLOAT_SCATTER_AMPLITUDE: f32 = 0.35;
pub const FLOAT_FREQUENCY: f32 = 1.1;

pub const PULSE_AMPLITUDE: f32 = 0.04;
pub const PULSE_FREQUENCY: f32 = 2.0;

/// Exponential follow rates (per second).
pub const IDLE_FOLLOW_RATE: f32 = 4.0;
pub const DRAG_FOLLOW_RATE: f32 = 20.0;
pub const OPACITY_RATE: f32 = 6.0;

pub const HOVER_SCALE: f32 = 1.15;
pub const DRAG_SCALE: f32 = 1.25;
pub const SCATTER_SHRINK: f32 = 0.75;

pub const SCATTERED_OPACITY: f32 = 0.7;
pub const TREE_OPACITY: f32 = 0.95;
pub const DRAG_OPACITY: f32 = 1.0;

/// Extra brightness while hovered or dragged.
pub const HOVER_GLOW: f32 = 0.6;

/// Two clicks closer than this (seconds) on the same ornament are a double click.
pub const DOUBLE_CLICK_WINDOW: f64 = 0.35;

/// Cursor travel (pixels) that turns a press into a drag.
pub const DRAG_SLOP_PX: f32 = 4.0;
