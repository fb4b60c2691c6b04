/// Per-frame multiplicative decay of the angular velocity.
pub const ROTATION_FRICTION: f32 = 0.95;

/// Radians per second the scene drifts at when nobody is driving it.
pub const IDLE_DRIFT_SPEED: f32 = 0.12;
/// Per-frame ease-in of the idle drift after input stops.
pub const IDLE_DRIFT_EASE: f32 = 0.02;

/// Angular velocity added per pixel of scene drag.
pub const DRAG_SENSITIVITY: f32 = 0.01;
/// Angular velocity added per unit of normalised hand x movement.
pub const GESTURE_SENSITIVITY: f32 = 6.0;
