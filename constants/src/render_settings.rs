use bevy::math::Vec3;

pub const CAMERA_START: Vec3 = Vec3::new(0.0, 2.0, 22.0);
pub const CAMERA_FOCUS: Vec3 = Vec3::ZERO;

pub const CAMERA_MIN_DISTANCE: f32 = 8.0;
pub const CAMERA_MAX_DISTANCE: f32 = 45.0;
pub const CAMERA_ZOOM_SPEED: f32 = 1.5;
pub const CAMERA_ZOOM_EASE: f32 = 10.0;

pub const BACKGROUND_COLOUR: [f32; 3] = [0.01, 0.02, 0.04];

/// Seconds between `scene_stats` notifications.
pub const STATS_INTERVAL: f32 = 0.5;
