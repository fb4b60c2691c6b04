use super::state::Ornament;
use crate::engine::loading::scene_config::OrnamentConfig;
use crate::engine::math::{follow_factor, safe_normalize, smoothstep};
use bevy::prelude::*;
use constants::ornament::*;

/// Shared per-frame inputs to the ornament animation.
#[derive(Debug, Clone, Copy)]
pub struct OrnamentClock {
    pub t: f32,
    pub dt: f32,
    pub progress: f32,
}

/// Parent-local translation and uniform scale for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentPose {
    pub translation: Vec3,
    pub scale: f32,
}

/// Position the ornament is heading to this frame, before follow smoothing.
/// An ornament being carried tracks its rest position directly, ignoring the
/// shared progress and the idle float. A press alone changes nothing here.
pub fn motion_target(ornament: &Ornament, clock: &OrnamentClock) -> Vec3 {
    let ease = if ornament.moving {
        1.0
    } else {
        smoothstep(0.0, 1.0, clock.progress)
    };
    let inverse = 1.0 - ease;
    let (t, phase) = (clock.t, ornament.phase);

    let chaos = Vec3::new(
        (t * 0.7 + phase).sin(),
        (t * 0.5 + phase * 1.3).cos(),
        (t * 0.6 + phase * 0.7).sin(),
    ) * ORNAMENT_CHAOS_AMPLITUDE
        * inverse;

    let float = if ornament.moving {
        Vec3::ZERO
    } else {
        let amplitude = FLOAT_SCATTER_AMPLITUDE + (FLOAT_AMPLITUDE - FLOAT_SCATTER_AMPLITUDE) * ease;
        Vec3::Y * (t * FLOAT_FREQUENCY + phase).sin() * amplitude
    };

    ornament
        .scatter_position
        .lerp(ornament.tree_position, ease)
        + chaos
        + float
}

/// Advance one ornament by a frame and return its pose.
pub fn step_ornament(
    ornament: &mut Ornament,
    clock: &OrnamentClock,
    params: &OrnamentConfig,
) -> OrnamentPose {
    let ease = smoothstep(0.0, 1.0, clock.progress);

    let target = motion_target(ornament, clock);
    let rate = if ornament.moving {
        params.drag_follow_rate
    } else {
        params.idle_follow_rate
    };
    ornament.position += (target - ornament.position) * follow_factor(rate, clock.dt);

    let pulse = 1.0 + PULSE_AMPLITUDE * (clock.t * PULSE_FREQUENCY + ornament.phase).sin();
    let feedback = if ornament.dragging {
        DRAG_SCALE
    } else if ornament.hovered {
        HOVER_SCALE
    } else {
        1.0
    };
    let shrink = SCATTER_SHRINK + (1.0 - SCATTER_SHRINK) * ease;

    let opacity_target = if ornament.dragging {
        DRAG_OPACITY
    } else {
        SCATTERED_OPACITY + (TREE_OPACITY - SCATTERED_OPACITY) * ease
    };
    ornament.opacity += (opacity_target - ornament.opacity) * follow_factor(OPACITY_RATE, clock.dt);

    OrnamentPose {
        translation: ornament.position,
        scale: ornament.base_scale * pulse * params.global_scale * feedback * shrink,
    }
}

/// Local rotation that turns a +Z facing quad toward the camera, given the
/// world rotation of its parent.
pub fn billboard_rotation(world_position: Vec3, camera_position: Vec3, parent_rotation: Quat) -> Quat {
    let away = safe_normalize(world_position - camera_position, Vec3::NEG_Z);
    let up = if away.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let world = Transform::IDENTITY.looking_to(away, up).rotation;
    parent_rotation.inverse() * world
}
