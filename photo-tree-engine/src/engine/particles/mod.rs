//! Particle fields: the dense foliage that forms the tree and the ambient dust.
//!
//! Positions are generated once per field and never change. Every frame the
//! animator evaluates each particle as a pure function of time and morph
//! progress into reusable buffers, which are then expanded into camera-facing
//! quads inside a single mesh per field.

/// Field animator, colour categories and the cursor attractor.
pub mod field;

/// Random placement on the axis cross, the scatter sphere and the ornament band.
pub mod generators;

/// Quad expansion, mesh creation and the per-frame update systems.
pub mod render;

use crate::engine::core::app_state::{AppState, FrameSet};
use bevy::prelude::*;

use render::{DustAttractor, animate_particle_fields, spawn_particle_fields, update_dust_attractor};

pub struct ParticlePlugin;

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DustAttractor>()
            .add_systems(OnEnter(AppState::Running), spawn_particle_fields)
            .add_systems(
                Update,
                (
                    update_dust_attractor.in_set(FrameSet::Input),
                    animate_particle_fields.in_set(FrameSet::Animate),
                ),
            );
    }
}
