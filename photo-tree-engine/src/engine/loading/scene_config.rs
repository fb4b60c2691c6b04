use crate::engine::core::app_state::AppState;
use crate::engine::morph::progress::MorphState;
use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::SCENE_CONFIG_PATH;
use constants::{layout, morph, ornament, particles, rotation};
use serde::{Deserialize, Serialize};

/// Population and motion tuning for both particle fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub foliage_count: usize,
    pub dust_count: usize,
    pub explosion_strength: f32,
    pub chaos_amplitude: f32,
    pub breath_amplitude: f32,
    pub dust_attraction_radius: f32,
    pub dust_attraction_strength: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            foliage_count: particles::FOLIAGE_COUNT,
            dust_count: particles::DUST_COUNT,
            explosion_strength: particles::EXPLOSION_STRENGTH,
            chaos_amplitude: particles::CHAOS_AMPLITUDE,
            breath_amplitude: particles::BREATH_AMPLITUDE,
            dust_attraction_radius: particles::DUST_ATTRACTION_RADIUS,
            dust_attraction_strength: particles::DUST_ATTRACTION_STRENGTH,
        }
    }
}

/// Extents of the tree, scatter cloud and ornament ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub tree_arm_length: f32,
    pub tree_jitter_radius: f32,
    pub tree_arm_thickness: f32,
    pub scatter_radius: f32,
    pub ornament_ring_radius: f32,
    pub ornament_band_width: f32,
    pub ornament_scatter_radius: f32,
    pub dust_rest_radius: f32,
    pub dust_scatter_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tree_arm_length: layout::TREE_ARM_LENGTH,
            tree_jitter_radius: layout::TREE_JITTER_RADIUS,
            tree_arm_thickness: layout::TREE_ARM_THICKNESS,
            scatter_radius: layout::SCATTER_RADIUS,
            ornament_ring_radius: layout::ORNAMENT_RING_RADIUS,
            ornament_band_width: layout::ORNAMENT_BAND_WIDTH,
            ornament_scatter_radius: layout::ORNAMENT_SCATTER_RADIUS,
            dust_rest_radius: layout::DUST_REST_RADIUS,
            dust_scatter_radius: layout::DUST_SCATTER_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub ease_rate: f32,
    pub start_state: MorphState,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            ease_rate: morph::MORPH_EASE_RATE,
            start_state: MorphState::Scattered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub friction: f32,
    pub idle_drift_speed: f32,
    pub idle_drift_ease: f32,
    pub drag_sensitivity: f32,
    pub gesture_sensitivity: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            friction: rotation::ROTATION_FRICTION,
            idle_drift_speed: rotation::IDLE_DRIFT_SPEED,
            idle_drift_ease: rotation::IDLE_DRIFT_EASE,
            drag_sensitivity: rotation::DRAG_SENSITIVITY,
            gesture_sensitivity: rotation::GESTURE_SENSITIVITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrnamentConfig {
    pub global_scale: f32,
    pub idle_follow_rate: f32,
    pub drag_follow_rate: f32,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            global_scale: ornament::GLOBAL_ORNAMENT_SCALE,
            idle_follow_rate: ornament::IDLE_FOLLOW_RATE,
            drag_follow_rate: ornament::DRAG_FOLLOW_RATE,
        }
    }
}

/// Runtime scene configuration as a Bevy asset. Any missing section or field
/// takes its value from the `constants` crate.
#[derive(Asset, Debug, Clone, Default, PartialEq, Serialize, Deserialize, TypePath, Resource)]
#[serde(default)]
pub struct SceneConfig {
    pub particles: ParticleConfig,
    pub layout: LayoutConfig,
    pub morph: MorphConfig,
    pub rotation: RotationConfig,
    pub ornaments: OrnamentConfig,
    /// Photo sources to hang on the tree at start-up.
    pub photos: Vec<String>,
}

#[derive(Resource, Default)]
pub struct SceneConfigLoader {
    handle: Option<Handle<SceneConfig>>,
}

pub fn start_config_loading(
    mut loader: ResMut<SceneConfigLoader>,
    asset_server: Res<AssetServer>,
) {
    info!("Loading scene configuration from {}", SCENE_CONFIG_PATH);
    loader.handle = Some(asset_server.load(SCENE_CONFIG_PATH));
}

/// Insert the loaded configuration as a resource and move to `Running`.
/// A missing or malformed file falls back to the built-in defaults.
pub fn finish_config_loading(
    loader: Res<SceneConfigLoader>,
    configs: Res<Assets<SceneConfig>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let config = match loader.handle.as_ref() {
        Some(handle) => {
            if let Some(config) = configs.get(handle) {
                info!("✓ Scene configuration loaded");
                config.clone()
            } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
                warn!("Scene configuration failed to load ({err}), using defaults");
                SceneConfig::default()
            } else {
                return;
            }
        }
        None => {
            warn!("Scene configuration was never requested, using defaults");
            SceneConfig::default()
        }
    };

    commands.insert_resource(config);
    next_state.set(AppState::Running);
}
