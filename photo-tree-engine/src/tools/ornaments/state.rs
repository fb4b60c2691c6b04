use crate::engine::loading::scene_config::LayoutConfig;
use crate::engine::particles::generators::{off_axis_position, sphere_position};
use bevy::prelude::*;
use constants::ornament::{ORNAMENT_SCALE_MAX, ORNAMENT_SCALE_MIN};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque photo identifier: an asset path or URL handed over by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoSource(pub String);

impl PhotoSource {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PhotoSource {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PhotoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One draggable photo billboard. Positions are in the scene root's frame.
#[derive(Component, Debug, Clone)]
pub struct Ornament {
    pub source: PhotoSource,
    /// Rest position on the tree; overwritten by drag.
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    pub phase: f32,
    pub base_scale: f32,

    pub position: Vec3,
    pub opacity: f32,
    /// Pressed by the pointer.
    pub dragging: bool,
    /// Pressed and carried past the click slop.
    pub moving: bool,
    pub hovered: bool,
}

impl Ornament {
    pub fn new<R: Rng>(rng: &mut R, source: PhotoSource, layout: &LayoutConfig) -> Self {
        let tree_position = off_axis_position(
            rng,
            layout.ornament_ring_radius,
            layout.ornament_band_width,
        );
        let scatter_position = sphere_position(rng, layout.ornament_scatter_radius);
        Self {
            source,
            tree_position,
            scatter_position,
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            base_scale: rng.gen_range(ORNAMENT_SCALE_MIN..=ORNAMENT_SCALE_MAX),
            position: scatter_position,
            opacity: 0.0,
            dragging: false,
            moving: false,
            hovered: false,
        }
    }
}

/// Photo list edits coming from the frontend or the initial configuration.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PhotoListEvent {
    Replace(Vec<PhotoSource>),
    Add(PhotoSource),
    Remove(PhotoSource),
}

/// Sources to spawn and despawn to move from one photo list to another.
#[derive(Debug, Default, PartialEq)]
pub struct PhotoDiff {
    pub added: Vec<PhotoSource>,
    pub removed: Vec<PhotoSource>,
}

/// Diff by identity, keeping `desired` order and ignoring duplicates.
pub fn diff_photo_sources(current: &[PhotoSource], desired: &[PhotoSource]) -> PhotoDiff {
    let mut added = Vec::new();
    for source in desired {
        if !current.contains(source) && !added.contains(source) {
            added.push(source.clone());
        }
    }
    let removed = current
        .iter()
        .filter(|source| !desired.contains(source))
        .cloned()
        .collect();
    PhotoDiff { added, removed }
}

/// One entity per distinct photo source, in insertion order.
#[derive(Resource, Debug, Default)]
pub struct OrnamentRegistry {
    entities: HashMap<PhotoSource, Entity>,
    order: Vec<PhotoSource>,
}

impl OrnamentRegistry {
    pub fn contains(&self, source: &PhotoSource) -> bool {
        self.entities.contains_key(source)
    }

    /// Returns false and leaves the registry untouched if the source exists.
    pub fn insert(&mut self, source: PhotoSource, entity: Entity) -> bool {
        if self.contains(&source) {
            return false;
        }
        self.order.push(source.clone());
        self.entities.insert(source, entity);
        true
    }

    pub fn remove(&mut self, source: &PhotoSource) -> Option<Entity> {
        let entity = self.entities.remove(source)?;
        self.order.retain(|s| s != source);
        Some(entity)
    }

    pub fn entity(&self, source: &PhotoSource) -> Option<Entity> {
        self.entities.get(source).copied()
    }

    pub fn sources(&self) -> &[PhotoSource] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
