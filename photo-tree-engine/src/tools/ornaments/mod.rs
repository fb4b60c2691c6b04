//! Photo ornaments: draggable billboards hung on the tree.
//!
//! Each distinct photo source becomes one ornament entity parented under the
//! scene root. Ornaments follow the shared morph progress between a scatter
//! position and a tree position, and can be picked up and dragged to a new
//! tree position.
//!
//! ## Interaction
//!
//! ```text
//! pointer down on ornament ─> drag plane through ornament, facing camera
//!   pointer move           ─> SetRestPosition (parent-local) ─> tree_position
//!   pointer up             ─> drag_state_changed, click history
//!   two still clicks       ─> photo_clicked
//! ```
//!
//! An active drag freezes the scene rotation and camera zoom.

/// Drag plane, pointer ownership and click history.
pub mod drag;

/// Per-frame ornament motion, scale, opacity and billboard orientation.
pub mod motion;

/// Ray intersection utilities for ornament picking.
///
/// Slab method raycast against each billboard's oriented box.
pub mod ray;

/// Ornament component, photo sources and the source registry.
pub mod state;

/// Bevy systems wiring ornaments to input, morph progress and the frontend.
pub mod systems;

use crate::engine::core::app_state::{AppState, FrameSet};
use bevy::prelude::*;

use drag::{OrnamentInteraction, SetRestPosition};
use state::{OrnamentRegistry, PhotoListEvent};
use systems::{
    animate_ornaments, apply_rest_positions, cancel_drag_on_escape, handle_ornament_pointer,
    handle_photo_list_events, seed_initial_photos, setup_ornament_assets, sync_interaction_flags,
    update_cursor_icon, update_ornament_materials,
};

pub struct OrnamentPlugin;

impl Plugin for OrnamentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrnamentRegistry>()
            .init_resource::<OrnamentInteraction>()
            .add_event::<PhotoListEvent>()
            .add_event::<SetRestPosition>()
            .add_systems(Startup, setup_ornament_assets)
            .add_systems(OnEnter(AppState::Running), seed_initial_photos)
            .add_systems(
                Update,
                (
                    (
                        handle_photo_list_events,
                        cancel_drag_on_escape,
                        handle_ornament_pointer,
                        apply_rest_positions,
                        sync_interaction_flags,
                    )
                        .chain()
                        .in_set(FrameSet::Interaction),
                    animate_ornaments.in_set(FrameSet::Animate),
                    (update_ornament_materials, update_cursor_icon).in_set(FrameSet::Output),
                ),
            );
    }
}
