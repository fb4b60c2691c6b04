//! Hand gesture input.
//!
//! Landmark frames from an external hand-tracking model are queued by a
//! capture session, classified once per frame into an open or closed hand,
//! and published as [`systems::GestureSignals`]. A change of classification
//! becomes a morph request; the wrist position drives scene rotation.

/// Capture session lifecycle and the landmark source seam.
pub mod capture;

/// Finger counting and the open/closed hand decision.
pub mod classifier;

/// Landmark wire types and complete-hand validation.
pub mod landmarks;

/// Tracking toggles, frame ingestion and classification systems.
pub mod systems;

use crate::engine::core::app_state::FrameSet;
use bevy::prelude::*;

use capture::GestureTracker;
use systems::{
    GestureSignals, GestureTrackingRequest, LandmarkFrameEvent, classify_gestures,
    handle_gesture_shortcuts, handle_tracking_requests, ingest_landmark_frames,
};

pub struct GesturePlugin;

impl Plugin for GesturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GestureTracker>()
            .init_resource::<GestureSignals>()
            .add_event::<GestureTrackingRequest>()
            .add_event::<LandmarkFrameEvent>()
            .add_systems(
                Update,
                (
                    handle_gesture_shortcuts,
                    handle_tracking_requests,
                    ingest_landmark_frames,
                    classify_gestures,
                )
                    .chain()
                    .in_set(FrameSet::Input),
            );
    }
}
