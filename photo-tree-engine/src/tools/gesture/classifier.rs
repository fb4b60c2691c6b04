//! Coarse open/closed hand classification.
//!
//! A finger counts as extended when its tip is far from the wrist relative
//! to the wrist to palm-centre distance, which keeps the test independent of
//! how close the hand is to the camera.

use super::landmarks::{HandLandmarks, LandmarkFrame};
use crate::engine::morph::progress::MorphState;
use constants::gesture::*;

/// Extended finger count, or `None` when the palm is degenerate.
pub fn extended_finger_count(hand: &HandLandmarks) -> Option<u8> {
    let wrist = hand.point(WRIST);
    let reference = wrist.distance(hand.point(PALM_CENTRE));
    if !reference.is_finite() || reference < MIN_REFERENCE_DISTANCE {
        return None;
    }

    let fingers = FINGER_TIPS
        .iter()
        .filter(|&&tip| wrist.distance(hand.point(tip)) > FINGER_EXTENDED_RATIO * reference)
        .count() as u8;
    let thumb = u8::from(wrist.distance(hand.point(THUMB_TIP)) > THUMB_EXTENDED_RATIO * reference);

    Some(fingers + thumb)
}

/// Open hand scatters, fist assembles. Two fingers is a dead zone.
pub fn state_for_count(count: u8) -> Option<MorphState> {
    if count >= SCATTER_MIN_FINGERS {
        Some(MorphState::Scattered)
    } else if count <= TREE_MAX_FINGERS {
        Some(MorphState::AxisShape)
    } else {
        None
    }
}

/// Classification of one landmark frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureReading {
    /// Wrist x in normalised image space; present whenever a usable hand is.
    pub hand_x: Option<f32>,
    pub fingers: Option<u8>,
    pub state: Option<MorphState>,
}

impl GestureReading {
    pub fn hand_present(&self) -> bool {
        self.hand_x.is_some()
    }
}

pub fn classify(frame: &LandmarkFrame) -> GestureReading {
    let Some(hand) = frame.primary_hand() else {
        return GestureReading::default();
    };
    let Some(fingers) = extended_finger_count(&hand) else {
        return GestureReading::default();
    };
    GestureReading {
        hand_x: Some(hand.wrist_x()),
        fingers: Some(fingers),
        state: state_for_count(fingers),
    }
}
