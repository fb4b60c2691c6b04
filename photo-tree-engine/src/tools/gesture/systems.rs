use super::capture::{FrontendLandmarkSource, GestureTracker};
use super::classifier::{GestureReading, classify};
use super::landmarks::LandmarkFrame;
use crate::engine::morph::progress::{MorphAction, MorphSource, MorphState, MorphStateRequest};
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

/// Latest gesture readings shared with the rest of the frame loop.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct GestureSignals {
    pub hand_x: Option<f32>,
    pub previous_hand_x: Option<f32>,
    pub hand_active: bool,
    pub fingers: Option<u8>,
    /// Last discrete state requested; kept while the hand is away.
    pub last_state: Option<MorphState>,
}

impl GestureSignals {
    /// Start a new frame: movement is measured from here.
    pub fn begin_frame(&mut self) {
        self.previous_hand_x = self.hand_x;
    }

    /// Fold in one classified frame. Returns the frame's state whenever the
    /// pose maps to one; the morph driver drops requests that change nothing.
    pub fn observe(&mut self, reading: &GestureReading) -> Option<MorphState> {
        self.hand_active = reading.hand_present();
        if !self.hand_active {
            self.hand_x = None;
            self.previous_hand_x = None;
            self.fingers = None;
            return None;
        }

        self.hand_x = reading.hand_x;
        self.fingers = reading.fingers;

        let state = reading.state?;
        self.last_state = Some(state);
        Some(state)
    }

    /// Hand movement since the previous frame, while a hand is tracked.
    pub fn hand_delta_x(&self) -> Option<f32> {
        if !self.hand_active {
            return None;
        }
        match (self.hand_x, self.previous_hand_x) {
            (Some(x), Some(previous)) => Some(x - previous),
            (Some(_), None) => Some(0.0),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingAction {
    Enable,
    Disable,
    Toggle,
}

/// Event asking to start or stop landmark capture.
#[derive(Event, Debug, Clone, Copy)]
pub struct GestureTrackingRequest {
    pub action: TrackingAction,
}

/// Landmark frame delivered by the frontend.
#[derive(Event, Debug, Clone)]
pub struct LandmarkFrameEvent(pub LandmarkFrame);

pub fn handle_tracking_requests(
    mut requests: EventReader<GestureTrackingRequest>,
    mut tracker: ResMut<GestureTracker>,
    mut signals: ResMut<GestureSignals>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for request in requests.read() {
        let enable = match request.action {
            TrackingAction::Enable => true,
            TrackingAction::Disable => false,
            TrackingAction::Toggle => !tracker.is_enabled(),
        };

        let changed = if enable {
            match tracker.enable(Box::new(FrontendLandmarkSource)) {
                Ok(changed) => changed,
                Err(err) => {
                    warn!("Gesture tracking could not start: {err}");
                    false
                }
            }
        } else {
            tracker.disable()
        };

        if !changed {
            continue;
        }
        if !enable {
            signals.reset();
        }
        info!("Gesture tracking {}", if enable { "enabled" } else { "disabled" });
        rpc_interface.send_notification(
            "gesture_tracking_changed",
            serde_json::json!({ "enabled": enable }),
        );
    }
}

/// `G` toggles gesture tracking.
pub fn handle_gesture_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<GestureTrackingRequest>,
) {
    if keyboard.just_pressed(KeyCode::KeyG) {
        requests.write(GestureTrackingRequest {
            action: TrackingAction::Toggle,
        });
    }
}

pub fn ingest_landmark_frames(
    mut frames: EventReader<LandmarkFrameEvent>,
    tracker: Res<GestureTracker>,
) {
    for LandmarkFrameEvent(frame) in frames.read() {
        if !tracker.push(frame.clone()) {
            trace!("Landmark frame dropped while tracking is off");
        }
    }
}

/// Classify queued frames and turn each decisive pose into a morph request.
pub fn classify_gestures(
    tracker: Res<GestureTracker>,
    mut signals: ResMut<GestureSignals>,
    mut requests: EventWriter<MorphStateRequest>,
) {
    signals.begin_frame();
    for frame in tracker.drain() {
        let reading = classify(&frame);
        if let Some(state) = signals.observe(&reading) {
            requests.write(MorphStateRequest {
                action: MorphAction::Set(state),
                source: MorphSource::Gesture,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::morph::progress::MorphProgress;
    use crate::tools::gesture::classifier::tests::hand_frame;

    fn reading(x: f32, extended: u8) -> GestureReading {
        classify(&hand_frame(x, extended))
    }

    #[test]
    fn every_decisive_frame_emits_its_state() {
        let mut signals = GestureSignals::default();
        assert_eq!(signals.observe(&reading(0.5, 5)), Some(MorphState::Scattered));
        assert_eq!(signals.observe(&reading(0.5, 4)), Some(MorphState::Scattered));
        assert_eq!(signals.observe(&reading(0.5, 3)), Some(MorphState::Scattered));
        // dead zone: no request, last state kept
        assert_eq!(signals.observe(&reading(0.5, 2)), None);
        assert_eq!(signals.last_state, Some(MorphState::Scattered));
        assert_eq!(signals.observe(&reading(0.5, 0)), Some(MorphState::AxisShape));
        assert_eq!(signals.observe(&reading(0.5, 1)), Some(MorphState::AxisShape));
    }

    #[test]
    fn losing_the_hand_keeps_last_state() {
        let mut signals = GestureSignals::default();
        signals.observe(&reading(0.5, 0));
        assert_eq!(signals.observe(&GestureReading::default()), None);
        assert!(!signals.hand_active);
        assert_eq!(signals.last_state, Some(MorphState::AxisShape));
        assert_eq!(signals.observe(&reading(0.5, 1)), Some(MorphState::AxisShape));
    }

    #[test]
    fn held_open_hand_reasserts_scattered_after_toggle() {
        let mut signals = GestureSignals::default();
        let mut morph = MorphProgress::new(MorphState::Scattered, 2.0);

        if let Some(state) = signals.observe(&reading(0.5, 5)) {
            morph.set_target(state);
        }
        assert_eq!(morph.target(), MorphState::Scattered);

        // UI toggle while the hand stays open
        assert!(morph.set_target(MorphState::AxisShape));

        let mut changes = 0;
        for _ in 0..30 {
            signals.begin_frame();
            if let Some(state) = signals.observe(&reading(0.5, 5)) {
                if morph.set_target(state) {
                    changes += 1;
                }
            }
        }
        assert_eq!(morph.target(), MorphState::Scattered);
        assert_eq!(changes, 1);
    }

    #[test]
    fn hand_delta_tracks_movement_between_frames() {
        let mut signals = GestureSignals::default();
        signals.begin_frame();
        signals.observe(&reading(0.40, 2));
        assert_eq!(signals.hand_delta_x(), Some(0.0));

        signals.begin_frame();
        signals.observe(&reading(0.45, 2));
        let delta = signals.hand_delta_x().unwrap();
        assert!((delta - 0.05).abs() < 1e-6);

        // no new frame: no movement, hand still counts as active
        signals.begin_frame();
        assert_eq!(signals.hand_delta_x(), Some(0.0));

        signals.begin_frame();
        signals.observe(&GestureReading::default());
        assert_eq!(signals.hand_delta_x(), None);
    }

    #[test]
    fn hand_x_published_in_dead_zone() {
        let mut signals = GestureSignals::default();
        signals.observe(&reading(0.7, 2));
        assert_eq!(signals.hand_x, Some(0.7));
        assert_eq!(signals.last_state, None);
    }
}
