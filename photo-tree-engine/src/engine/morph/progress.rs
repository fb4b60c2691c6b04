use crate::engine::loading::scene_config::SceneConfig;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;
use constants::morph::{INITIAL_PROGRESS, MORPH_EASE_RATE};
use serde::{Deserialize, Serialize};

/// Discrete arrangement the scene is heading toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphState {
    /// Particles and ornaments gather into the axis tree.
    AxisShape,
    /// Everything drifts in the spherical cloud.
    #[default]
    Scattered,
}

impl MorphState {
    /// Progress value this state eases toward.
    pub fn target(self) -> f32 {
        match self {
            Self::AxisShape => 1.0,
            Self::Scattered => 0.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::AxisShape => Self::Scattered,
            Self::Scattered => Self::AxisShape,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AxisShape => "axis_shape",
            Self::Scattered => "scattered",
        }
    }
}

/// Shared morph scalar read by every animator.
#[derive(Resource, Debug, Clone)]
pub struct MorphProgress {
    progress: f32,
    target: MorphState,
    ease_rate: f32,
}

impl Default for MorphProgress {
    fn default() -> Self {
        Self::new(MorphState::Scattered, MORPH_EASE_RATE)
    }
}

impl MorphProgress {
    /// Start at rest in `state`'s arrangement. The only place progress jumps.
    pub fn new(state: MorphState, ease_rate: f32) -> Self {
        let progress = match state {
            MorphState::Scattered => INITIAL_PROGRESS,
            MorphState::AxisShape => state.target(),
        };
        Self {
            progress,
            target: state,
            ease_rate: ease_rate.max(0.0),
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(&self) -> MorphState {
        self.target
    }

    /// Returns true when the target actually changed.
    pub fn set_target(&mut self, state: MorphState) -> bool {
        if self.target == state {
            return false;
        }
        self.target = state;
        true
    }

    /// Move a fraction `min(rate * dt, 1)` of the remaining distance.
    pub fn ease_toward(&mut self, dt: f32) {
        let step = (self.ease_rate * dt.max(0.0)).min(1.0);
        let target = self.target.target();
        self.progress = (self.progress + (target - self.progress) * step).clamp(0.0, 1.0);
    }
}

/// Who asked for a morph change, for logging and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphSource {
    Ui,
    Gesture,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphAction {
    Set(MorphState),
    Toggle,
}

/// Event requesting a new morph target.
#[derive(Event, Debug, Clone, Copy)]
pub struct MorphStateRequest {
    pub action: MorphAction,
    pub source: MorphSource,
}

/// Seed the driver from the loaded configuration on entering `Running`.
pub fn init_morph_progress(config: Res<SceneConfig>, mut commands: Commands) {
    info!(
        "Morph driver starting {} at rate {}",
        config.morph.start_state.as_str(),
        config.morph.ease_rate
    );
    commands.insert_resource(MorphProgress::new(
        config.morph.start_state,
        config.morph.ease_rate,
    ));
}

pub fn apply_morph_requests(
    mut requests: EventReader<MorphStateRequest>,
    mut morph: ResMut<MorphProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for request in requests.read() {
        let state = match request.action {
            MorphAction::Set(state) => state,
            MorphAction::Toggle => morph.target().toggled(),
        };

        if !morph.set_target(state) {
            continue;
        }

        info!("Morph target -> {} via {:?}", state.as_str(), request.source);
        rpc_interface.send_notification(
            "morph_state_changed",
            serde_json::json!({
                "state": state,
                "source": request.source,
            }),
        );
    }
}

/// `Space` is the keyboard equivalent of the UI toggle.
pub fn handle_morph_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<MorphStateRequest>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        requests.write(MorphStateRequest {
            action: MorphAction::Toggle,
            source: MorphSource::Ui,
        });
    }
}

pub fn advance_morph_progress(time: Res<Time>, mut morph: ResMut<MorphProgress>) {
    morph.ease_toward(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_to_target_without_leaving_bounds() {
        let mut morph = MorphProgress::new(MorphState::Scattered, 2.0);
        morph.set_target(MorphState::AxisShape);
        let mut previous = morph.progress();
        for _ in 0..600 {
            morph.ease_toward(1.0 / 60.0);
            assert!((0.0..=1.0).contains(&morph.progress()));
            assert!(morph.progress() >= previous);
            previous = morph.progress();
        }
        assert!((morph.progress() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn huge_frame_lands_exactly_without_overshoot() {
        let mut morph = MorphProgress::new(MorphState::AxisShape, 2.0);
        morph.set_target(MorphState::Scattered);
        morph.ease_toward(10.0);
        assert_eq!(morph.progress(), 0.0);
    }

    #[test]
    fn reversing_mid_transition_is_continuous() {
        let mut morph = MorphProgress::new(MorphState::Scattered, 2.0);
        morph.set_target(MorphState::AxisShape);
        for _ in 0..20 {
            morph.ease_toward(1.0 / 60.0);
        }
        let before = morph.progress();
        morph.set_target(MorphState::Scattered);
        morph.ease_toward(1.0 / 60.0);
        assert!(morph.progress() < before);
        assert!(before - morph.progress() < 0.05);
    }

    #[test]
    fn setting_the_same_target_reports_no_change() {
        let mut morph = MorphProgress::default();
        assert!(!morph.set_target(MorphState::Scattered));
        assert!(morph.set_target(MorphState::AxisShape));
    }

    #[test]
    fn zero_dt_keeps_progress() {
        let mut morph = MorphProgress::new(MorphState::Scattered, 2.0);
        morph.set_target(MorphState::AxisShape);
        morph.ease_toward(0.0);
        assert_eq!(morph.progress(), 0.0);
    }

    #[test]
    fn state_names_match_wire_format() {
        assert_eq!(
            serde_json::to_value(MorphState::AxisShape).unwrap(),
            serde_json::json!("axis_shape")
        );
        let parsed: MorphState = serde_json::from_str("\"scattered\"").unwrap();
        assert_eq!(parsed, MorphState::Scattered);
    }
}
