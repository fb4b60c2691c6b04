use crate::engine::loading::scene_config::{RotationConfig, SceneConfig};
use crate::tools::gesture::systems::GestureSignals;
use crate::tools::ornaments::drag::OrnamentInteraction;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

/// Parent of every particle field and ornament; carries the scene spin.
#[derive(Component, Debug, Default)]
pub struct SceneRoot;

/// Inputs driving the spin for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationInput {
    /// Horizontal pixels dragged across empty space this frame.
    pub scene_drag_dx: Option<f32>,
    /// Normalised hand x movement since the previous frame.
    pub gesture_dx: Option<f32>,
    /// An ornament drag owns the pointer.
    pub ornament_dragging: bool,
}

impl RotationInput {
    fn is_driven(&self) -> bool {
        self.scene_drag_dx.is_some() || self.gesture_dx.is_some()
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SceneRotation {
    pub angle: f32,
    pub angular_velocity: f32,
    /// Weight of the idle drift, eased back in after input stops.
    idle_blend: f32,
}

impl SceneRotation {
    pub fn step(&mut self, input: &RotationInput, params: &RotationConfig, dt: f32) {
        if input.ornament_dragging {
            self.angular_velocity = 0.0;
            self.idle_blend = 0.0;
            return;
        }

        if let Some(dx) = input.scene_drag_dx {
            self.angular_velocity += dx * params.drag_sensitivity;
        }
        if let Some(dx) = input.gesture_dx {
            self.angular_velocity += dx * params.gesture_sensitivity;
        }

        let rest = if input.is_driven() {
            self.idle_blend = 0.0;
            0.0
        } else {
            self.idle_blend += (1.0 - self.idle_blend) * params.idle_drift_ease.clamp(0.0, 1.0);
            params.idle_drift_speed * self.idle_blend
        };

        let friction = params.friction.clamp(0.0, 1.0);
        self.angular_velocity = rest + (self.angular_velocity - rest) * friction;
        self.angle = (self.angle + self.angular_velocity * dt.max(0.0)) % std::f32::consts::TAU;
    }
}

pub fn update_scene_rotation(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    interaction: Res<OrnamentInteraction>,
    signals: Res<GestureSignals>,
    config: Res<SceneConfig>,
    time: Res<Time>,
    mut rotation: ResMut<SceneRotation>,
    mut roots: Query<&mut Transform, With<SceneRoot>>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let scene_drag_dx = (mouse_button.pressed(MouseButton::Left) && !interaction.is_dragging())
        .then_some(mouse_delta.x);

    let input = RotationInput {
        scene_drag_dx,
        gesture_dx: signals.hand_delta_x(),
        ornament_dragging: interaction.is_dragging(),
    };
    rotation.step(&input, &config.rotation, time.delta_secs());

    for mut transform in roots.iter_mut() {
        transform.rotation = Quat::from_rotation_y(rotation.angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_spin_decays_toward_drift_speed() {
        let params = RotationConfig::default();
        let mut rotation = SceneRotation {
            angular_velocity: 5.0,
            ..default()
        };
        let mut previous = rotation.angular_velocity.abs();
        for _ in 0..120 {
            rotation.step(&RotationInput::default(), &params, 1.0 / 60.0);
            let speed = rotation.angular_velocity.abs();
            assert!(speed < previous);
            previous = speed;
        }
        for _ in 0..1_000 {
            rotation.step(&RotationInput::default(), &params, 1.0 / 60.0);
        }
        assert!((rotation.angular_velocity - params.idle_drift_speed).abs() < 0.05);
    }

    #[test]
    fn leftward_fling_passes_through_zero_and_settles_on_drift() {
        let params = RotationConfig::default();
        let mut rotation = SceneRotation {
            angular_velocity: -5.0,
            ..default()
        };
        let mut previous = rotation.angular_velocity;
        let mut crossed_at = None;
        for frame in 0..1_200 {
            rotation.step(&RotationInput::default(), &params, 1.0 / 60.0);
            let velocity = rotation.angular_velocity;
            assert!(velocity > previous);
            assert!(velocity <= params.idle_drift_speed);
            if previous < 0.0 && velocity >= 0.0 {
                crossed_at = Some(frame);
            }
            previous = velocity;
        }
        assert!(crossed_at.is_some());
        assert!((rotation.angular_velocity - params.idle_drift_speed).abs() < 0.05);
    }

    #[test]
    fn idle_drift_eases_in_from_rest() {
        let params = RotationConfig::default();
        let mut rotation = SceneRotation::default();
        rotation.step(&RotationInput::default(), &params, 1.0 / 60.0);
        let first = rotation.angular_velocity;
        assert!(first > 0.0 && first < params.idle_drift_speed * 0.1);
        for _ in 0..1_000 {
            rotation.step(&RotationInput::default(), &params, 1.0 / 60.0);
        }
        assert!((rotation.angular_velocity - params.idle_drift_speed).abs() < 1e-3);
    }

    #[test]
    fn ornament_drag_freezes_spin() {
        let params = RotationConfig::default();
        let mut rotation = SceneRotation {
            angle: 1.0,
            angular_velocity: 2.0,
            ..default()
        };
        let input = RotationInput {
            scene_drag_dx: Some(50.0),
            gesture_dx: Some(0.2),
            ornament_dragging: true,
        };
        rotation.step(&input, &params, 1.0 / 60.0);
        assert_eq!(rotation.angular_velocity, 0.0);
        assert_eq!(rotation.angle, 1.0);
    }

    #[test]
    fn scene_drag_adds_velocity_in_drag_direction() {
        let params = RotationConfig::default();
        let mut rotation = SceneRotation::default();
        let input = RotationInput {
            scene_drag_dx: Some(-20.0),
            ..default()
        };
        rotation.step(&input, &params, 1.0 / 60.0);
        assert!(rotation.angular_velocity < 0.0);
        assert!(rotation.angle < 0.0);
    }

    #[test]
    fn driven_spin_decays_toward_zero_between_moves() {
        let params = RotationConfig::default();
        let mut rotation = SceneRotation::default();
        rotation.step(
            &RotationInput {
                gesture_dx: Some(0.1),
                ..default()
            },
            &params,
            1.0 / 60.0,
        );
        let kicked = rotation.angular_velocity;
        assert!(kicked > 0.0);
        for _ in 0..10 {
            rotation.step(
                &RotationInput {
                    gesture_dx: Some(0.0),
                    ..default()
                },
                &params,
                1.0 / 60.0,
            );
        }
        assert!(rotation.angular_velocity < kicked);
        assert!(rotation.angular_velocity > 0.0);
    }
}
