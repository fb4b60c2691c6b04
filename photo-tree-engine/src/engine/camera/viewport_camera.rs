use crate::tools::ornaments::drag::OrnamentInteraction;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::render_settings::{
    CAMERA_FOCUS, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_START, CAMERA_ZOOM_EASE,
    CAMERA_ZOOM_SPEED,
};

/// Fixed-direction camera that only dollies toward or away from its focus.
#[derive(Resource, Debug, Clone)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    /// Unit vector from the focus towards the camera.
    pub view_direction: Vec3,
    pub distance: f32,
    pub target_distance: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        let offset = CAMERA_START - CAMERA_FOCUS;
        let distance = offset.length().clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        Self {
            focus_point: CAMERA_FOCUS,
            view_direction: offset.try_normalize().unwrap_or(Vec3::Z),
            distance,
            target_distance: distance,
        }
    }
}

impl ViewportCamera {
    /// Positive scroll moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.target_distance = (self.target_distance - scroll * CAMERA_ZOOM_SPEED)
            .clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    pub fn ease(&mut self, dt: f32) {
        let t = (CAMERA_ZOOM_EASE * dt).min(1.0);
        self.distance += (self.target_distance - self.distance) * t;
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.focus_point + self.view_direction * self.distance)
            .looking_at(self.focus_point, Vec3::Y)
    }
}

pub fn spawn_viewport_camera(mut commands: Commands) {
    let viewport = ViewportCamera::default();
    commands.spawn((Name::new("viewport_camera"), Camera3d::default(), viewport.transform()));
    commands.insert_resource(viewport);
}

/// Scroll wheel dolly. Scrolling is swallowed while an ornament is dragged.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport: ResMut<ViewportCamera>,
    mut scroll_events: EventReader<MouseWheel>,
    interaction: Res<OrnamentInteraction>,
    time: Res<Time>,
) {
    let scroll: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    if scroll.abs() > f32::EPSILON && !interaction.is_dragging() {
        viewport.zoom(scroll);
    }
    viewport.ease(time.delta_secs());

    if let Ok(mut camera_transform) = camera_query.single_mut() {
        *camera_transform = viewport.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = ViewportCamera::default();
        viewport.zoom(1000.0);
        assert_eq!(viewport.target_distance, CAMERA_MIN_DISTANCE);
        viewport.zoom(-1000.0);
        assert_eq!(viewport.target_distance, CAMERA_MAX_DISTANCE);
    }

    #[test]
    fn distance_eases_without_overshoot() {
        let mut viewport = ViewportCamera::default();
        viewport.zoom(2.0);
        let target = viewport.target_distance;
        let start = viewport.distance;
        assert!(target < start);

        let mut previous = start;
        for _ in 0..240 {
            viewport.ease(1.0 / 60.0);
            assert!(viewport.distance <= previous);
            assert!(viewport.distance >= target);
            previous = viewport.distance;
        }
        assert!((viewport.distance - target).abs() < 1e-3);

        // a long frame lands on target
        viewport.zoom(-1.0);
        viewport.ease(10.0);
        assert!((viewport.distance - viewport.target_distance).abs() < 1e-5);
    }

    #[test]
    fn camera_looks_at_focus() {
        let viewport = ViewportCamera::default();
        let transform = viewport.transform();
        let to_focus = (viewport.focus_point - transform.translation).normalize();
        assert!(transform.forward().as_vec3().distance(to_focus) < 1e-4);
        let distance = transform.translation.distance(viewport.focus_point);
        assert!((distance - viewport.distance).abs() < 1e-4);
    }
}
