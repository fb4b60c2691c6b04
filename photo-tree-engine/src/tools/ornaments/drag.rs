use bevy::math::Affine3A;
use bevy::prelude::*;
use constants::ornament::{DOUBLE_CLICK_WINDOW, DRAG_SLOP_PX};

/// Camera-facing plane fixed for the duration of one drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl DragPlane {
    /// Plane through `point` whose normal points at the camera.
    pub fn facing(point: Vec3, camera_position: Vec3) -> Option<Self> {
        let normal = (camera_position - point).try_normalize()?;
        Some(Self { point, normal })
    }

    /// Forward ray hit, or `None` when the ray is parallel or points away.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        let denom = self.normal.dot(direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.point - origin).dot(self.normal) / denom;
        (t >= 0.0).then(|| origin + direction * t)
    }
}

/// Overwrites an ornament's tree position, in its parent's frame.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SetRestPosition {
    pub entity: Entity,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    entity: Entity,
    plane: DragPlane,
    grab_offset: Vec3,
    press_cursor: Vec2,
    moved: bool,
}

/// Result of releasing the pointer on a dragged ornament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRelease {
    pub entity: Entity,
    pub double_click: bool,
}

/// Pointer ownership, hover and click history for ornaments.
#[derive(Resource, Debug, Default)]
pub struct OrnamentInteraction {
    hovered: Option<Entity>,
    drag: Option<DragSession>,
    last_click: Option<(Entity, f64)>,
}

impl OrnamentInteraction {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// True once the pointer has left the click slop during the current drag.
    pub fn is_moving(&self) -> bool {
        self.drag.is_some_and(|d| d.moved)
    }

    pub fn dragged(&self) -> Option<Entity> {
        self.drag.map(|d| d.entity)
    }

    pub fn hovered(&self) -> Option<Entity> {
        self.hovered
    }

    /// Returns the previous hover target when it changed.
    pub fn set_hovered(&mut self, entity: Option<Entity>) -> Option<Option<Entity>> {
        if self.hovered == entity {
            return None;
        }
        Some(std::mem::replace(&mut self.hovered, entity))
    }

    /// Start dragging `entity`, grabbed at world point `hit`.
    pub fn pointer_down(
        &mut self,
        entity: Entity,
        ornament_world: Vec3,
        hit: Vec3,
        camera_position: Vec3,
        cursor: Vec2,
    ) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(plane) = DragPlane::facing(ornament_world, camera_position) else {
            return false;
        };
        self.drag = Some(DragSession {
            entity,
            plane,
            grab_offset: ornament_world - hit,
            press_cursor: cursor,
            moved: false,
        });
        true
    }

    /// Follow the pointer on the drag plane. Nothing moves until the cursor
    /// leaves the click slop, so a plain click never shifts the ornament.
    pub fn pointer_move(
        &mut self,
        ray_origin: Vec3,
        ray_direction: Vec3,
        cursor: Vec2,
        parent_from_world: &Affine3A,
    ) -> Option<SetRestPosition> {
        let drag = self.drag.as_mut()?;
        if !drag.moved && drag.press_cursor.distance(cursor) < DRAG_SLOP_PX {
            return None;
        }
        drag.moved = true;

        let hit = drag.plane.intersect(ray_origin, ray_direction)?;
        let world_target = hit + drag.grab_offset;
        let position = parent_from_world.transform_point3(world_target);
        position.is_finite().then_some(SetRestPosition {
            entity: drag.entity,
            position,
        })
    }

    /// End the drag. A release without movement counts as a click; two clicks
    /// on the same ornament inside the window make one double-click.
    pub fn pointer_up(&mut self, now: f64) -> Option<DragRelease> {
        let drag = self.drag.take()?;
        if drag.moved {
            self.last_click = None;
            return Some(DragRelease {
                entity: drag.entity,
                double_click: false,
            });
        }

        let double_click = matches!(
            self.last_click,
            Some((entity, at)) if entity == drag.entity && now - at <= DOUBLE_CLICK_WINDOW
        );
        self.last_click = if double_click {
            None
        } else {
            Some((drag.entity, now))
        };

        Some(DragRelease {
            entity: drag.entity,
            double_click,
        })
    }

    /// Abandon the drag; the last applied rest position stays.
    pub fn cancel(&mut self) -> Option<Entity> {
        let drag = self.drag.take()?;
        self.last_click = None;
        Some(drag.entity)
    }

    /// Drop every reference to a despawned ornament.
    pub fn forget(&mut self, entity: Entity) -> bool {
        let was_dragged = self.dragged() == Some(entity);
        if was_dragged {
            self.drag = None;
        }
        if self.hovered == Some(entity) {
            self.hovered = None;
        }
        if matches!(self.last_click, Some((e, _)) if e == entity) {
            self.last_click = None;
        }
        was_dragged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMERA: Vec3 = Vec3::new(0.0, 0.0, 10.0);

    fn press(interaction: &mut OrnamentInteraction, entity: Entity) {
        assert!(interaction.pointer_down(entity, Vec3::ZERO, Vec3::ZERO, CAMERA, Vec2::ZERO));
    }

    #[test]
    fn plane_rejects_parallel_and_backward_rays() {
        let plane = DragPlane::facing(Vec3::ZERO, CAMERA).unwrap();
        assert!(plane.intersect(CAMERA, Vec3::X).is_none());
        assert!(plane.intersect(CAMERA, Vec3::Z).is_none());
        let hit = plane.intersect(CAMERA, Vec3::NEG_Z).unwrap();
        assert!(hit.distance(Vec3::ZERO) < 1e-5);
    }

    #[test]
    fn plane_needs_distinct_camera() {
        assert!(DragPlane::facing(CAMERA, CAMERA).is_none());
    }

    #[test]
    fn drag_moves_rest_position_in_parent_frame() {
        let mut interaction = OrnamentInteraction::default();
        let entity = Entity::from_raw(3);
        press(&mut interaction, entity);
        assert!(interaction.is_dragging());

        let direction = (Vec3::new(2.0, 1.0, 0.0) - CAMERA).normalize();
        let command = interaction
            .pointer_move(CAMERA, direction, Vec2::new(40.0, 0.0), &Affine3A::IDENTITY)
            .unwrap();
        assert_eq!(command.entity, entity);
        assert!(command.position.distance(Vec3::new(2.0, 1.0, 0.0)) < 1e-4);

        // parent spun a quarter turn: world +X is parent -Z
        let parent = Affine3A::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let command = interaction
            .pointer_move(CAMERA, direction, Vec2::new(40.0, 0.0), &parent.inverse())
            .unwrap();
        assert!(parent.transform_point3(command.position).distance(Vec3::new(2.0, 1.0, 0.0)) < 1e-4);
    }

    #[test]
    fn grab_offset_is_preserved() {
        let mut interaction = OrnamentInteraction::default();
        let entity = Entity::from_raw(1);
        let hit = Vec3::new(0.3, -0.2, 0.0);
        interaction.pointer_down(entity, Vec3::ZERO, hit, CAMERA, Vec2::ZERO);

        let target = Vec3::new(1.0, 1.0, 0.0);
        let direction = (target - CAMERA).normalize();
        let command = interaction
            .pointer_move(CAMERA, direction, Vec2::splat(50.0), &Affine3A::IDENTITY)
            .unwrap();
        assert!(command.position.distance(target - hit) < 1e-4);
    }

    #[test]
    fn small_jitter_does_not_move_the_ornament() {
        let mut interaction = OrnamentInteraction::default();
        press(&mut interaction, Entity::from_raw(1));
        let command = interaction.pointer_move(
            CAMERA,
            Vec3::NEG_Z,
            Vec2::new(1.0, 1.0),
            &Affine3A::IDENTITY,
        );
        assert!(command.is_none());
        assert!(interaction.is_dragging());
        assert!(!interaction.is_moving());
    }

    #[test]
    fn moving_starts_past_the_slop_and_ends_on_release() {
        let mut interaction = OrnamentInteraction::default();
        assert!(!interaction.is_moving());
        press(&mut interaction, Entity::from_raw(1));
        assert!(!interaction.is_moving());

        interaction.pointer_move(CAMERA, Vec3::NEG_Z, Vec2::new(20.0, 0.0), &Affine3A::IDENTITY);
        assert!(interaction.is_moving());

        // back inside the slop still counts as moving
        interaction.pointer_move(CAMERA, Vec3::NEG_Z, Vec2::ZERO, &Affine3A::IDENTITY);
        assert!(interaction.is_moving());

        interaction.pointer_up(1.0);
        assert!(!interaction.is_moving());
    }

    #[test]
    fn double_click_fires_exactly_once() {
        let mut interaction = OrnamentInteraction::default();
        let entity = Entity::from_raw(5);

        press(&mut interaction, entity);
        assert!(!interaction.pointer_up(1.0).unwrap().double_click);
        press(&mut interaction, entity);
        assert!(interaction.pointer_up(1.2).unwrap().double_click);
        press(&mut interaction, entity);
        assert!(!interaction.pointer_up(1.3).unwrap().double_click);
    }

    #[test]
    fn slow_or_split_clicks_are_not_double_clicks() {
        let mut interaction = OrnamentInteraction::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        press(&mut interaction, a);
        interaction.pointer_up(1.0);
        press(&mut interaction, a);
        assert!(!interaction.pointer_up(2.0).unwrap().double_click);

        press(&mut interaction, a);
        interaction.pointer_up(3.0);
        press(&mut interaction, b);
        assert!(!interaction.pointer_up(3.1).unwrap().double_click);
    }

    #[test]
    fn drag_never_produces_a_click() {
        let mut interaction = OrnamentInteraction::default();
        let entity = Entity::from_raw(7);

        press(&mut interaction, entity);
        interaction.pointer_up(1.0);

        press(&mut interaction, entity);
        interaction.pointer_move(CAMERA, Vec3::NEG_Z, Vec2::new(30.0, 0.0), &Affine3A::IDENTITY);
        let release = interaction.pointer_up(1.1).unwrap();
        assert!(!release.double_click);

        press(&mut interaction, entity);
        assert!(!interaction.pointer_up(1.2).unwrap().double_click);
    }

    #[test]
    fn second_press_while_dragging_is_ignored() {
        let mut interaction = OrnamentInteraction::default();
        press(&mut interaction, Entity::from_raw(1));
        assert!(!interaction.pointer_down(
            Entity::from_raw(2),
            Vec3::ZERO,
            Vec3::ZERO,
            CAMERA,
            Vec2::ZERO
        ));
        assert_eq!(interaction.dragged(), Some(Entity::from_raw(1)));
    }

    #[test]
    fn cancel_and_forget_release_the_pointer() {
        let mut interaction = OrnamentInteraction::default();
        let entity = Entity::from_raw(4);
        press(&mut interaction, entity);
        assert_eq!(interaction.cancel(), Some(entity));
        assert!(!interaction.is_dragging());
        assert!(interaction.pointer_up(1.0).is_none());

        press(&mut interaction, entity);
        interaction.set_hovered(Some(entity));
        assert!(interaction.forget(entity));
        assert!(!interaction.is_dragging());
        assert_eq!(interaction.hovered(), None);
    }

    #[test]
    fn hover_change_reports_previous_target() {
        let mut interaction = OrnamentInteraction::default();
        let a = Entity::from_raw(1);
        assert_eq!(interaction.set_hovered(Some(a)), Some(None));
        assert_eq!(interaction.set_hovered(Some(a)), None);
        assert_eq!(interaction.set_hovered(None), Some(Some(a)));
    }
}
