use bevy::prelude::*;

/// Ray against an oriented box of `size` centred on `xf`. Returns the entry
/// distance, or the exit distance when the origin is inside.
pub fn ray_hits_obb(origin: Vec3, dir: Vec3, xf: &GlobalTransform, size: Vec3) -> Option<f32> {
    let inv = xf.affine().inverse();
    if !inv.is_finite() {
        return None;
    }
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    let t = ray_aabb_hit_t(o_local, d_local, -he, he)?;
    // local t is measured in local units; map the hit back to a world distance
    let world_hit = xf.transform_point(o_local + d_local * t);
    let length = dir.length();
    (length > 0.0).then(|| (world_hit - origin).dot(dir) / (length * length))
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = ray_origin[axis];
        let d = ray_direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

/// Closest pick among `candidates`, each an entity with its world transform.
pub fn pick_closest<'a>(
    origin: Vec3,
    dir: Vec3,
    size: Vec3,
    candidates: impl IntoIterator<Item = (Entity, &'a GlobalTransform)>,
) -> Option<(Entity, f32)> {
    candidates
        .into_iter()
        .filter_map(|(entity, xf)| ray_hits_obb(origin, dir, xf, size).map(|t| (entity, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
