use bevy::prelude::*;
use constants::layout::MIN_NORMALISE_LENGTH;

/// Hermite smoothstep, clamped to [0, 1].
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Normalise `v`, returning `fallback` when it is too short to have a direction.
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let length = v.length();
    if length.is_finite() && length > MIN_NORMALISE_LENGTH {
        v / length
    } else {
        fallback
    }
}

/// Frame-rate independent exponential follow factor for a rate in 1/s.
pub fn follow_factor(rate: f32, dt: f32) -> f32 {
    (1.0 - (-rate * dt.max(0.0)).exp()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_hits_edges_and_midpoint() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_uses_fallback() {
        assert_eq!(safe_normalize(Vec3::ZERO, Vec3::Y), Vec3::Y);
        let n = safe_normalize(Vec3::new(3.0, 0.0, 4.0), Vec3::Y);
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn follow_factor_stays_in_unit_range() {
        assert_eq!(follow_factor(4.0, 0.0), 0.0);
        assert!(follow_factor(4.0, 1.0 / 60.0) < 0.1);
        assert!(follow_factor(4.0, 100.0) <= 1.0);
    }
}
