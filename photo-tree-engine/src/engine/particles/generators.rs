//! Randomised point generators for the three target layouts.

use crate::engine::math::safe_normalize;
use bevy::prelude::*;
use rand::Rng;

/// One of the three orthogonal arms of the cross/axis tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::X,
            1 => Self::Y,
            _ => Self::Z,
        }
    }

    fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// The two unit vectors perpendicular to this axis.
    fn perpendiculars(self) -> (Vec3, Vec3) {
        match self {
            Self::X => (Vec3::Y, Vec3::Z),
            Self::Y => (Vec3::X, Vec3::Z),
            Self::Z => (Vec3::X, Vec3::Y),
        }
    }
}

/// Random direction, uniform over the unit sphere.
fn random_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    safe_normalize(Vec3::new(r * theta.cos(), z, r * theta.sin()), Vec3::Y)
}

/// A point near one of the three axes.
///
/// Points are spread along `[-arm_length, arm_length]` on the chosen axis,
/// offset inside a square cross-section of `thickness`, and jittered inside a
/// sphere of `jitter_radius`.
pub fn cross_position<R: Rng>(
    rng: &mut R,
    arm_length: f32,
    jitter_radius: f32,
    thickness: f32,
    axis: Axis,
) -> Vec3 {
    let along = if arm_length > 0.0 {
        rng.gen_range(-arm_length..=arm_length)
    } else {
        0.0
    };
    let half = thickness.max(0.0) * 0.5;
    let (u, v) = axis.perpendiculars();
    let (du, dv) = if half > 0.0 {
        (rng.gen_range(-half..=half), rng.gen_range(-half..=half))
    } else {
        (0.0, 0.0)
    };
    let jitter = random_direction(rng) * jitter_radius.max(0.0) * rng.gen_range(0.0f32..=1.0);

    axis.unit() * along + u * du + v * dv + jitter
}

/// A point uniformly distributed inside a sphere of `radius`.
pub fn sphere_position<R: Rng>(rng: &mut R, radius: f32) -> Vec3 {
    let u: f32 = rng.gen_range(0.0..=1.0);
    random_direction(rng) * radius.max(0.0) * u.cbrt()
}

/// A point in a horizontal ring around the vertical axis.
///
/// The radial distance is `radius ± band_width / 2` and the height lies in
/// `[-band_width, band_width]`, so points never sit on the axis itself when
/// `radius > band_width / 2`.
pub fn off_axis_position<R: Rng>(rng: &mut R, radius: f32, band_width: f32) -> Vec3 {
    let half = band_width.max(0.0) * 0.5;
    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = if half > 0.0 {
        (radius + rng.gen_range(-half..=half)).max(0.0)
    } else {
        radius.max(0.0)
    };
    let height = if half > 0.0 {
        rng.gen_range(-band_width..=band_width)
    } else {
        0.0
    };
    Vec3::new(distance * theta.cos(), height, distance * theta.sin())
}
