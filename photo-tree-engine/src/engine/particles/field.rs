//! Struct-of-arrays particle field and its per-frame evaluation.
//!
//! A field owns a fixed population created once. Every frame the whole field
//! is evaluated into a pre-allocated [`ParticleFrame`] as a pure function of
//! elapsed time, morph progress and each particle's static attributes.

use super::generators::{Axis, cross_position, sphere_position};
use crate::engine::loading::scene_config::{LayoutConfig, ParticleConfig};
use crate::engine::math::{safe_normalize, smoothstep};
use bevy::prelude::*;
use constants::particles::*;
use rand::Rng;

/// Colour slot of a particle, resolved through the field palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCategory {
    Primary,
    Secondary,
    Accent,
}

impl ColorCategory {
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary, Self::Accent];

    pub fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
            Self::Accent => 2,
        }
    }

    /// Weighted pick; falls back to `Primary` when the weights sum to zero.
    pub fn pick<R: Rng>(rng: &mut R, weights: &[f32; 3]) -> Self {
        let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return Self::Primary;
        }
        let mut roll = rng.gen_range(0.0..total);
        for (category, weight) in Self::ALL.iter().zip(weights) {
            let weight = weight.max(0.0);
            if roll < weight {
                return *category;
            }
            roll -= weight;
        }
        Self::Accent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Dense field forming the axis tree.
    Foliage,
    /// Sparse ambient field that reacts to the cursor.
    Dust,
}

/// Appearance and motion parameters of one field.
#[derive(Debug, Clone)]
pub struct FieldParams {
    pub kind: FieldKind,
    pub palette: [[f32; 3]; 3],
    pub category_weights: [f32; 3],
    pub base_size: f32,
    pub scatter_size_multiplier: f32,
    pub tree_size_multiplier: f32,
    pub explosion_strength: f32,
    pub chaos_amplitude: f32,
    pub breath_amplitude: f32,
    pub breath_frequency: f32,
    pub twinkle_amount: f32,
    pub twinkle_frequency: f32,
    pub scattered_alpha: f32,
    pub tree_alpha: f32,
    pub fade_in_seconds: f32,
}

impl FieldParams {
    pub fn foliage(config: &ParticleConfig) -> Self {
        Self {
            kind: FieldKind::Foliage,
            palette: FOLIAGE_PALETTE,
            category_weights: FOLIAGE_CATEGORY_WEIGHTS,
            base_size: FOLIAGE_BASE_SIZE,
            scatter_size_multiplier: SCATTER_SIZE_MULTIPLIER,
            tree_size_multiplier: TREE_SIZE_MULTIPLIER,
            explosion_strength: config.explosion_strength,
            chaos_amplitude: config.chaos_amplitude,
            breath_amplitude: config.breath_amplitude,
            breath_frequency: BREATH_FREQUENCY,
            twinkle_amount: TWINKLE_AMOUNT,
            twinkle_frequency: TWINKLE_FREQUENCY,
            scattered_alpha: SCATTERED_ALPHA,
            tree_alpha: TREE_ALPHA,
            fade_in_seconds: FADE_IN_SECONDS,
        }
    }

    pub fn dust(config: &ParticleConfig) -> Self {
        Self {
            kind: FieldKind::Dust,
            palette: DUST_PALETTE,
            category_weights: DUST_CATEGORY_WEIGHTS,
            base_size: DUST_BASE_SIZE,
            // dust keeps its size through the morph
            tree_size_multiplier: SCATTER_SIZE_MULTIPLIER,
            ..Self::foliage(config)
        }
    }
}

/// Cursor attraction applied to dust particles.
#[derive(Debug, Clone, Copy)]
pub struct Attractor {
    /// Attraction point in the field's local frame.
    pub point: Vec3,
    pub radius: f32,
    pub strength: f32,
    pub power: f32,
    pub softening: f32,
}

impl Attractor {
    pub fn new(point: Vec3, config: &ParticleConfig) -> Self {
        Self {
            point,
            radius: config.dust_attraction_radius,
            strength: config.dust_attraction_strength,
            power: DUST_ATTRACTION_POWER,
            softening: DUST_ATTRACTION_SOFTENING,
        }
    }

    /// Pull `position` toward the attraction point. The pull fraction is
    /// capped at 1 so a particle never overshoots the cursor.
    pub fn pull(&self, position: Vec3) -> Vec3 {
        let offset = self.point - position;
        let distance = offset.length();
        if !distance.is_finite() || distance >= self.radius || distance <= f32::EPSILON {
            return position;
        }
        let influence = (1.0 - distance / self.radius).clamp(0.0, 1.0).powf(self.power);
        let pull = (self.strength / (distance * distance + self.softening)).min(1.0) * influence;
        position + offset * pull.clamp(0.0, 1.0)
    }
}

/// One evaluated particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub position: Vec3,
    /// Linear RGBA.
    pub colour: [f32; 4],
    /// World-space quad edge length.
    pub size: f32,
}

/// Pre-allocated per-frame output of a field.
#[derive(Debug, Clone, Default)]
pub struct ParticleFrame {
    pub positions: Vec<Vec3>,
    pub colours: Vec<[f32; 4]>,
    pub sizes: Vec<f32>,
}

impl ParticleFrame {
    pub fn with_len(len: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; len],
            colours: vec![[0.0; 4]; len],
            sizes: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

/// Outward burst envelope: zero at both ends, peak of 1 at blend = 1/3.
pub fn explosion_envelope(blend: f32) -> f32 {
    let b = blend.clamp(0.0, 1.0);
    6.75 * b * (1.0 - b) * (1.0 - b)
}

/// On-screen point size in pixels for a particle at `depth` from the camera.
pub fn screen_point_size(size: f32, depth: f32) -> f32 {
    if depth <= f32::EPSILON {
        return MAX_POINT_SIZE_PX;
    }
    (size * PERSPECTIVE_SCALE / depth).clamp(0.0, MAX_POINT_SIZE_PX)
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    params: FieldParams,
    rest: Vec<Vec3>,
    scatter: Vec<Vec3>,
    phase: Vec<f32>,
    size: Vec<f32>,
    category: Vec<ColorCategory>,
}

impl ParticleField {
    /// Dense field resting on the axis/cross tree.
    pub fn foliage<R: Rng>(
        rng: &mut R,
        count: usize,
        layout: &LayoutConfig,
        config: &ParticleConfig,
    ) -> Self {
        Self::build(
            rng,
            count,
            FieldParams::foliage(config),
            |rng, i| {
                cross_position(
                    rng,
                    layout.tree_arm_length,
                    layout.tree_jitter_radius,
                    layout.tree_arm_thickness,
                    Axis::from_index(i),
                )
            },
            |rng, _| sphere_position(rng, layout.scatter_radius),
        )
    }

    /// Ambient field resting on a wide shell around the tree.
    pub fn dust<R: Rng>(
        rng: &mut R,
        count: usize,
        layout: &LayoutConfig,
        config: &ParticleConfig,
    ) -> Self {
        Self::build(
            rng,
            count,
            FieldParams::dust(config),
            |rng, _| sphere_position(rng, layout.dust_rest_radius),
            |rng, _| sphere_position(rng, layout.dust_scatter_radius),
        )
    }

    fn build<R: Rng>(
        rng: &mut R,
        count: usize,
        params: FieldParams,
        mut rest_at: impl FnMut(&mut R, usize) -> Vec3,
        mut scatter_at: impl FnMut(&mut R, usize) -> Vec3,
    ) -> Self {
        let mut rest = Vec::with_capacity(count);
        let mut scatter = Vec::with_capacity(count);
        let mut phase = Vec::with_capacity(count);
        let mut size = Vec::with_capacity(count);
        let mut category = Vec::with_capacity(count);

        for i in 0..count {
            rest.push(rest_at(rng, i));
            scatter.push(scatter_at(rng, i));
            phase.push(rng.gen_range(0.0..std::f32::consts::TAU));
            size.push(rng.gen_range(PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX));
            category.push(ColorCategory::pick(rng, &params.category_weights));
        }

        Self {
            params,
            rest,
            scatter,
            phase,
            size,
            category,
        }
    }

    pub fn len(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Evaluate one particle. `t` is seconds since the field was created.
    pub fn sample(
        &self,
        index: usize,
        t: f32,
        progress: f32,
        attractor: Option<&Attractor>,
    ) -> ParticleSample {
        let p = &self.params;
        let blend = smoothstep(0.0, 1.0, progress);
        let inverse = 1.0 - blend;
        let phase = self.phase[index];

        let scatter = self.scatter[index];
        let mut position = scatter.lerp(self.rest[index], blend);
        let radial = safe_normalize(scatter, Vec3::Y);

        position += radial * explosion_envelope(blend) * p.explosion_strength;

        if inverse > 0.0 {
            let chaos = Vec3::new(
                (t * 1.3 + phase * 2.1).sin(),
                (t * 0.9 + phase * 1.7).cos(),
                (t * 1.1 + phase * 3.1 + 1.0).sin(),
            );
            position += chaos * p.chaos_amplitude * inverse;
            position +=
                radial * (t * p.breath_frequency + phase).sin() * p.breath_amplitude * inverse;
        }

        if let (FieldKind::Dust, Some(attractor)) = (p.kind, attractor) {
            position = attractor.pull(position);
        }

        let base = p.palette[self.category[index].index()];
        let twinkle = 1.0 + p.twinkle_amount * (t * p.twinkle_frequency + phase * 10.0).sin();
        let fade_in = if p.fade_in_seconds > 0.0 {
            (t / p.fade_in_seconds).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let alpha = (p.scattered_alpha + (p.tree_alpha - p.scattered_alpha) * blend) * fade_in;

        let size_multiplier =
            p.scatter_size_multiplier + (p.tree_size_multiplier - p.scatter_size_multiplier) * blend;

        ParticleSample {
            position,
            colour: [base[0] * twinkle, base[1] * twinkle, base[2] * twinkle, alpha],
            size: self.size[index] * p.base_size * size_multiplier,
        }
    }

    /// Evaluate the whole field into `frame`. The frame is only resized when
    /// its length does not match the population.
    pub fn evaluate_into(
        &self,
        t: f32,
        progress: f32,
        attractor: Option<&Attractor>,
        frame: &mut ParticleFrame,
    ) {
        if frame.len() != self.len() {
            *frame = ParticleFrame::with_len(self.len());
        }
        for index in 0..self.len() {
            let sample = self.sample(index, t, progress, attractor);
            frame.positions[index] = sample.position;
            frame.colours[index] = sample.colour;
            frame.sizes[index] = sample.size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn foliage(count: usize) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(42);
        ParticleField::foliage(
            &mut rng,
            count,
            &LayoutConfig::default(),
            &ParticleConfig::default(),
        )
    }

    fn dust(count: usize) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(43);
        ParticleField::dust(
            &mut rng,
            count,
            &LayoutConfig::default(),
            &ParticleConfig::default(),
        )
    }

    #[test]
    fn burst_vanishes_at_both_extremes() {
        assert_eq!(explosion_envelope(0.0), 0.0);
        assert_eq!(explosion_envelope(1.0), 0.0);
        assert!((explosion_envelope(1.0 / 3.0) - 1.0).abs() < 1e-5);
        assert!(explosion_envelope(0.3) > explosion_envelope(0.6));
    }

    #[test]
    fn position_is_continuous_in_progress() {
        let field = foliage(64);
        let t = 3.7;
        let step = 1.0e-4;
        for index in 0..field.len() {
            let mut progress = 0.0f32;
            let mut previous = field.sample(index, t, progress, None).position;
            while progress < 1.0 {
                progress = (progress + step).min(1.0);
                let current = field.sample(index, t, progress, None).position;
                assert!(
                    previous.distance(current) < 0.02,
                    "jump at progress {progress} for particle {index}"
                );
                previous = current;
            }
        }
    }

    #[test]
    fn full_progress_lands_on_rest_position() {
        let field = foliage(32);
        for index in 0..field.len() {
            let sample = field.sample(index, 12.5, 1.0, None);
            assert!(sample.position.distance(field.rest[index]) < 1e-4);
        }
    }

    #[test]
    fn dense_field_converges_after_hundred_frame_ramp() {
        let field = foliage(FOLIAGE_COUNT);
        let mut frame = ParticleFrame::with_len(field.len());
        let frames = 100;
        for f in 0..frames {
            let progress = (f + 1) as f32 / frames as f32;
            field.evaluate_into(f as f32 / 60.0, progress, None, &mut frame);
        }
        for index in 0..field.len() {
            assert!(frame.positions[index].distance(field.rest[index]) < 1e-3);
        }
    }

    #[test]
    fn evaluation_reuses_frame_buffers() {
        let field = foliage(256);
        let mut frame = ParticleFrame::with_len(field.len());
        let positions = frame.positions.as_ptr();
        let colours = frame.colours.as_ptr();
        for f in 0..10 {
            field.evaluate_into(f as f32 * 0.016, 0.5, None, &mut frame);
        }
        assert_eq!(positions, frame.positions.as_ptr());
        assert_eq!(colours, frame.colours.as_ptr());
    }

    #[test]
    fn alpha_fades_in_and_is_lower_when_scattered() {
        let field = foliage(8);
        assert_eq!(field.sample(0, 0.0, 0.0, None).colour[3], 0.0);
        let scattered = field.sample(0, 10.0, 0.0, None).colour[3];
        let tree = field.sample(0, 10.0, 1.0, None).colour[3];
        assert!(scattered < tree);
    }

    #[test]
    fn particles_shrink_toward_the_tree() {
        let field = foliage(8);
        let scattered = field.sample(3, 5.0, 0.0, None).size;
        let tree = field.sample(3, 5.0, 1.0, None).size;
        assert!(tree < scattered);
    }

    #[test]
    fn output_stays_finite_for_every_particle() {
        let field = foliage(2_000);
        for index in 0..field.len() {
            for progress in [0.0, 0.2, 0.33, 0.5, 0.9, 1.0] {
                let s = field.sample(index, 1.0, progress, None);
                assert!(s.position.is_finite());
                assert!(s.colour.iter().all(|c| c.is_finite()));
            }
        }
    }

    #[test]
    fn attraction_pulls_nearby_dust_without_overshooting() {
        let attractor = Attractor::new(Vec3::ZERO, &ParticleConfig::default());
        let near = Vec3::new(1.0, 0.0, 0.0);
        let pulled = attractor.pull(near);
        assert!(pulled.length() < near.length());
        assert!(pulled.x >= 0.0);

        let far = Vec3::new(attractor.radius + 1.0, 0.0, 0.0);
        assert_eq!(attractor.pull(far), far);
    }

    #[test]
    fn attraction_only_affects_dust() {
        let tree = foliage(4);
        let attractor = Attractor::new(tree.rest[0], &ParticleConfig::default());
        let without = tree.sample(0, 2.0, 1.0, None);
        let with = tree.sample(0, 2.0, 1.0, Some(&attractor));
        assert_eq!(without.position, with.position);

        let ambient = dust(16);
        let target = ambient.sample(0, 2.0, 0.5, None).position + Vec3::X * 0.5;
        let attractor = Attractor::new(target, &ParticleConfig::default());
        let moved = ambient.sample(0, 2.0, 0.5, Some(&attractor)).position;
        let still = ambient.sample(0, 2.0, 0.5, None).position;
        assert!(moved.distance(target) < still.distance(target));
    }

    #[test]
    fn screen_size_shrinks_with_depth() {
        assert!(screen_point_size(0.1, 5.0) > screen_point_size(0.1, 20.0));
        assert_eq!(screen_point_size(0.1, 0.0), MAX_POINT_SIZE_PX);
    }

    #[test]
    fn category_pick_respects_zero_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(
                ColorCategory::pick(&mut rng, &[0.0, 1.0, 0.0]),
                ColorCategory::Secondary
            );
        }
        assert_eq!(
            ColorCategory::pick(&mut rng, &[0.0, 0.0, 0.0]),
            ColorCategory::Primary
        );
    }
}
