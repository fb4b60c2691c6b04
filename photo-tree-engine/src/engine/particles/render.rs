use super::field::{Attractor, ParticleField, ParticleFrame, screen_point_size};
use crate::engine::loading::scene_config::SceneConfig;
use crate::engine::morph::progress::MorphProgress;
use crate::engine::scene::rotation::SceneRoot;
use crate::tools::ornaments::drag::DragPlane;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::render::view::NoFrustumCulling;
use bevy::window::PrimaryWindow;
use constants::particles::PERSPECTIVE_SCALE;

/// Vertices per particle: two triangles forming a camera-facing quad.
pub const VERTICES_PER_PARTICLE: usize = 6;

const QUAD_CORNERS: [Vec2; VERTICES_PER_PARTICLE] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
];

/// A particle field with its reusable frame buffers.
#[derive(Component)]
pub struct ParticleCloud {
    field: ParticleField,
    frame: ParticleFrame,
    /// Elapsed seconds when the field was created; drives the fade-in.
    born_at: f32,
}

impl ParticleCloud {
    pub fn new(field: ParticleField, born_at: f32) -> Self {
        let frame = ParticleFrame::with_len(field.len());
        Self {
            field,
            frame,
            born_at,
        }
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }
}

/// Camera frame expressed in the field's local space.
#[derive(Debug, Clone, Copy)]
pub struct QuadBasis {
    pub eye: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl QuadBasis {
    pub fn from_camera(camera: &Transform, field_from_world: &Transform) -> Self {
        let inverse = field_from_world.rotation.inverse();
        Self {
            eye: inverse * (camera.translation - field_from_world.translation),
            forward: inverse * camera.forward().as_vec3(),
            right: inverse * camera.right().as_vec3(),
            up: inverse * camera.up().as_vec3(),
        }
    }
}

/// Cursor attraction point in world space; `None` while the cursor is away.
#[derive(Resource, Debug, Default)]
pub struct DustAttractor(pub Option<Vec3>);

/// Particle mesh with zeroed vertex buffers that are rewritten every frame.
pub fn create_particle_mesh(particle_count: usize) -> Mesh {
    let vertex_count = particle_count * VERTICES_PER_PARTICLE;
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, vec![[0.0f32; 3]; vertex_count])
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, vec![[0.0f32; 4]; vertex_count])
}

/// Expand each particle into a quad facing the camera. Quads are sized in
/// world units, clamped so no particle exceeds the maximum on-screen size.
pub fn write_quad_positions(frame: &ParticleFrame, basis: &QuadBasis, out: &mut [[f32; 3]]) {
    for (index, quad) in out.chunks_exact_mut(VERTICES_PER_PARTICLE).enumerate() {
        let Some(centre) = frame.positions.get(index).copied() else {
            break;
        };
        let depth = (centre - basis.eye).dot(basis.forward);
        let size = frame.sizes[index];
        let half = if depth > 0.0 {
            screen_point_size(size, depth) * depth / PERSPECTIVE_SCALE * 0.5
        } else {
            // behind the camera: collapse
            0.0
        };
        for (vertex, corner) in quad.iter_mut().zip(QUAD_CORNERS) {
            let p = centre + (basis.right * corner.x + basis.up * corner.y) * half;
            *vertex = p.to_array();
        }
    }
}

pub fn write_quad_colours(frame: &ParticleFrame, out: &mut [[f32; 4]]) {
    for (quad, colour) in out
        .chunks_exact_mut(VERTICES_PER_PARTICLE)
        .zip(frame.colours.iter())
    {
        quad.fill(*colour);
    }
}

pub fn spawn_particle_fields(
    config: Res<SceneConfig>,
    time: Res<Time>,
    roots: Query<Entity, With<SceneRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut commands: Commands,
) {
    let Ok(root) = roots.single() else {
        warn!("No scene root; particle fields not spawned");
        return;
    };
    let mut rng = rand::thread_rng();
    let born_at = time.elapsed_secs();

    let fields = [
        (
            "foliage",
            ParticleField::foliage(
                &mut rng,
                config.particles.foliage_count,
                &config.layout,
                &config.particles,
            ),
        ),
        (
            "dust",
            ParticleField::dust(
                &mut rng,
                config.particles.dust_count,
                &config.layout,
                &config.particles,
            ),
        ),
    ];

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    for (name, field) in fields {
        info!("Spawning {} particle field with {} particles", name, field.len());
        let mesh = meshes.add(create_particle_mesh(field.len()));
        commands.spawn((
            Name::new(format!("particles:{name}")),
            Mesh3d(mesh),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            NoFrustumCulling,
            ParticleCloud::new(field, born_at),
            ChildOf(root),
        ));
    }
}

/// Project the cursor onto a camera-facing plane through the scene origin.
pub fn update_dust_attractor(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    mut attractor: ResMut<DustAttractor>,
) {
    let point = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .zip(cameras.single().ok())
        .and_then(|(cursor, (cam_xf, camera))| {
            let ray = camera.viewport_to_world(cam_xf, cursor).ok()?;
            let plane = DragPlane::facing(Vec3::ZERO, cam_xf.translation())?;
            plane.intersect(ray.origin, ray.direction.as_vec3())
        });
    if attractor.0 != point {
        attractor.0 = point;
    }
}

pub fn animate_particle_fields(
    time: Res<Time>,
    morph: Res<MorphProgress>,
    config: Res<SceneConfig>,
    attractor: Res<DustAttractor>,
    cameras: Query<&Transform, (With<Camera3d>, Without<SceneRoot>)>,
    roots: Query<&Transform, With<SceneRoot>>,
    mut clouds: Query<(&mut ParticleCloud, &Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let root = roots.single().copied().unwrap_or_default();
    let basis = QuadBasis::from_camera(camera, &root);
    let local_attractor = attractor.0.map(|world| {
        let local = root.compute_affine().inverse().transform_point3(world);
        Attractor::new(local, &config.particles)
    });

    let now = time.elapsed_secs();
    let progress = morph.progress();

    for (mut cloud, mesh_handle) in &mut clouds {
        let cloud = &mut *cloud;
        cloud.field.evaluate_into(
            now - cloud.born_at,
            progress,
            local_attractor.as_ref(),
            &mut cloud.frame,
        );

        let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
            continue;
        };
        if let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
        {
            write_quad_positions(&cloud.frame, &basis, positions);
        }
        if let Some(VertexAttributeValues::Float32x4(colours)) =
            mesh.attribute_mut(Mesh::ATTRIBUTE_COLOR)
        {
            write_quad_colours(&cloud.frame, colours);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> ParticleFrame {
        let mut frame = ParticleFrame::with_len(2);
        frame.positions = vec![Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0)];
        frame.colours = vec![[1.0, 0.0, 0.0, 0.5], [0.0, 1.0, 0.0, 1.0]];
        frame.sizes = vec![0.2, 0.4];
        frame
    }

    fn basis() -> QuadBasis {
        QuadBasis {
            eye: Vec3::new(0.0, 0.0, 10.0),
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }

    #[test]
    fn mesh_has_six_vertices_per_particle() {
        let mesh = create_particle_mesh(10);
        assert_eq!(mesh.count_vertices(), 60);
    }

    #[test]
    fn quads_are_centred_on_particles() {
        let frame = frame();
        let mut positions = vec![[0.0; 3]; 12];
        write_quad_positions(&frame, &basis(), &mut positions);

        for (index, quad) in positions.chunks_exact(6).enumerate() {
            let centre = quad[..3]
                .iter()
                .chain(&quad[5..6])
                .map(|p| Vec3::from_array(*p))
                .sum::<Vec3>()
                / 4.0;
            assert!(centre.distance(frame.positions[index]) < 1e-5);
        }
        // first quad: 0.2 wide, facing +Z
        let width = positions[1][0] - positions[0][0];
        assert!((width - 0.2).abs() < 1e-5);
        assert!(positions[..6].iter().all(|p| p[2].abs() < 1e-6));
    }

    #[test]
    fn particles_behind_camera_collapse() {
        let mut frame = frame();
        frame.positions[0] = Vec3::new(0.0, 0.0, 20.0);
        let mut positions = vec![[9.0; 3]; 12];
        write_quad_positions(&frame, &basis(), &mut positions);
        assert!(positions[..6].iter().all(|p| *p == [0.0, 0.0, 20.0]));
    }

    #[test]
    fn colours_fill_every_vertex_of_a_quad() {
        let frame = frame();
        let mut colours = vec![[0.0; 4]; 12];
        write_quad_colours(&frame, &mut colours);
        assert!(colours[..6].iter().all(|c| *c == [1.0, 0.0, 0.0, 0.5]));
        assert!(colours[6..].iter().all(|c| *c == [0.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn basis_follows_scene_rotation() {
        let camera = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
        let root = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let basis = QuadBasis::from_camera(&camera, &root);
        // the camera sits on world +Z, which is root-local -X after a quarter turn
        assert!(basis.eye.distance(Vec3::new(-10.0, 0.0, 0.0)) < 1e-4);
        assert!(basis.forward.distance(Vec3::X) < 1e-4);
    }
}
