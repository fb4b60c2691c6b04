use super::drag::{OrnamentInteraction, SetRestPosition};
use super::motion::{OrnamentClock, billboard_rotation, step_ornament};
use super::ray::pick_closest;
use super::state::{Ornament, OrnamentRegistry, PhotoDiff, PhotoListEvent, diff_photo_sources};
use crate::engine::loading::scene_config::SceneConfig;
use crate::engine::morph::progress::MorphProgress;
use crate::engine::scene::rotation::SceneRoot;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;
use constants::ornament::{HOVER_GLOW, ORNAMENT_HEIGHT, ORNAMENT_PICK_DEPTH, ORNAMENT_WIDTH};
use constants::render_settings::CAMERA_START;

/// Quad mesh shared by every ornament.
#[derive(Resource)]
pub struct OrnamentAssets {
    pub quad: Handle<Mesh>,
}

pub fn setup_ornament_assets(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let quad = meshes.add(Rectangle::new(ORNAMENT_WIDTH, ORNAMENT_HEIGHT));
    commands.insert_resource(OrnamentAssets { quad });
}

/// Queue the configured start-up photos.
pub fn seed_initial_photos(config: Res<SceneConfig>, mut events: EventWriter<PhotoListEvent>) {
    if config.photos.is_empty() {
        return;
    }
    info!("Hanging {} configured photos", config.photos.len());
    for source in &config.photos {
        events.write(PhotoListEvent::Add(source.as_str().into()));
    }
}

pub fn handle_photo_list_events(
    mut events: EventReader<PhotoListEvent>,
    mut registry: ResMut<OrnamentRegistry>,
    mut interaction: ResMut<OrnamentInteraction>,
    ornament_assets: Res<OrnamentAssets>,
    config: Res<SceneConfig>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    roots: Query<Entity, With<SceneRoot>>,
    mut commands: Commands,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Ok(root) = roots.single() else {
        return;
    };
    let mut rng = rand::thread_rng();

    for event in events.read() {
        let diff = match event {
            PhotoListEvent::Replace(sources) => diff_photo_sources(registry.sources(), sources),
            PhotoListEvent::Add(source) => PhotoDiff {
                added: vec![source.clone()],
                removed: Vec::new(),
            },
            PhotoListEvent::Remove(source) => PhotoDiff {
                added: Vec::new(),
                removed: vec![source.clone()],
            },
        };

        for source in diff.removed {
            let Some(entity) = registry.remove(&source) else {
                continue;
            };
            if interaction.forget(entity) {
                rpc_interface.send_notification(
                    "drag_state_changed",
                    serde_json::json!({ "dragging": false }),
                );
            }
            commands.entity(entity).despawn();
            info!("Removed ornament {}", source);
        }

        for source in diff.added {
            if registry.contains(&source) {
                continue;
            }
            let ornament = Ornament::new(&mut rng, source.clone(), &config.layout);
            let material = materials.add(StandardMaterial {
                base_color: Color::linear_rgba(1.0, 1.0, 1.0, 0.0),
                base_color_texture: Some(asset_server.load(source.as_str().to_owned())),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                ..default()
            });
            let entity = commands
                .spawn((
                    Name::new(format!("ornament:{source}")),
                    Mesh3d(ornament_assets.quad.clone()),
                    MeshMaterial3d(material),
                    Transform::from_translation(ornament.position).with_scale(Vec3::ZERO),
                    ornament,
                    ChildOf(root),
                ))
                .id();
            registry.insert(source.clone(), entity);
            info!("Added ornament {}", source);
        }
    }
}

/// Hover picking, drag start/move/end and double-click detection.
pub fn handle_ornament_pointer(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    roots: Query<&Transform, With<SceneRoot>>,
    ornaments: Query<(Entity, &GlobalTransform, &Ornament)>,
    time: Res<Time>,
    mut interaction: ResMut<OrnamentInteraction>,
    mut rest_positions: EventWriter<SetRestPosition>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if buttons.just_released(MouseButton::Left) {
        if let Some(release) = interaction.pointer_up(time.elapsed_secs_f64()) {
            rpc_interface.send_notification(
                "drag_state_changed",
                serde_json::json!({ "dragging": false }),
            );
            if release.double_click {
                if let Ok((_, _, ornament)) = ornaments.get(release.entity) {
                    info!("Photo clicked: {}", ornament.source);
                    rpc_interface.send_notification(
                        "photo_clicked",
                        serde_json::json!({ "source": ornament.source }),
                    );
                }
            }
        }
    }

    let Ok(window) = windows.single() else { return };
    let Ok((cam_xf, camera)) = cameras.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        if !interaction.is_dragging() {
            interaction.set_hovered(None);
        }
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_xf, cursor) else {
        return;
    };
    let origin = ray.origin;
    let dir = ray.direction.as_vec3();

    if interaction.is_dragging() {
        let parent_from_world = roots
            .single()
            .map(|root| root.compute_affine().inverse())
            .unwrap_or_default();
        if let Some(command) = interaction.pointer_move(origin, dir, cursor, &parent_from_world) {
            rest_positions.write(command);
        }
        return;
    }

    let size = Vec3::new(ORNAMENT_WIDTH, ORNAMENT_HEIGHT, ORNAMENT_PICK_DEPTH);
    let hit = pick_closest(origin, dir, size, ornaments.iter().map(|(e, xf, _)| (e, xf)));
    interaction.set_hovered(hit.map(|(entity, _)| entity));

    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some((entity, t)) = hit else { return };
    let Ok((_, ornament_xf, ornament)) = ornaments.get(entity) else {
        return;
    };
    if interaction.pointer_down(
        entity,
        ornament_xf.translation(),
        origin + dir * t,
        cam_xf.translation(),
        cursor,
    ) {
        debug!("Drag started on {}", ornament.source);
        rpc_interface.send_notification(
            "drag_state_changed",
            serde_json::json!({ "dragging": true }),
        );
    }
}

/// `Escape` abandons the current drag.
pub fn cancel_drag_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut interaction: ResMut<OrnamentInteraction>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if keyboard.just_pressed(KeyCode::Escape) && interaction.cancel().is_some() {
        rpc_interface.send_notification(
            "drag_state_changed",
            serde_json::json!({ "dragging": false }),
        );
    }
}

pub fn apply_rest_positions(
    mut commands: EventReader<SetRestPosition>,
    mut ornaments: Query<&mut Ornament>,
) {
    for command in commands.read() {
        if let Ok(mut ornament) = ornaments.get_mut(command.entity) {
            ornament.tree_position = command.position;
        }
    }
}

pub fn sync_interaction_flags(
    interaction: Res<OrnamentInteraction>,
    mut ornaments: Query<(Entity, &mut Ornament)>,
) {
    let dragged = interaction.dragged();
    let hovered = interaction.hovered();
    let carried = interaction.is_moving();
    for (entity, mut ornament) in &mut ornaments {
        let dragging = dragged == Some(entity);
        let moving = dragging && carried;
        let is_hovered = hovered == Some(entity);
        if ornament.dragging != dragging
            || ornament.moving != moving
            || ornament.hovered != is_hovered
        {
            ornament.dragging = dragging;
            ornament.moving = moving;
            ornament.hovered = is_hovered;
        }
    }
}

pub fn animate_ornaments(
    time: Res<Time>,
    morph: Res<MorphProgress>,
    config: Res<SceneConfig>,
    cameras: Query<&Transform, (With<Camera3d>, Without<Ornament>)>,
    roots: Query<&Transform, (With<SceneRoot>, Without<Ornament>)>,
    mut ornaments: Query<(&mut Ornament, &mut Transform), (Without<SceneRoot>, Without<Camera3d>)>,
) {
    let clock = OrnamentClock {
        t: time.elapsed_secs(),
        dt: time.delta_secs(),
        progress: morph.progress(),
    };
    let camera_position = cameras
        .single()
        .map(|camera| camera.translation)
        .unwrap_or(CAMERA_START);
    let root = roots.single().copied().unwrap_or_default();

    for (mut ornament, mut transform) in &mut ornaments {
        let pose = step_ornament(&mut ornament, &clock, &config.ornaments);
        transform.translation = pose.translation;
        transform.scale = Vec3::splat(pose.scale);
        transform.rotation = billboard_rotation(
            root.transform_point(pose.translation),
            camera_position,
            root.rotation,
        );
    }
}

/// Push opacity and hover glow into each ornament's material.
pub fn update_ornament_materials(
    ornaments: Query<(&Ornament, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (ornament, material) in &ornaments {
        let glow = if ornament.hovered || ornament.dragging {
            1.0 + HOVER_GLOW
        } else {
            1.0
        };
        let colour = Color::linear_rgba(glow, glow, glow, ornament.opacity.clamp(0.0, 1.0));

        let unchanged = materials
            .get(&material.0)
            .is_some_and(|m| m.base_color == colour);
        if unchanged {
            continue;
        }
        if let Some(m) = materials.get_mut(&material.0) {
            m.base_color = colour;
        }
    }
}

pub fn update_cursor_icon(
    interaction: Res<OrnamentInteraction>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
    mut current: Local<Option<SystemCursorIcon>>,
) {
    let wanted = if interaction.is_dragging() {
        SystemCursorIcon::Grabbing
    } else if interaction.hovered().is_some() {
        SystemCursorIcon::Pointer
    } else {
        SystemCursorIcon::Default
    };
    if *current == Some(wanted) {
        return;
    }
    let Ok(window) = windows.single() else { return };
    commands.entity(window).insert(CursorIcon::from(wanted));
    *current = Some(wanted);
}
