use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::BACKGROUND_COLOUR;
// Crate engine modules
use crate::engine::camera::viewport_camera::{camera_controller, spawn_viewport_camera};
use crate::engine::core::app_state::{AppState, FrameSet};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::scene_config::{
    SceneConfig, SceneConfigLoader, finish_config_loading, start_config_loading,
};
use crate::engine::morph::progress::{
    MorphProgress, MorphStateRequest, advance_morph_progress, apply_morph_requests,
    handle_morph_shortcuts, init_morph_progress,
};
use crate::engine::particles::{ParticlePlugin, render::animate_particle_fields};
use crate::engine::scene::rotation::{SceneRoot, SceneRotation, update_scene_rotation};
use crate::engine::systems::fps_tracking::scene_stats_notification_system;
// Crate tools modules
use crate::tools::gesture::GesturePlugin;
use crate::tools::ornaments::{OrnamentPlugin, systems::animate_ornaments};
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::FpsText;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    let [r, g, b] = BACKGROUND_COLOUR;
    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .insert_resource(ClearColor(Color::srgb(r, g, b)))
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SceneConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SceneConfig>::new(&["config.json"]))
        .add_plugins(WebRpcPlugin);

    // Runtime frame ordering; nothing in these sets runs while loading.
    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::Morph,
            FrameSet::Interaction,
            FrameSet::Animate,
            FrameSet::Output,
        )
            .chain()
            .run_if(in_state(AppState::Running)),
    );

    app.add_plugins((ParticlePlugin, OrnamentPlugin, GesturePlugin));

    // Initialise resources early
    app.init_resource::<SceneConfigLoader>()
        .init_resource::<MorphProgress>()
        .init_resource::<SceneRotation>()
        .add_event::<MorphStateRequest>();

    app.add_systems(Startup, (setup, spawn_viewport_camera, start_config_loading))
        .add_systems(
            Update,
            finish_config_loading.run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), init_morph_progress);

    app.add_systems(
        Update,
        (
            handle_morph_shortcuts.in_set(FrameSet::Input),
            (apply_morph_requests, advance_morph_progress)
                .chain()
                .in_set(FrameSet::Morph),
            (
                camera_controller,
                // Animators read the root transform written here.
                update_scene_rotation
                    .before(animate_ornaments)
                    .before(animate_particle_fields),
            )
                .in_set(FrameSet::Animate),
            scene_stats_notification_system.in_set(FrameSet::Output),
        ),
    );

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system.in_set(FrameSet::Output));
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
}

fn spawn_scene_root(commands: &mut Commands) {
    commands.spawn((
        Name::new("scene_root"),
        SceneRoot,
        Transform::IDENTITY,
        Visibility::default(),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_scene_root(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.8, 0.5)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

