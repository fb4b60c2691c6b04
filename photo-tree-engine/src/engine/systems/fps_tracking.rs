use crate::engine::core::app_state::FpsText;
use crate::engine::morph::progress::MorphProgress;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::ornaments::state::OrnamentRegistry;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use constants::render_settings::STATS_INTERVAL;

pub fn smoothed_fps(diagnostics: &DiagnosticsStore) -> f32 {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0) as f32
}

/// Periodic frame rate and scene summary for the frontend.
pub fn scene_stats_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    morph: Res<MorphProgress>,
    registry: Res<OrnamentRegistry>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < STATS_INTERVAL {
        return;
    }
    *last_send_time = current_time;

    rpc_interface.send_notification(
        "scene_stats",
        serde_json::json!({
            "fps": smoothed_fps(&diagnostics),
            "progress": morph.progress(),
            "ornaments": registry.len(),
        }),
    );
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    morph: Res<MorphProgress>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        text.0 = format!(
            "FPS: {:.1}  morph: {:.2}",
            smoothed_fps(&diagnostics),
            morph.progress()
        );
    }
}
