use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::director::Director;
use crate::engine::systems::view_slots::GuiRoot;
use crate::rpc::remote_control::RemoteControl;

/// Text line showing the active camera, output and frame rate.
#[derive(Component)]
pub struct StatusText;

pub fn spawn_status_overlay(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            GuiRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 1., 1.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

pub fn status_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    director: Option<Res<Director>>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let Some(director) = director else {
        return;
    };
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    let camera = match director.transition() {
        Some(transition) => format!("-> {}", transition.destination),
        None => director.active_camera_id().unwrap_or("none").to_string(),
    };
    let output = director.active_output_id().unwrap_or("none");

    for mut text in &mut query {
        text.0 = format!("Camera: {camera} | Output: {output} | FPS: {fps:.1}");
    }
}

pub fn fps_notification_system(
    mut remote: ResMut<RemoteControl>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    // Send FPS every 0.5 seconds
    if current_time - *last_send_time >= 0.5 {
        if let Some(value) = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|fps| fps.smoothed())
        {
            remote.send_notification("fps_update", serde_json::json!({ "fps": value as f32 }));
            *last_send_time = current_time;
        }
    }
}
