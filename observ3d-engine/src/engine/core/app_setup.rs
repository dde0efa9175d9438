use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

use crate::engine::core::window_config::create_window_config;
use crate::engine::director::Director;
use crate::engine::systems::director_systems::DirectorPlugin;
use crate::engine::systems::status_overlay::{
    fps_notification_system, spawn_status_overlay, status_text_update_system,
};
use crate::engine::systems::view_slots::spawn_clear_slot;
use crate::rpc::remote_control::RemoteControlPlugin;

/// Build the viewer app around a configured, not yet started director.
pub fn create_app(director: Director) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .insert_resource(director)
        .add_plugins(DirectorPlugin)
        .add_plugins(RemoteControlPlugin);

    app.add_systems(Startup, setup).add_systems(
        Update,
        (status_text_update_system, fps_notification_system),
    );

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_clear_slot(&mut commands);
    spawn_status_overlay(&mut commands);
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
