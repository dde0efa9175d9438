use bevy::prelude::*;
use constants::settings_keys::DEFAULT_SETTINGS_FILE;

use observ3d_engine::config::{StereoConfig, ViewerConfig};
use observ3d_engine::engine::camera::animated::{AnimatedCamera, Keyframe};
use observ3d_engine::engine::camera::first_person::FirstPersonCamera;
use observ3d_engine::engine::camera::map::MapCamera;
use observ3d_engine::engine::camera::orbital::OrbitalCamera;
use observ3d_engine::engine::camera::panoramic::PanoramicCamera;
use observ3d_engine::engine::core::app_setup::create_app;
use observ3d_engine::engine::director::Director;
use observ3d_engine::engine::entity::lifecycle::Lifecycle;
use observ3d_engine::engine::output::mono::MonoOutput;
use observ3d_engine::engine::output::split_screen::SplitScreenOutput;
use observ3d_engine::engine::output::stereo::{StereoLayout, StereoOutput};
use observ3d_engine::engine::render::pose::{Lens, look_rotation};
use observ3d_engine::engine::transition::raycast::AabbRaycaster;
use observ3d_engine::error::ViewerError;

/// Obstacles of the demo scene as (centre, half extents).
const BUILDINGS: [(Vec3, Vec3); 4] = [
    (Vec3::new(0.0, 10.0, 0.0), Vec3::new(8.0, 10.0, 8.0)),
    (Vec3::new(40.0, 15.0, -20.0), Vec3::new(6.0, 15.0, 6.0)),
    (Vec3::new(-35.0, 6.0, 25.0), Vec3::new(10.0, 6.0, 5.0)),
    (Vec3::new(20.0, 4.0, 45.0), Vec3::new(4.0, 4.0, 12.0)),
];

#[derive(Resource)]
struct SceneBuildings(Vec<(Vec3, Vec3)>);

fn main() {
    let (config, config_error) = load_config(std::env::args().nth(1));
    let director = build_director(config);

    // Logging exists once the default plugins are built.
    let mut app = create_app(director);
    if let Some(e) = config_error {
        warn!("{e}; using default configuration");
    }
    app.insert_resource(SceneBuildings(BUILDINGS.to_vec()))
        .add_systems(Startup, spawn_scene);

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

/// Optional JSON config path as the first argument; defaults otherwise,
/// handing back the load failure for logging.
fn load_config(path: Option<String>) -> (ViewerConfig, Option<ViewerError>) {
    let (mut config, error) = match path {
        Some(path) => match ViewerConfig::from_path(&path) {
            Ok(config) => (config, None),
            Err(e) => (ViewerConfig::default(), Some(e)),
        },
        None => (ViewerConfig::default(), None),
    };

    #[cfg(not(target_arch = "wasm32"))]
    if config.settings_path.is_none() {
        config.settings_path = Some(DEFAULT_SETTINGS_FILE.into());
    }

    (config, error)
}

fn build_director(config: ViewerConfig) -> Director {
    let stereo: StereoConfig = config.stereo;
    let mut director = Director::from_config(config);

    let raycaster = BUILDINGS
        .iter()
        .fold(AabbRaycaster::new(), |r, (centre, half)| r.with_box(*centre, *half));
    director.set_raycaster(Box::new(raycaster));

    director.add_camera(Box::new(
        OrbitalCamera::new(Lifecycle::new("orbit").as_default(), Vec3::ZERO, 120.0)
            .with_angles(0.6, -0.5),
    ));
    director.add_camera(Box::new(
        PanoramicCamera::new(Lifecycle::new("plaza"), Vec3::new(60.0, 2.0, 60.0))
            .facing(0.8, 0.0),
    ));
    director.add_camera(Box::new(FirstPersonCamera::new(
        Lifecycle::new("walk"),
        Vec3::new(-60.0, 2.0, -10.0),
    )));
    director.add_camera(Box::new(
        MapCamera::new(Lifecycle::new("map"), Vec3::ZERO, 300.0).with_size(90.0),
    ));
    director.add_camera(Box::new(AnimatedCamera::new(
        Lifecycle::new("tour"),
        tour_keyframes(),
    )));

    director.add_output(Box::new(MonoOutput::default()));
    director.add_output(Box::new(StereoOutput::new(
        Lifecycle::new("stereo"),
        StereoLayout::SideBySide,
        stereo,
    )));
    director.add_output(Box::new(StereoOutput::new(
        Lifecycle::new("stereo-tb"),
        StereoLayout::TopBottom,
        stereo,
    )));
    director.add_output(Box::new(SplitScreenOutput::default()));

    director
}

fn tour_keyframes() -> Vec<Keyframe> {
    let stops = [
        (0.0, Vec3::new(80.0, 30.0, 80.0)),
        (6.0, Vec3::new(-80.0, 20.0, 60.0)),
        (12.0, Vec3::new(-60.0, 40.0, -80.0)),
        (18.0, Vec3::new(80.0, 30.0, 80.0)),
    ];
    stops
        .into_iter()
        .map(|(time, position)| Keyframe {
            time,
            position,
            rotation: look_rotation(-position),
            lens: Lens::Perspective { fov_degrees: 55.0 },
        })
        .collect()
}

fn spawn_scene(
    mut commands: Commands,
    buildings: Res<SceneBuildings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(400.0, 400.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
    ));

    let material = materials.add(Color::srgb(0.7, 0.7, 0.75));
    for (centre, half) in &buildings.0 {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(*half * 2.0))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(*centre),
        ));
    }
}
