use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::director::Director;
use crate::engine::director::events::DirectorEvent;
use crate::engine::input::InputFrame;
use crate::engine::render::target::FramePlan;
use crate::engine::systems::input_sampling::{handle_director_shortcuts, sample_input};
use crate::engine::systems::view_slots::{apply_frame_plan, apply_gui_plan};

/// Director event re-published into the Bevy event queue.
#[derive(Event, Debug, Clone)]
pub struct DirectorNotice(pub DirectorEvent);

/// Targets the director composes into each frame.
#[derive(Resource, Default)]
pub struct FrameTargets {
    pub image: FramePlan,
    pub gui: FramePlan,
}

/// Drives an inserted `Director` resource once per frame.
pub struct DirectorPlugin;

impl Plugin for DirectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputFrame>()
            .init_resource::<FrameTargets>()
            .add_event::<DirectorNotice>()
            .add_systems(Startup, start_director)
            .add_systems(
                Update,
                (
                    sample_input,
                    handle_director_shortcuts,
                    advance_director,
                    compose_frame,
                    apply_frame_plan,
                    apply_gui_plan,
                    publish_director_events,
                )
                    .chain(),
            );
    }
}

fn start_director(director: Option<ResMut<Director>>) {
    let Some(mut director) = director else {
        warn!("DirectorPlugin added without a Director resource");
        return;
    };
    director.start();
}

fn advance_director(
    time: Res<Time>,
    input: Res<InputFrame>,
    director: Option<ResMut<Director>>,
) {
    if let Some(mut director) = director {
        director.update(time.delta_secs(), &input);
    }
}

/// Size the targets from the primary window and let the director compose.
fn compose_frame(
    windows: Query<&Window, With<PrimaryWindow>>,
    director: Option<ResMut<Director>>,
    mut targets: ResMut<FrameTargets>,
) {
    let Some(mut director) = director else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let (width, height) = (window.physical_width(), window.physical_height());

    let targets = &mut *targets;
    targets.image.resize(width, height);
    targets.image.begin_frame();
    targets.gui.resize(width, height);
    targets.gui.begin_frame();

    director.render_image(&mut targets.image);
    director.render_gui(&mut targets.gui);
}

fn publish_director_events(
    director: Option<ResMut<Director>>,
    mut notices: EventWriter<DirectorNotice>,
) {
    let Some(mut director) = director else {
        return;
    };
    for event in director.drain_published() {
        debug!("Director event: {:?}", event);
        notices.write(DirectorNotice(event));
    }
}
