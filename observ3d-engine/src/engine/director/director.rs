use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use constants::render_settings::CLEAR_FRAME_COLOR;
use constants::settings_keys::LAST_OUTPUT_KIND;
use std::collections::VecDeque;

use super::compositor::Compositor;
use super::coordinator::{Coordinator, CoordinatorEvent};
use super::events::{
    DirectorEvent, DirectorRequest, EventBus, Observer, RequestQueue, SubscriptionId,
};
use crate::config::ViewerConfig;
use crate::engine::camera::SceneCamera;
use crate::engine::camera::transition::{
    CompletionCallback, FinishedTransition, TRANSITION_CAMERA_ID, TransitionCamera,
    TransitionState,
};
use crate::engine::entity::lifecycle::{Activatable, EntityFamily, EntityId, LifecyclePhase};
use crate::engine::input::InputFrame;
use crate::engine::output::OutputMode;
use crate::engine::render::pose::CameraPose;
use crate::engine::render::target::RenderTarget;
use crate::engine::settings::{JsonFileSettings, MemorySettings, SettingsStore};
use crate::engine::transition::planner::TransitionPlanner;
use crate::engine::transition::raycast::{NoObstacles, Raycaster};

/// Requests handled per flush before the rest are dropped as a loop.
const MAX_REQUESTS_PER_FLUSH: usize = 64;

/// Application context owning the camera and output coordinators.
///
/// All state changes go through here: coordinator operations produce ordered
/// lifecycle events, the director reacts to them (attach, detach, clear,
/// persist), then notifies observers. Requests observers make while being
/// notified run after the current operation has finished.
#[derive(Resource)]
pub struct Director {
    config: ViewerConfig,
    cameras: Coordinator<dyn SceneCamera>,
    outputs: Coordinator<dyn OutputMode>,
    compositor: Compositor,
    planner: TransitionPlanner,
    raycaster: Box<dyn Raycaster>,
    settings: Box<dyn SettingsStore>,
    bus: EventBus,
    requests: RequestQueue,
    pending: VecDeque<DirectorRequest>,
    flushing: bool,
    published: Vec<DirectorEvent>,
}

impl Director {
    pub fn new(
        config: ViewerConfig,
        settings: Box<dyn SettingsStore>,
        raycaster: Box<dyn Raycaster>,
    ) -> Self {
        let mut cameras: Coordinator<dyn SceneCamera> = Coordinator::new(EntityFamily::Camera);
        cameras.register(Box::new(TransitionCamera::default()));

        Self {
            planner: TransitionPlanner::new(config.transition),
            config,
            cameras,
            outputs: Coordinator::new(EntityFamily::Output),
            compositor: Compositor::default(),
            raycaster,
            settings,
            bus: EventBus::default(),
            requests: RequestQueue::default(),
            pending: VecDeque::new(),
            flushing: false,
            published: Vec::new(),
        }
    }

    /// Director with settings taken from `config.settings_path`, in memory
    /// when none is set, and a scene without obstacles.
    pub fn from_config(config: ViewerConfig) -> Self {
        let settings: Box<dyn SettingsStore> = match &config.settings_path {
            Some(path) => Box::new(JsonFileSettings::open_or_empty(path)),
            None => Box::new(MemorySettings::default()),
        };
        Self::new(config, settings, Box::new(NoObstacles))
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn set_raycaster(&mut self, raycaster: Box<dyn Raycaster>) {
        self.raycaster = raycaster;
    }

    // Registration

    pub fn add_camera(&mut self, camera: Box<dyn SceneCamera>) -> EntityId {
        self.cameras.register(camera)
    }

    pub fn add_output(&mut self, output: Box<dyn OutputMode>) -> EntityId {
        self.outputs.register(output)
    }

    /// Deactivate and drop a camera. A flight heading to it is abandoned.
    pub fn remove_camera(&mut self, id: &str) -> bool {
        if id == TRANSITION_CAMERA_ID || self.cameras.get(id).is_none() {
            return false;
        }
        if self.transition().is_some_and(|t| t.destination == id) {
            self.cancel_transition();
        }
        if let Some(events) = self.cameras.deactivate_by_id(id) {
            self.apply(events);
        }
        let removed = self.cameras.unregister(id).is_some();
        self.flush_requests();
        removed
    }

    pub fn remove_output(&mut self, id: &str) -> bool {
        let Some(events) = self.outputs.deactivate_by_id(id) else {
            return false;
        };
        self.apply(events);
        let removed = self.outputs.unregister(id).is_some();
        self.flush_requests();
        removed
    }

    // Coordinator operations

    /// Activate one output (the persisted kind when registered), then one
    /// camera (the configured default when registered).
    pub fn start(&mut self) {
        let last_kind = self.settings.get(LAST_OUTPUT_KIND);
        let events = self.outputs.start(last_kind.as_deref());
        self.apply(events);

        let default_camera = self.config.default_camera.clone();
        let events = self.cameras.start(default_camera.as_deref());
        self.apply(events);

        info!(
            "Director started with camera {:?} and output {:?}",
            self.cameras.active_id(),
            self.outputs.active_id()
        );
        self.flush_requests();
    }

    /// Switch cameras immediately. False when the id is unknown or disabled.
    pub fn activate_camera(&mut self, id: &str) -> bool {
        if id == TRANSITION_CAMERA_ID {
            warn!("The transition camera is driven by go_to only");
            return false;
        }
        let Some(events) = self.cameras.activate_by_id(id) else {
            return false;
        };
        self.apply(events);
        self.flush_requests();
        true
    }

    /// Switch outputs. False when the id is unknown or disabled.
    pub fn activate_output(&mut self, id: &str) -> bool {
        let Some(events) = self.outputs.activate_by_id(id) else {
            return false;
        };
        self.apply(events);
        self.flush_requests();
        true
    }

    pub fn deactivate_all_cameras(&mut self) {
        let events = self.cameras.deactivate_all();
        self.apply(events);
        self.flush_requests();
    }

    pub fn deactivate_all_outputs(&mut self) {
        let events = self.outputs.deactivate_all();
        self.apply(events);
        self.flush_requests();
    }

    pub fn set_camera_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(events) = self.cameras.set_enabled(id, enabled) else {
            return false;
        };
        self.apply(events);
        self.flush_requests();
        true
    }

    pub fn set_output_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(events) = self.outputs.set_enabled(id, enabled) else {
            return false;
        };
        self.apply(events);
        self.flush_requests();
        true
    }

    pub fn available_cameras(&self) -> Vec<EntityId> {
        self.cameras.available()
    }

    pub fn available_outputs(&self) -> Vec<EntityId> {
        self.outputs.available()
    }

    pub fn active_camera_id(&self) -> Option<&str> {
        self.cameras.active_id()
    }

    pub fn active_output_id(&self) -> Option<&str> {
        self.outputs.active_id()
    }

    pub fn camera(&self, id: &str) -> Option<&dyn SceneCamera> {
        self.cameras.get(id)
    }

    pub fn output(&self, id: &str) -> Option<&dyn OutputMode> {
        self.outputs.get(id)
    }

    pub fn camera_as_mut<C: Activatable>(&mut self, id: &str) -> Option<&mut C> {
        self.cameras.get_as_mut::<C>(id)
    }

    pub fn output_as_mut<C: Activatable>(&mut self, id: &str) -> Option<&mut C> {
        self.outputs.get_as_mut::<C>(id)
    }

    /// Pose the compositor would render from right now.
    pub fn active_pose(&self) -> Option<CameraPose> {
        self.cameras.active().map(|c| c.pose())
    }

    // Transitions

    /// Fly from the active camera to `id`, then activate it.
    ///
    /// A flight already in progress is replaced and its callback dropped;
    /// the new flight starts from the current in-flight pose. Without an
    /// active camera, or when `id` is already active, the switch is
    /// immediate. False when `id` is unknown or disabled.
    pub fn go_to(&mut self, id: &str, on_complete: Option<CompletionCallback>) -> bool {
        if id == TRANSITION_CAMERA_ID {
            warn!("Cannot fly to the transition camera");
            return false;
        }
        let Some(destination) = self.cameras.get(id) else {
            warn!("Unknown camera '{}'", id);
            return false;
        };
        if !destination.lifecycle().is_enabled() {
            warn!("Camera '{}' is disabled", id);
            return false;
        }
        let destination_pose = destination.pose();

        let origin = self
            .cameras
            .active()
            .filter(|active| active.id() != id)
            .map(|active| active.pose());
        let Some(origin) = origin else {
            self.land(id, on_complete);
            self.flush_requests();
            return true;
        };

        let plan = self
            .planner
            .plan(&origin, &destination_pose, self.raycaster.as_ref());
        let (path, duration) = (plan.kind, plan.duration());

        let Some(transition) = self
            .cameras
            .get_as_mut::<TransitionCamera>(TRANSITION_CAMERA_ID)
        else {
            warn!("Transition camera missing; switching directly");
            self.land(id, on_complete);
            self.flush_requests();
            return true;
        };
        if transition.begin(TransitionState::new(plan, id, on_complete)) {
            info!("Previous transition preempted");
        }

        if self.cameras.active_id() != Some(TRANSITION_CAMERA_ID) {
            if let Some(events) = self.cameras.activate_by_id(TRANSITION_CAMERA_ID) {
                self.apply(events);
            }
        }

        info!("Transition to '{}' started ({:?}, {:.2}s)", id, path, duration);
        self.emit(DirectorEvent::TransitionStarted {
            destination: id.to_string(),
            path,
            duration,
        });
        self.flush_requests();
        true
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition().is_some()
    }

    /// The flight in progress, if any.
    pub fn transition(&self) -> Option<&TransitionState> {
        self.cameras
            .get(TRANSITION_CAMERA_ID)?
            .as_any()
            .downcast_ref::<TransitionCamera>()?
            .state()
    }

    /// Abandon the flight in progress without activating its destination.
    pub fn cancel_transition(&mut self) {
        let Some(transition) = self
            .cameras
            .get_as_mut::<TransitionCamera>(TRANSITION_CAMERA_ID)
        else {
            return;
        };
        if let Some(destination) = transition.cancel() {
            info!("Transition to '{}' cancelled", destination);
        }
        if let Some(events) = self.cameras.deactivate_by_id(TRANSITION_CAMERA_ID) {
            self.apply(events);
        }
        self.flush_requests();
    }

    // Frame phases

    /// Feed input to the active camera and land a finished flight.
    pub fn update(&mut self, dt: f32, input: &InputFrame) {
        if let Some(camera) = self.cameras.active_mut() {
            camera.update(input, dt);
        }

        let finished = self
            .cameras
            .get_as_mut::<TransitionCamera>(TRANSITION_CAMERA_ID)
            .and_then(TransitionCamera::take_finished);
        if let Some(FinishedTransition {
            destination,
            on_complete,
        }) = finished
        {
            if !self.land(&destination, on_complete) {
                warn!("Transition destination '{}' is gone or disabled", destination);
                let events = self.cameras.start(None);
                self.apply(events);
            }
        }

        self.flush_requests();
    }

    /// Compose the active output into `destination`.
    ///
    /// A size change is announced before drawing. The frame right after an
    /// output switch, or any frame without an output or camera, is cleared
    /// to opaque black instead.
    pub fn render_image(&mut self, destination: &mut dyn RenderTarget) {
        let (width, height) = (destination.width(), destination.height());
        if self.compositor.track_size(width, height) {
            debug!("Render size changed to {}x{}", width, height);
            self.emit(DirectorEvent::RenderSizeChanged { width, height });
        }

        let clear = self.compositor.take_image_clear();
        let source = self.active_pose();
        match (clear, source, self.outputs.active_mut()) {
            (false, Some(pose), Some(output)) => output.render_image(&pose, destination),
            _ => {
                destination.set_active();
                destination.clear(CLEAR_FRAME_COLOR);
            }
        }
        self.flush_requests();
    }

    /// Compose the GUI layer, with its own clear flag.
    pub fn render_gui(&mut self, target: &mut dyn RenderTarget) {
        let clear = self.compositor.take_gui_clear();
        match (clear, self.outputs.active_mut()) {
            (false, Some(output)) => output.render_gui(target),
            _ => {
                target.set_active();
                target.clear(CLEAR_FRAME_COLOR);
            }
        }
    }

    /// One full frame: update, image, GUI.
    pub fn frame(
        &mut self,
        dt: f32,
        input: &InputFrame,
        image: &mut dyn RenderTarget,
        gui: &mut dyn RenderTarget,
    ) {
        self.update(dt, input);
        self.render_image(image);
        self.render_gui(gui);
    }

    pub fn render_size(&self) -> (u32, u32) {
        self.compositor.render_size()
    }

    // Observers

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Queue an operation to run at the next flush point.
    pub fn request(&mut self, request: DirectorRequest) {
        self.pending.push_back(request);
        self.flush_requests();
    }

    /// Everything dispatched since the last drain, oldest first.
    pub fn drain_published(&mut self) -> Vec<DirectorEvent> {
        std::mem::take(&mut self.published)
    }

    // Internals

    /// Activate the destination and complete the flight. False, with the
    /// callback dropped, when the destination cannot be activated.
    fn land(&mut self, id: &str, on_complete: Option<CompletionCallback>) -> bool {
        let Some(events) = self.cameras.activate_by_id(id) else {
            return false;
        };
        self.apply(events);
        if let Some(callback) = on_complete {
            callback(id);
        }
        info!("Transition to '{}' completed", id);
        self.emit(DirectorEvent::TransitionCompleted {
            destination: id.to_string(),
        });
        true
    }

    fn apply(&mut self, events: Vec<CoordinatorEvent>) {
        for event in events {
            match event {
                CoordinatorEvent::Lifecycle(lifecycle) => {
                    if lifecycle.phase == LifecyclePhase::Deactivated && lifecycle.was_active_slot {
                        let output = match lifecycle.family {
                            EntityFamily::Camera => self.outputs.active_mut(),
                            EntityFamily::Output => self.outputs.get_mut(&lifecycle.id),
                        };
                        if let Some(output) = output.filter(|o| o.is_attached()) {
                            output.detach_from_camera();
                        }
                    }
                    self.emit(DirectorEvent::Lifecycle {
                        family: lifecycle.family,
                        id: lifecycle.id,
                        phase: lifecycle.phase,
                    });
                }
                CoordinatorEvent::Changed {
                    family: EntityFamily::Camera,
                    id,
                } => {
                    let pose = self.cameras.get(&id).map(|c| c.pose());
                    if let (Some(pose), Some(output)) = (pose, self.outputs.active_mut()) {
                        output.attach_to_camera(&pose);
                    }
                    self.emit(DirectorEvent::CameraChanged { id });
                }
                CoordinatorEvent::Changed {
                    family: EntityFamily::Output,
                    id,
                } => {
                    let pose = self.active_pose();
                    let Some(output) = self.outputs.get_mut(&id) else {
                        continue;
                    };
                    if let Some(pose) = pose {
                        output.attach_to_camera(&pose);
                    }
                    let kind = output.kind();
                    self.compositor.request_clear();
                    self.settings.set(LAST_OUTPUT_KIND, kind);
                    self.emit(DirectorEvent::OutputChanged {
                        id,
                        kind: kind.to_string(),
                    });
                }
            }
        }
    }

    fn emit(&mut self, event: DirectorEvent) {
        self.bus.dispatch(&event, &mut self.requests);
        self.pending.extend(self.requests.drain());
        self.published.push(event);
    }

    fn flush_requests(&mut self) {
        if self.flushing {
            return;
        }
        self.flushing = true;
        let mut handled = 0;
        while let Some(request) = self.pending.pop_front() {
            if handled == MAX_REQUESTS_PER_FLUSH {
                warn!(
                    "Dropping {} queued requests; observers appear to loop",
                    self.pending.len() + 1
                );
                self.pending.clear();
                break;
            }
            handled += 1;
            self.execute(request);
        }
        self.flushing = false;
    }

    fn execute(&mut self, request: DirectorRequest) {
        debug!("Handling request {:?}", request);
        match request {
            DirectorRequest::ActivateCamera { id } => {
                self.activate_camera(&id);
            }
            DirectorRequest::ActivateOutput { id } => {
                self.activate_output(&id);
            }
            DirectorRequest::DeactivateCameras => self.deactivate_all_cameras(),
            DirectorRequest::DeactivateOutputs => self.deactivate_all_outputs(),
            DirectorRequest::GoTo { id } => {
                self.go_to(&id, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransitionConfig;
    use crate::engine::output::mono::MonoOutput;
    use crate::engine::output::stereo::{StereoLayout, StereoOutput};
    use crate::engine::render::target::{DrawCommand, FramePlan};
    use crate::engine::entity::lifecycle::Lifecycle;
    use crate::test_support::{CallLog, RecordingCamera, RecordingOutput, call_log};
    use bevy::color::Color;
    use bevy::math::Vec3;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn config() -> ViewerConfig {
        ViewerConfig {
            transition: TransitionConfig {
                time: 1.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn director_with(log: &CallLog) -> Director {
        let mut director = Director::from_config(config());
        director.add_camera(Box::new(RecordingCamera::at("front", Vec3::ZERO)));
        director.add_camera(Box::new(RecordingCamera::at("side", Vec3::new(10.0, 0.0, 0.0))));
        director.add_output(Box::new(RecordingOutput::new("screen", log)));
        director.add_output(Box::new(RecordingOutput::new("wall", log)));
        director
    }

    fn entries(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_start_attaches_output_to_first_camera() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();

        assert_eq!(director.active_camera_id(), Some("front"));
        assert_eq!(director.active_output_id(), Some("screen"));
        assert_eq!(entries(&log), vec!["screen:attach"]);
        assert_eq!(director.available_cameras(), vec!["front", "side"]);
    }

    #[test]
    fn test_camera_switch_detaches_then_attaches() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();
        director.drain_published();

        assert!(director.activate_camera("side"));
        assert_eq!(entries(&log), vec!["screen:attach", "screen:detach", "screen:attach"]);

        let events = director.drain_published();
        assert_eq!(
            events.last(),
            Some(&DirectorEvent::CameraChanged { id: "side".into() })
        );
        assert!(!director.activate_camera("nope"));
    }

    #[test]
    fn test_output_switch_pairs_detach_before_attach() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();
        log.lock().unwrap().clear();

        director.activate_output("wall");
        assert_eq!(entries(&log), vec!["screen:detach", "wall:attach"]);
    }

    #[test]
    fn test_one_black_frame_after_output_switch() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();

        let mut plan = FramePlan::new(640, 480);
        director.render_image(&mut plan);
        plan.begin_frame();
        director.render_image(&mut plan);
        assert_eq!(plan.views().count(), 1);

        director.activate_output("wall");
        plan.begin_frame();
        director.render_image(&mut plan);
        assert_eq!(plan.commands(), &[DrawCommand::Clear(Color::BLACK)]);

        plan.begin_frame();
        director.render_image(&mut plan);
        assert_eq!(plan.views().count(), 1);
        assert_eq!(plan.cleared_with(), None);
    }

    #[test]
    fn test_gui_flag_is_independent() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();

        let mut image = FramePlan::new(640, 480);
        let mut gui = FramePlan::new(640, 480);
        director.render_image(&mut image);
        director.render_image(&mut image);

        director.render_gui(&mut gui);
        assert_eq!(gui.cleared_with(), Some(Color::BLACK));
        gui.begin_frame();
        director.render_gui(&mut gui);
        assert_eq!(gui.gui_viewports().count(), 1);
    }

    #[test]
    fn test_no_camera_clears_black() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();
        director.deactivate_all_cameras();
        assert_eq!(entries(&log), vec!["screen:attach", "screen:detach"]);

        let mut plan = FramePlan::new(640, 480);
        director.render_image(&mut plan);
        director.render_image(&mut plan);
        assert_eq!(plan.views().count(), 0);
        assert_eq!(plan.cleared_with(), Some(Color::BLACK));
    }

    #[test]
    fn test_size_change_announced_before_draw() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();
        director.drain_published();

        let mut plan = FramePlan::new(800, 600);
        director.render_image(&mut plan);
        director.render_image(&mut plan);
        plan.resize(1024, 768);
        director.render_image(&mut plan);

        let sizes: Vec<_> = director
            .drain_published()
            .into_iter()
            .filter(|e| matches!(e, DirectorEvent::RenderSizeChanged { .. }))
            .collect();
        assert_eq!(
            sizes,
            vec![
                DirectorEvent::RenderSizeChanged { width: 800, height: 600 },
                DirectorEvent::RenderSizeChanged { width: 1024, height: 768 },
            ]
        );
        assert_eq!(director.render_size(), (1024, 768));
    }

    #[test]
    fn test_go_to_completes_once_at_transition_time() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        assert!(director.go_to(
            "side",
            Some(Box::new(move |id| {
                assert_eq!(id, "side");
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        ));
        assert_eq!(director.active_camera_id(), Some(TRANSITION_CAMERA_ID));
        assert!(director.is_transitioning());
        assert!(!director.available_cameras().contains(&TRANSITION_CAMERA_ID.to_string()));

        director.update(0.5, &InputFrame::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let halfway = director.active_pose().unwrap();
        assert!(halfway.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));

        director.update(0.5, &InputFrame::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(director.active_camera_id(), Some("side"));
        assert!(!director.is_transitioning());

        director.update(1.0, &InputFrame::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let completed = director
            .drain_published()
            .into_iter()
            .filter(|e| matches!(e, DirectorEvent::TransitionCompleted { .. }))
            .count();
        assert_eq!(completed, 1);
    }

    #[test]
    fn test_new_go_to_preempts_and_drops_callback() {
        let log = call_log();
        let mut director = director_with(&log);
        director.add_camera(Box::new(RecordingCamera::at("top", Vec3::new(0.0, 20.0, 0.0))));
        director.start();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        director.go_to(
            "side",
            Some(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );
        director.update(0.5, &InputFrame::default());
        director.go_to("top", None);
        assert_eq!(director.transition().map(|t| t.destination.as_str()), Some("top"));

        director.update(1.0, &InputFrame::default());
        assert_eq!(director.active_camera_id(), Some("top"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_direct_switch_cancels_flight() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        director.go_to(
            "side",
            Some(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );
        director.activate_camera("front");
        assert!(!director.is_transitioning());

        director.update(2.0, &InputFrame::default());
        assert_eq!(director.active_camera_id(), Some("front"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_flight_to_disabled_destination_restarts_cameras() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        director.go_to(
            "side",
            Some(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );
        assert!(director.set_camera_enabled("side", false));
        director.drain_published();

        director.update(2.0, &InputFrame::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!director.is_transitioning());
        assert_eq!(director.active_camera_id(), Some("front"));
        assert!(
            !director
                .drain_published()
                .iter()
                .any(|e| matches!(e, DirectorEvent::TransitionCompleted { .. }))
        );
    }

    #[test]
    fn test_disabled_entities_refuse_activation() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();

        assert!(director.set_camera_enabled("side", false));
        assert!(!director.activate_camera("side"));
        assert_eq!(director.active_camera_id(), Some("front"));

        assert!(director.set_output_enabled("wall", false));
        assert!(!director.activate_output("wall"));
        assert_eq!(director.active_output_id(), Some("screen"));

        // Already active stays a successful no-op.
        assert!(director.activate_camera("front"));
    }

    #[test]
    fn test_go_to_without_active_camera_is_immediate() {
        let log = call_log();
        let mut director = director_with(&log);

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        assert!(director.go_to(
            "side",
            Some(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        ));
        assert_eq!(director.active_camera_id(), Some("side"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(!director.go_to("missing", None));
        assert!(!director.go_to(TRANSITION_CAMERA_ID, None));
    }

    #[test]
    fn test_observer_requests_run_after_dispatch() {
        let log = call_log();
        let mut director = director_with(&log);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_observer = seen.clone();

        director.subscribe(Box::new(move |event, requests| {
            if let DirectorEvent::CameraChanged { id } = event {
                seen_by_observer.lock().unwrap().push(id.clone());
                if id == "front" {
                    requests.push(DirectorRequest::ActivateCamera { id: "side".into() });
                }
            }
        }));
        director.start();

        assert_eq!(director.active_camera_id(), Some("side"));
        assert_eq!(*seen.lock().unwrap(), vec!["front", "side"]);
    }

    #[test]
    fn test_request_loop_is_bounded() {
        let log = call_log();
        let mut director = director_with(&log);
        director.subscribe(Box::new(|event, requests| {
            if let DirectorEvent::CameraChanged { id } = event {
                let next = if id == "front" { "side" } else { "front" };
                requests.push(DirectorRequest::ActivateCamera { id: next.into() });
            }
        }));
        director.start();

        let active = director.active_camera_id().map(str::to_string);
        director.update(0.1, &InputFrame::default());
        assert!(active.is_some());
        assert!(director.available_cameras().len() == 2);
    }

    #[test]
    fn test_unsubscribed_observer_is_silent() {
        let log = call_log();
        let mut director = director_with(&log);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let id = director.subscribe(Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(director.unsubscribe(id));
        director.start();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_last_output_kind_is_preferred_on_start() {
        let mut settings = MemorySettings::default();
        settings.set(LAST_OUTPUT_KIND, std::any::type_name::<StereoOutput>());

        let mut director = Director::new(config(), Box::new(settings), Box::new(NoObstacles));
        director.add_camera(Box::new(RecordingCamera::at("front", Vec3::ZERO)));
        director.add_output(Box::new(MonoOutput::default()));
        director.add_output(Box::new(StereoOutput::new(
            Lifecycle::new("stereo"),
            StereoLayout::SideBySide,
            Default::default(),
        )));
        director.start();
        assert_eq!(director.active_output_id(), Some("stereo"));

        director.activate_output("mono");
        assert_eq!(director.settings.get(LAST_OUTPUT_KIND).as_deref(), Some(std::any::type_name::<MonoOutput>()));
    }

    #[test]
    fn test_remove_camera_mid_flight() {
        let log = call_log();
        let mut director = director_with(&log);
        director.start();
        director.go_to("side", None);

        assert!(director.remove_camera("side"));
        assert!(!director.is_transitioning());
        assert_eq!(director.active_camera_id(), None);
        assert!(!director.remove_camera(TRANSITION_CAMERA_ID));
        assert_eq!(director.available_cameras(), vec!["front"]);
    }
}
