use bevy::log::info;

use super::SceneCamera;
use crate::engine::entity::lifecycle::{EntityId, Lifecycle};
use crate::engine::input::InputFrame;
use crate::engine::render::pose::CameraPose;
use crate::engine::transition::planner::TransitionPlan;

/// Id the director registers its transition camera under.
pub const TRANSITION_CAMERA_ID: &str = "transition";

/// Invoked once when a flight lands, with the destination camera id.
pub type CompletionCallback = Box<dyn FnOnce(&str) + Send + Sync>;

/// One in-flight transition. Dropping it cancels the flight and its callback.
pub struct TransitionState {
    pub plan: TransitionPlan,
    pub destination: EntityId,
    pub elapsed: f32,
    on_complete: Option<CompletionCallback>,
}

impl TransitionState {
    pub fn new(
        plan: TransitionPlan,
        destination: impl Into<EntityId>,
        on_complete: Option<CompletionCallback>,
    ) -> Self {
        Self {
            plan,
            destination: destination.into(),
            elapsed: 0.0,
            on_complete,
        }
    }
}

/// A landed flight handed back to the director.
pub struct FinishedTransition {
    pub destination: EntityId,
    pub on_complete: Option<CompletionCallback>,
}

/// Hidden camera that renders the scene while a flight is in progress.
pub struct TransitionCamera {
    lifecycle: Lifecycle,
    state: Option<TransitionState>,
    current: CameraPose,
}

impl Default for TransitionCamera {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::new(TRANSITION_CAMERA_ID).as_hidden(),
            state: None,
            current: CameraPose::default(),
        }
    }
}

impl TransitionCamera {
    /// Start a flight, replacing any flight already in progress.
    ///
    /// Returns true when an earlier flight was preempted.
    pub fn begin(&mut self, state: TransitionState) -> bool {
        self.current = state.plan.origin;
        self.state.replace(state).is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&TransitionState> {
        self.state.as_ref()
    }

    /// Take the flight out once it has landed.
    pub fn take_finished(&mut self) -> Option<FinishedTransition> {
        let finished = self
            .state
            .as_ref()
            .is_some_and(|s| s.plan.is_finished(s.elapsed));
        if !finished {
            return None;
        }
        self.state.take().map(|mut s| FinishedTransition {
            destination: s.destination,
            on_complete: s.on_complete.take(),
        })
    }

    /// Drop the current flight without completing it.
    pub fn cancel(&mut self) -> Option<EntityId> {
        self.state.take().map(|s| s.destination)
    }
}

// Leaving the transition camera by any other route abandons the flight.
crate::impl_activatable!(TransitionCamera {
    fn on_deactivated(&mut self) {
        if let Some(state) = self.state.take() {
            info!("Transition to '{}' cancelled", state.destination);
        }
    }
});

impl SceneCamera for TransitionCamera {
    fn pose(&self) -> CameraPose {
        self.current
    }

    fn update(&mut self, _input: &InputFrame, dt: f32) {
        if let Some(state) = self.state.as_mut() {
            state.elapsed += dt;
            self.current = state.plan.sample(state.elapsed);
        }
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        self.current = *pose;
    }
}
