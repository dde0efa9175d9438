use bevy::log::debug;
use bevy::math::{Quat, Vec3};
use constants::transition::{TRANSITION_MIN_DISTANCE, TRANSITION_RAYCAST_MAX_DISTANCE};
use serde::{Deserialize, Serialize};

use super::raycast::Raycaster;
use crate::config::TransitionConfig;
use crate::engine::render::pose::{CameraPose, Lens, top_down_rotation};

/// Shape of a camera flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Single interpolation between the two poses.
    Direct,
    /// Climb, translate at altitude, descend.
    Deviated,
}

/// Pick the flight shape from the occlusion heuristic.
///
/// `distance_to_hit` is `None` when the ray toward the destination hit
/// nothing. The path deviates only when something sits closer than the
/// destination and direct flight is not forced.
pub fn choose_path(
    distance_to_destination: f32,
    distance_to_hit: Option<f32>,
    force_direct: bool,
) -> PathKind {
    let distance_to_hit = distance_to_hit.unwrap_or(f32::INFINITY);
    if distance_to_destination > distance_to_hit && !force_direct {
        PathKind::Deviated
    } else {
        PathKind::Direct
    }
}

/// One timed segment of a flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub start: f32,
    pub duration: f32,
    pub from_position: Vec3,
    pub to_position: Vec3,
    pub from_rotation: Quat,
    pub to_rotation: Quat,
}

impl Leg {
    fn end(&self) -> f32 {
        self.start + self.duration
    }

    fn sample(&self, time: f32) -> (Vec3, Quat) {
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            ease_in_out(((time - self.start) / self.duration).clamp(0.0, 1.0))
        };
        (
            self.from_position.lerp(self.to_position, t),
            self.from_rotation.slerp(self.to_rotation, t),
        )
    }
}

/// Smoothstep easing; exact at both ends.
fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// A fully timed flight from one pose to another.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub kind: PathKind,
    pub origin: CameraPose,
    pub destination: CameraPose,
    /// Origin lens converted to the destination's projection kind.
    start_lens: Lens,
    legs: Vec<Leg>,
    duration: f32,
}

impl TransitionPlan {
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration
    }

    /// Pose at `elapsed` seconds. Waits between legs hold the previous leg's
    /// end pose; the lens eases across the whole flight.
    pub fn sample(&self, elapsed: f32) -> CameraPose {
        if self.is_finished(elapsed) {
            return self.destination;
        }

        let mut position = self.origin.position;
        let mut rotation = self.origin.rotation;
        for leg in &self.legs {
            if elapsed >= leg.end() {
                position = leg.to_position;
                rotation = leg.to_rotation;
            } else {
                if elapsed > leg.start {
                    (position, rotation) = leg.sample(elapsed);
                }
                break;
            }
        }

        let lens_t = if self.duration <= 0.0 {
            1.0
        } else {
            ease_in_out((elapsed / self.duration).clamp(0.0, 1.0))
        };

        CameraPose {
            position,
            rotation,
            lens: self.start_lens.lerp(&self.destination.lens, lens_t),
            ..self.destination
        }
    }
}

/// Builds transition plans; stateless apart from its configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionPlanner {
    pub config: TransitionConfig,
}

impl TransitionPlanner {
    pub fn new(config: TransitionConfig) -> Self {
        Self { config }
    }

    /// Raycast toward the destination and plan the flight.
    pub fn plan(
        &self,
        origin: &CameraPose,
        destination: &CameraPose,
        raycaster: &dyn Raycaster,
    ) -> TransitionPlan {
        let to_destination = destination.position - origin.position;
        let distance = to_destination.length();

        let hit = if distance > TRANSITION_MIN_DISTANCE {
            raycaster.raycast(
                origin.position,
                to_destination / distance,
                TRANSITION_RAYCAST_MAX_DISTANCE,
            )
        } else {
            None
        };

        let kind = choose_path(distance, hit, self.config.force_direct);
        debug!(
            "Transition distance {:.2}, hit {:?}, path {:?}",
            distance, hit, kind
        );
        self.plan_with(kind, origin, destination)
    }

    /// Plan a flight of a known shape.
    pub fn plan_with(
        &self,
        kind: PathKind,
        origin: &CameraPose,
        destination: &CameraPose,
    ) -> TransitionPlan {
        let time = self.config.time.max(0.0);
        let wait = self.config.wait.max(0.0);

        let legs = match kind {
            PathKind::Direct => vec![Leg {
                start: 0.0,
                duration: time,
                from_position: origin.position,
                to_position: destination.position,
                from_rotation: origin.rotation,
                to_rotation: destination.rotation,
            }],
            PathKind::Deviated => {
                let altitude = self.config.animation_y;
                let overhead = top_down_rotation(origin.yaw());
                let climb_to = Vec3::new(origin.position.x, altitude, origin.position.z);
                let cruise_to = Vec3::new(destination.position.x, altitude, destination.position.z);

                let climb = Leg {
                    start: 0.0,
                    duration: time,
                    from_position: origin.position,
                    to_position: climb_to,
                    from_rotation: origin.rotation,
                    to_rotation: overhead,
                };
                let cruise = Leg {
                    start: climb.end() + wait,
                    duration: time,
                    from_position: climb_to,
                    to_position: cruise_to,
                    from_rotation: overhead,
                    to_rotation: overhead,
                };
                let descend = Leg {
                    start: cruise.end() + wait,
                    duration: time,
                    from_position: cruise_to,
                    to_position: destination.position,
                    from_rotation: overhead,
                    to_rotation: destination.rotation,
                };
                vec![climb, cruise, descend]
            }
        };

        let duration = legs.last().map_or(0.0, Leg::end);
        let start_lens = origin.lens.matched_to(
            &destination.lens,
            origin.position.distance(destination.position),
        );
        TransitionPlan {
            kind,
            origin: *origin,
            destination: *destination,
            start_lens,
            legs,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::transition::raycast::{AabbRaycaster, NoObstacles};

    fn planner() -> TransitionPlanner {
        TransitionPlanner::new(TransitionConfig {
            time: 1.0,
            animation_y: 100.0,
            wait: 0.5,
            force_direct: false,
        })
    }

    #[test]
    fn test_unoccluded_destination_flies_direct() {
        assert_eq!(choose_path(50.0, Some(80.0), false), PathKind::Direct);
        assert_eq!(choose_path(50.0, None, false), PathKind::Direct);
    }

    #[test]
    fn test_occluded_destination_deviates() {
        assert_eq!(choose_path(80.0, Some(50.0), false), PathKind::Deviated);
        assert_eq!(choose_path(80.0, Some(50.0), true), PathKind::Direct);
    }

    #[test]
    fn test_direct_reaches_destination_at_time() {
        let origin = CameraPose::new(Vec3::ZERO, Quat::IDENTITY)
            .with_lens(Lens::Perspective { fov_degrees: 40.0 });
        let destination = CameraPose::new(Vec3::new(10.0, 0.0, 0.0), Quat::from_rotation_y(1.0))
            .with_lens(Lens::Perspective { fov_degrees: 80.0 });
        let plan = planner().plan(&origin, &destination, &NoObstacles);

        assert_eq!(plan.kind, PathKind::Direct);
        assert_eq!(plan.duration(), 1.0);

        let halfway = plan.sample(0.5);
        assert!(halfway.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));
        assert_eq!(halfway.lens, Lens::Perspective { fov_degrees: 60.0 });

        let almost = plan.sample(0.999_9);
        assert!(almost.position.abs_diff_eq(destination.position, 1e-3));
        assert!(almost.rotation.abs_diff_eq(destination.rotation, 1e-3));

        assert_eq!(plan.sample(1.0), destination);
        assert!(plan.is_finished(1.0));
    }

    #[test]
    fn test_perspective_to_orthographic_flight_eases_lens() {
        let origin = CameraPose::new(Vec3::ZERO, Quat::IDENTITY)
            .with_lens(Lens::Perspective { fov_degrees: 60.0 });
        let destination = CameraPose::new(Vec3::new(0.0, 0.0, 100.0), Quat::IDENTITY)
            .with_lens(Lens::Orthographic { size: 90.0 });
        let plan = planner().plan_with(PathKind::Direct, &origin, &destination);

        let matched = 100.0 * 30f32.to_radians().tan();
        let size_at = |elapsed: f32| match plan.sample(elapsed).lens {
            Lens::Orthographic { size } => size,
            other => panic!("expected orthographic lens, got {other:?}"),
        };

        assert!((size_at(0.0) - matched).abs() < 1e-3);
        assert!((size_at(0.5) - (matched + 90.0) * 0.5).abs() < 1e-3);
        assert!(size_at(0.25) > matched && size_at(0.75) < 90.0);
        assert_eq!(size_at(1.0), 90.0);
    }

    #[test]
    fn test_orthographic_to_perspective_flight_eases_fov() {
        let origin = CameraPose::new(Vec3::ZERO, Quat::IDENTITY)
            .with_lens(Lens::Orthographic { size: 10.0 });
        let destination = CameraPose::new(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY)
            .with_lens(Lens::Perspective { fov_degrees: 60.0 });
        let plan = planner().plan_with(PathKind::Direct, &origin, &destination);

        // size 10 at distance 10 frames a 90 degree field of view.
        match plan.sample(0.0).lens {
            Lens::Perspective { fov_degrees } => assert!((fov_degrees - 90.0).abs() < 1e-3),
            other => panic!("expected perspective lens, got {other:?}"),
        }
        match plan.sample(0.5).lens {
            Lens::Perspective { fov_degrees } => assert!((fov_degrees - 75.0).abs() < 1e-3),
            other => panic!("expected perspective lens, got {other:?}"),
        }
    }

    #[test]
    fn test_wall_between_poses_deviates() {
        let raycaster = AabbRaycaster::new().with_box(Vec3::new(25.0, 0.0, 0.0), Vec3::splat(5.0));
        let origin = CameraPose::new(Vec3::ZERO, Quat::IDENTITY);
        let destination = CameraPose::new(Vec3::new(50.0, 0.0, 0.0), Quat::IDENTITY);

        let plan = planner().plan(&origin, &destination, &raycaster);
        assert_eq!(plan.kind, PathKind::Deviated);
        assert_eq!(plan.legs().len(), 3);
        assert_eq!(plan.duration(), 4.0);
    }

    #[test]
    fn test_deviated_legs_climb_cruise_descend() {
        let origin = CameraPose::new(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY);
        let destination = CameraPose::new(Vec3::new(40.0, 3.0, 30.0), Quat::from_rotation_y(0.5));
        let plan = planner().plan_with(PathKind::Deviated, &origin, &destination);

        // End of climb, then hold through the wait.
        let top = plan.sample(1.0);
        assert!(top.position.abs_diff_eq(Vec3::new(0.0, 100.0, 0.0), 1e-4));
        assert!(top.forward().abs_diff_eq(Vec3::NEG_Y, 1e-4));
        assert_eq!(plan.sample(1.25).position, top.position);

        // End of cruise at altitude over the destination.
        let over = plan.sample(2.5);
        assert!(over.position.abs_diff_eq(Vec3::new(40.0, 100.0, 30.0), 1e-4));

        // Descent lands exactly.
        assert_eq!(plan.sample(4.0), destination);
    }

    #[test]
    fn test_coincident_poses_are_direct() {
        let pose = CameraPose::new(Vec3::ONE, Quat::IDENTITY);
        let raycaster = AabbRaycaster::new().with_box(Vec3::ONE, Vec3::splat(5.0));
        let plan = planner().plan(&pose, &pose, &raycaster);
        assert_eq!(plan.kind, PathKind::Direct);
    }
}
