use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::math::{Dir3, Vec3};

/// Scene query used by the transition occlusion heuristic.
pub trait Raycaster: Send + Sync {
    /// Distance to the first hit along `direction`, if any within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;
}

/// A scene with nothing to hit; every transition flies direct.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl Raycaster for NoObstacles {
    fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<f32> {
        None
    }
}

/// Axis-aligned boxes standing in for scene geometry.
#[derive(Debug, Clone, Default)]
pub struct AabbRaycaster {
    boxes: Vec<Aabb3d>,
}

impl AabbRaycaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box by centre and half extents.
    pub fn with_box(mut self, center: Vec3, half_size: Vec3) -> Self {
        self.add_box(center, half_size);
        self
    }

    pub fn add_box(&mut self, center: Vec3, half_size: Vec3) {
        self.boxes.push(Aabb3d::new(center, half_size));
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl Raycaster for AabbRaycaster {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let direction = Dir3::new(direction).ok()?;
        let ray = RayCast3d::new(origin, direction, max_distance);
        self.boxes
            .iter()
            .filter_map(|aabb| ray.aabb_intersection_at(aabb))
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_obstacles_never_hits() {
        assert_eq!(NoObstacles.raycast(Vec3::ZERO, Vec3::X, 100.0), None);
    }

    #[test]
    fn test_nearest_box_wins() {
        let raycaster = AabbRaycaster::new()
            .with_box(Vec3::new(50.0, 0.0, 0.0), Vec3::splat(5.0))
            .with_box(Vec3::new(20.0, 0.0, 0.0), Vec3::splat(5.0));

        let hit = raycaster.raycast(Vec3::ZERO, Vec3::X, 1000.0);
        assert!(hit.is_some_and(|d| (d - 15.0).abs() < 1e-4));
    }

    #[test]
    fn test_misses_and_max_distance() {
        let raycaster = AabbRaycaster::new().with_box(Vec3::new(50.0, 0.0, 0.0), Vec3::splat(5.0));
        assert_eq!(raycaster.raycast(Vec3::ZERO, Vec3::Z, 1000.0), None);
        assert_eq!(raycaster.raycast(Vec3::ZERO, Vec3::X, 10.0), None);
        assert_eq!(raycaster.raycast(Vec3::ZERO, Vec3::ZERO, 1000.0), None);
    }
}
