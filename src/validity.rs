//! Acceptance test of a robot configuration: not colliding and far enough from obstacles.

use tracing::trace;
use crate::collision_scene::CollisionScene;
use crate::joint_group::JointGroup;

/// Evaluates full body configurations against the scene. Borrows everything it
/// needs, so it can be built inside each solve and handed to the root-finder.
pub struct ValidityPredicate<'a> {
    scene: &'a CollisionScene,
    group: &'a JointGroup,
    distance_threshold: f64,
}

impl<'a> ValidityPredicate<'a> {
    pub fn new(scene: &'a CollisionScene, group: &'a JointGroup, distance_threshold: f64) -> Self {
        ValidityPredicate { scene, group, distance_threshold }
    }

    /// True if the links moved by the group collide with nothing and stay at least
    /// the threshold away from every obstacle. A zero threshold only tests collisions.
    pub fn is_valid(&self, positions: &[f64]) -> bool {
        if self.scene.is_state_colliding(positions, self.group) {
            trace!("Configuration rejected: colliding");
            return false;
        }
        if self.distance_threshold <= 0.0 {
            return true;
        }
        let distance = self.scene.distance_to_collision(positions, self.group);
        if distance < self.distance_threshold {
            trace!("Configuration rejected: distance {:.4} below {:.4}", distance, self.distance_threshold);
            return false;
        }
        true
    }
}
