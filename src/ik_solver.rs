//! Single pose inverse kinematics that only accepts collision free configurations
//! keeping the required clearance from the obstacle.

use std::fmt;
use std::sync::Arc;
use parry3d::shape::TriMesh;
use tracing::{debug, info, warn};
use crate::collision_scene::{CollisionScene, SceneObserver};
use crate::joint_group::{JointGroup, RobotState};
use crate::kinematic_traits::{KinematicModel, Pose, Seed, Solutions};
use crate::solver_error::IkSolverError;
use crate::utils::is_finite;
use crate::validity::ValidityPredicate;

/// Name under which the obstacle is registered in the scene. There is at most one
/// such obstacle, adding another replaces it.
pub const OBSTACLE_NAME: &str = "reach_object";

/// Inverse kinematics solver for a fixed joint group.
pub trait IkSolver: Send + Sync {
    /// Solutions placing the group tip at `target`, in the group joint order.
    /// Unreachable targets produce an empty list, this is not an error.
    fn solve(&self, target: &Pose, seed: &Seed) -> Solutions;

    /// Joint names in the order of every returned solution.
    fn joint_names(&self) -> Vec<String>;

    /// Frame the target poses are expressed in.
    fn base_frame(&self) -> String;
}

/// Returns zero or one solution per pose. Candidates of the numeric root-finder
/// that collide or come closer to obstacles than `distance_threshold` are rejected,
/// the root-finder then continues with other starting points.
pub struct ClearanceIkSolver {
    model: Arc<dyn KinematicModel>,
    group: JointGroup,
    scene: CollisionScene,
    distance_threshold: f64,
}

impl fmt::Debug for ClearanceIkSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClearanceIkSolver")
            .field("group", &self.group)
            .field("distance_threshold", &self.distance_threshold)
            .field("scene", &self.scene)
            .finish()
    }
}

impl ClearanceIkSolver {
    /// Creates the solver for the named planning group of the model.
    ///
    /// * `distance_threshold` - minimal clearance (meters) from the obstacle, 0 to only
    ///   reject colliding configurations.
    pub fn new(model: Arc<dyn KinematicModel>, planning_group: &str, distance_threshold: f64)
               -> Result<Self, IkSolverError> {
        if !distance_threshold.is_finite() || distance_threshold < 0.0 {
            return Err(IkSolverError::InvalidThreshold(distance_threshold));
        }
        let group = model.joint_group(planning_group)
            .ok_or_else(|| IkSolverError::UnknownPlanningGroup(planning_group.to_string()))?;
        let base_frame = model.base_frame(&group);
        let scene = CollisionScene::new(model.clone(), &base_frame);
        info!("IK solver for '{}' ({} joints), distance threshold {}",
              group.name(), group.dof(), distance_threshold);

        Ok(ClearanceIkSolver {
            model,
            group,
            scene,
            distance_threshold,
        })
    }

    pub fn group(&self) -> &JointGroup {
        &self.group
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    pub fn scene(&self) -> &CollisionScene {
        &self.scene
    }

    /// Register the mesh as the obstacle, attached at `frame` (the base frame or a robot link).
    /// Replaces any obstacle added before.
    pub fn add_obstacle(&mut self, mesh: TriMesh, frame: &str) -> Result<(), IkSolverError> {
        self.scene.add_obstacle(OBSTACLE_NAME, mesh, frame)
    }

    /// Load the mesh from the file and register it as the obstacle, see [`Self::add_obstacle`].
    #[cfg(feature = "allow_filesystem")]
    pub fn add_collision_mesh<P: AsRef<std::path::Path>>(&mut self, path: P, frame: &str)
                                                         -> Result<(), IkSolverError> {
        let mesh = crate::mesh::load_obstacle_mesh(path)?;
        self.add_obstacle(mesh, frame)
    }

    /// Allow the listed links to touch the obstacle in all later checks.
    pub fn set_touch_links(&mut self, links: &[String]) {
        for link in links {
            if !self.model.links().iter().any(|l| &l.name == link) {
                warn!("Touch link '{}' is not a link of the robot", link);
            }
        }
        self.scene.set_allowed(OBSTACLE_NAME, links, true);
    }

    /// Subscribe the observer to scene changes, it immediately receives the current scene.
    pub fn subscribe(&mut self, observer: Box<dyn SceneObserver>) {
        self.scene.subscribe(observer);
    }

    /// Checks the full body configuration (ordered as the model joints) against
    /// collisions and the distance threshold.
    pub fn is_valid(&self, positions: &[f64]) -> bool {
        ValidityPredicate::new(&self.scene, &self.group, self.distance_threshold).is_valid(positions)
    }
}

impl IkSolver for ClearanceIkSolver {
    fn solve(&self, target: &Pose, seed: &Seed) -> Solutions {
        let state = RobotState::from_seed(self.model.as_ref(), seed);
        let predicate = ValidityPredicate::new(&self.scene, &self.group, self.distance_threshold);
        let gate = |qs: &[f64]| {
            let candidate = state.with_group_positions(&self.group, qs);
            predicate.is_valid(candidate.positions())
        };

        match self.model.inverse(&self.group, target, state.positions(), &gate) {
            Some(solution) if solution.len() == self.group.dof() && is_finite(&solution) => vec![solution],
            Some(solution) => {
                debug!("Discarding malformed solution {:?}", solution);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn joint_names(&self) -> Vec<String> {
        self.group.joint_names().to_vec()
    }

    fn base_frame(&self) -> String {
        self.model.base_frame(&self.group)
    }
}
