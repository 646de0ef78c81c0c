//! Implements collision detection and clearance distance against the registered obstacles

use std::fmt;
use std::sync::Arc;
use nalgebra::Isometry3;
use parry3d::bounding_volume::{Aabb, BoundingVolume};
use parry3d::shape::{Shape, TriMesh};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info};
use crate::allowed_collisions::AllowedCollisionMatrix;
use crate::joint_group::JointGroup;
use crate::kinematic_traits::{KinematicModel, Pose};
use crate::solver_error::IkSolverError;

/// Static object against that we check the robot does not collide.
/// Unlike robot link, it has the global transform allowing to place it
/// where desired.
pub struct CollisionBody {
    /// Mesh representing this collision object
    pub mesh: TriMesh,
    /// Global transform of this collision object.
    pub pose: Isometry3<f32>,
    /// Frame the object was attached to when added.
    pub frame: String,
}

/// Observable state of the scene, handed to observers after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    /// Obstacle names with the frames they were attached at
    pub obstacles: Vec<(String, String)>,
    /// Pairs of bodies allowed to touch
    pub allowed_collisions: Vec<(String, String)>,
}

/// Receives the scene state whenever obstacles or allowed contacts change,
/// for instance to show the scene to the user.
pub trait SceneObserver: Send + Sync {
    fn scene_changed(&self, snapshot: &SceneSnapshot);
}

/// Struct representing a collision task for detecting collisions
/// between two objects with given transforms and shapes.
struct CollisionTask<'a> {
    name_a: &'a str, // reporting name of the first body
    name_b: &'a str, // reporting name of the second body
    transform_a: Isometry3<f32>,
    transform_b: Isometry3<f32>,
    shape_a: &'a dyn Shape,
    shape_b: &'a dyn Shape,
}

/// Robot links, obstacles around and the matrix of contacts that are allowed.
/// Only obstacles can be added after construction, robot geometry comes from
/// the kinematic model.
pub struct CollisionScene {
    model: Arc<dyn KinematicModel>,
    base_frame: String,
    obstacles: Vec<(String, CollisionBody)>,
    allowed: AllowedCollisionMatrix,
    observers: Vec<Box<dyn SceneObserver>>,
}

impl fmt::Debug for CollisionScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionScene")
            .field("base_frame", &self.base_frame)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

// Public methods
impl CollisionScene {
    /// Creates the scene for the robot, with adjacent links allowed to touch.
    /// `base_frame` is the frame obstacles are placed in when attached to it.
    pub fn new(model: Arc<dyn KinematicModel>, base_frame: &str) -> Self {
        let mut allowed = AllowedCollisionMatrix::new();
        for (a, b) in model.adjacent_links() {
            allowed.set_pair(&a, &b, true);
        }

        CollisionScene {
            model,
            base_frame: base_frame.to_string(),
            obstacles: Vec::new(),
            allowed,
            observers: Vec::new(),
        }
    }

    /// Register the obstacle under the given name at the given frame, replacing any
    /// obstacle with the same name. The frame is either the base frame or a robot
    /// link, in that case its pose at the default configuration is used.
    pub fn add_obstacle(&mut self, name: &str, mesh: TriMesh, frame: &str) -> Result<(), IkSolverError> {
        let pose = self.frame_pose(frame)?;
        let body = CollisionBody {
            mesh,
            pose: pose.cast::<f32>(),
            frame: frame.to_string(),
        };

        match self.obstacles.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => {
                info!("Replacing obstacle '{}', now attached at '{}'", name, frame);
                *existing = body;
            }
            None => {
                info!("Adding obstacle '{}' attached at '{}'", name, frame);
                self.obstacles.push((name.to_string(), body));
            }
        }
        self.broadcast();
        Ok(())
    }

    /// Remove the named obstacle, returns false if there was no such obstacle.
    pub fn remove_obstacle(&mut self, name: &str) -> bool {
        let before = self.obstacles.len();
        self.obstacles.retain(|(n, _)| n != name);
        let removed = self.obstacles.len() != before;
        if removed {
            info!("Removed obstacle '{}'", name);
            self.broadcast();
        }
        removed
    }

    pub fn obstacle(&self, name: &str) -> Option<&CollisionBody> {
        self.obstacles.iter().find(|(n, _)| n == name).map(|(_, body)| body)
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Allow or forbid contact between `name` and each of `links`.
    pub fn set_allowed(&mut self, name: &str, links: &[String], allowed: bool) {
        self.allowed.set_entry(name, links, allowed);
        self.broadcast();
    }

    pub fn allowed_collisions(&self) -> &AllowedCollisionMatrix {
        &self.allowed
    }

    /// Subscribe the observer. It immediately receives the current state.
    pub fn subscribe(&mut self, observer: Box<dyn SceneObserver>) {
        observer.scene_changed(&self.snapshot());
        self.observers.push(observer);
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            obstacles: self.obstacles.iter()
                .map(|(name, body)| (name.clone(), body.frame.clone()))
                .collect(),
            allowed_collisions: self.allowed.entries().cloned().collect(),
        }
    }

    /// Returns true if any link moved by the group collides with an obstacle or
    /// with another robot link, ignoring allowed contacts.
    pub fn is_state_colliding(&self, positions: &[f64], group: &JointGroup) -> bool {
        let link_poses = self.link_poses_f32(positions);
        let tasks = self.collision_tasks(&link_poses, group);
        !Self::process_collision_tasks(tasks, true).is_empty()
    }

    /// Returns all colliding pairs (by body name) for the group at the given configuration.
    pub fn collision_details(&self, positions: &[f64], group: &JointGroup) -> Vec<(String, String)> {
        let link_poses = self.link_poses_f32(positions);
        let tasks = self.collision_tasks(&link_poses, group);
        Self::process_collision_tasks(tasks, false)
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    /// Minimal distance between the links moved by the group and any obstacle,
    /// ignoring allowed contacts. Returns infinity if there is nothing to measure against.
    pub fn distance_to_collision(&self, positions: &[f64], group: &JointGroup) -> f64 {
        let link_poses = self.link_poses_f32(positions);
        let tasks = self.distance_tasks(&link_poses, group);
        if tasks.is_empty() {
            return f64::INFINITY;
        }
        tasks.par_iter()
            .map(|task| {
                // Unsupported pair of shapes counts as touching
                parry3d::query::distance(
                    &task.transform_a, task.shape_a, &task.transform_b, task.shape_b)
                    .unwrap_or(0.0)
            })
            .reduce(|| f32::INFINITY, f32::min) as f64
    }
}

impl CollisionScene {
    fn broadcast(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        debug!("Broadcasting scene to {} observer(s)", self.observers.len());
        for observer in &self.observers {
            observer.scene_changed(&snapshot);
        }
    }

    fn frame_pose(&self, frame: &str) -> Result<Pose, IkSolverError> {
        if frame == self.base_frame {
            return Ok(Pose::identity());
        }
        let index = self.model.links().iter()
            .position(|link| link.name == frame)
            .ok_or_else(|| IkSolverError::UnknownFrame(frame.to_string()))?;
        let poses = self.model.link_poses(&self.model.default_positions());
        Ok(poses[index])
    }

    fn link_poses_f32(&self, positions: &[f64]) -> Vec<Isometry3<f32>> {
        self.model.link_poses(positions).iter().map(|pose| pose.cast::<f32>()).collect()
    }

    fn world_aabb(local_aabb: &Option<Aabb>, pose: &Isometry3<f32>) -> Option<Aabb> {
        local_aabb.as_ref().map(|aabb| aabb.transform_by(pose))
    }

    // Pairs to check: moving links against obstacles, and against all other links with
    // geometry. Pairs whose bounding boxes do not overlap are dropped here already.
    fn collision_tasks<'a>(&'a self, link_poses: &[Isometry3<f32>], group: &JointGroup)
        -> Vec<CollisionTask<'a>> {
        let links = self.model.links();
        let mut tasks = Vec::with_capacity(4 * links.len());

        for (i, link) in links.iter().enumerate() {
            if !link.has_geometry() || !group.moves_link(&link.name) {
                continue;
            }
            let link_box = Self::world_aabb(&link.local_aabb, &link_poses[i]);

            for (obstacle_name, obstacle) in &self.obstacles {
                if self.allowed.is_allowed(&link.name, obstacle_name) {
                    continue;
                }
                let obstacle_box = obstacle.mesh.local_aabb().transform_by(&obstacle.pose);
                if let Some(link_box) = &link_box {
                    if !link_box.intersects(&obstacle_box) {
                        continue;
                    }
                }
                for shape in &link.shapes {
                    tasks.push(CollisionTask {
                        name_a: &link.name,
                        name_b: obstacle_name,
                        transform_a: link_poses[i] * shape.local_transform,
                        transform_b: obstacle.pose,
                        shape_a: &*shape.shape,
                        shape_b: &obstacle.mesh,
                    });
                }
            }

            for (j, other) in links.iter().enumerate() {
                // Pairs of two moving links are only visited once
                if i == j || !other.has_geometry() || (group.moves_link(&other.name) && j < i) {
                    continue;
                }
                if self.allowed.is_allowed(&link.name, &other.name) {
                    continue;
                }
                if let (Some(a), Some(b)) = (&link_box, Self::world_aabb(&other.local_aabb, &link_poses[j])) {
                    if !a.intersects(&b) {
                        continue;
                    }
                }
                for shape_a in &link.shapes {
                    for shape_b in &other.shapes {
                        tasks.push(CollisionTask {
                            name_a: &link.name,
                            name_b: &other.name,
                            transform_a: link_poses[i] * shape_a.local_transform,
                            transform_b: link_poses[j] * shape_b.local_transform,
                            shape_a: &*shape_a.shape,
                            shape_b: &*shape_b.shape,
                        });
                    }
                }
            }
        }
        tasks
    }

    fn distance_tasks<'a>(&'a self, link_poses: &[Isometry3<f32>], group: &JointGroup)
        -> Vec<CollisionTask<'a>> {
        let links = self.model.links();
        let mut tasks = Vec::with_capacity(links.len() * self.obstacles.len());
        for (i, link) in links.iter().enumerate() {
            if !group.moves_link(&link.name) {
                continue;
            }
            for (obstacle_name, obstacle) in &self.obstacles {
                if self.allowed.is_allowed(&link.name, obstacle_name) {
                    continue;
                }
                for shape in &link.shapes {
                    tasks.push(CollisionTask {
                        name_a: &link.name,
                        name_b: obstacle_name,
                        transform_a: link_poses[i] * shape.local_transform,
                        transform_b: obstacle.pose,
                        shape_a: &*shape.shape,
                        shape_b: &obstacle.mesh,
                    });
                }
            }
        }
        tasks
    }

    /// Parallel version with Rayon
    fn process_collision_tasks<'a>(tasks: Vec<CollisionTask<'a>>, first_collision_only: bool)
        -> Vec<(&'a str, &'a str)> {
        let collides = |task: &CollisionTask<'a>| {
            // Unsupported pair of shapes counts as colliding
            parry3d::query::intersection_test(
                &task.transform_a, task.shape_a, &task.transform_b, task.shape_b)
                .unwrap_or(true)
        };
        if first_collision_only {
            // Exit as soon as any collision is found
            tasks.par_iter()
                .find_map_any(|task| {
                    if collides(task) {
                        Some((task.name_a, task.name_b))
                    } else {
                        None
                    }
                })
                .into_iter() // Converts the Option result to an iterator
                .collect()
        } else {
            // Collect all collisions
            tasks.par_iter()
                .filter_map(|task| {
                    if collides(task) {
                        Some((task.name_a, task.name_b))
                    } else {
                        None
                    }
                })
                .collect()
        }
    }
}
