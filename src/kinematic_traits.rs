//! Core types and the contract of the kinematic model consumed by the solvers.

extern crate nalgebra as na;

use std::collections::HashMap;
use na::Isometry3;
use crate::joint_group::JointGroup;
use crate::link_body::RobotLink;

/// Pose is used a pose of the robot tip link. It contains both Cartesian position and rotation quaternion
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion, Vector3};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(1.0, 0.0, 0.0);
/// // The quaternion should be normalized to represent a valid rotation.
/// let rotation = UnitQuaternion::from_quaternion(na::Quaternion::new(1.0, 0.0, 0.0, 1.0).normalize());
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Joint values of a single solution, ordered as the joint group of the solver that produced it.
pub type Solution = Vec<f64>;

/// Solvers return zero or more solutions. Empty means the pose is not reachable under
/// the collision and clearance constraints, this is not an error.
pub type Solutions = Vec<Solution>;

/// Initial joint positions by joint name. May mention any subset of robot joints,
/// not only the joints of the planning group.
pub type Seed = HashMap<String, f64>;

/// Acceptance gate the numeric root-finder consults for every converged candidate.
/// Receives the joint group values in the group order.
pub type IkValidity<'a> = dyn Fn(&[f64]) -> bool + 'a;

/// Kinematic model of the robot. Built outside this crate and shared read-only
/// between all solvers, hence must be `Send` and `Sync`.
///
/// All "full body" position slices are ordered as [`KinematicModel::joint_names`].
pub trait KinematicModel: Send + Sync {
    /// Names of all joints of the robot, defining the full body ordering.
    fn joint_names(&self) -> &[String];

    /// Default full body configuration, used for joints not mentioned in the seed.
    fn default_positions(&self) -> Vec<f64>;

    /// Resolve the named joint group, None if there is no such group.
    fn joint_group(&self, name: &str) -> Option<JointGroup>;

    /// The frame the root-finder expects target poses to be expressed in.
    fn base_frame(&self, group: &JointGroup) -> String;

    /// Robot links, with their collision geometry if any.
    fn links(&self) -> &[RobotLink];

    /// Global poses of all links (same order as [`KinematicModel::links`])
    /// for the given full body configuration.
    fn link_poses(&self, positions: &[f64]) -> Vec<Pose>;

    /// Pairs of links that touch by construction, connected by a single joint.
    fn adjacent_links(&self) -> Vec<(String, String)>;

    /// Numeric inverse kinematics for the group tip link.
    ///
    /// * `positions` - full body configuration holding the seed, also providing
    ///   values for joints outside the group.
    /// * `is_valid` - every candidate must pass this gate. Rejected candidates do not
    ///   terminate the search, the root-finder continues until its own budget is spent.
    ///
    /// Returns group values in the group order or None if nothing acceptable was found.
    fn inverse(&self, group: &JointGroup, target: &Pose, positions: &[f64],
               is_valid: &IkValidity<'_>) -> Option<Solution>;
}
