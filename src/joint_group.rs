//! Joint groups and the full body robot state the seed is merged into.

use std::collections::HashSet;
use tracing::debug;
use crate::kinematic_traits::{KinematicModel, Seed, Solution};
use crate::solver_error::IkSolverError;

/// Ordered, named subset of robot joints controlled by a solver. The order of
/// `joint_names` is the order of values in every seed vector and solution.
#[derive(Debug, Clone, PartialEq)]
pub struct JointGroup {
    name: String,
    joint_names: Vec<String>,
    /// Positions of the group joints inside the full body configuration
    joint_indices: Vec<usize>,
    /// Link whose pose the inverse kinematics targets
    tip_link: String,
    /// Links whose global pose depends on the group joints
    moving_links: Vec<String>,
}

impl JointGroup {
    /// Creates the joint group, validating it is not empty and does not
    /// reference the same joint twice.
    pub fn new(
        name: &str,
        joint_names: Vec<String>,
        joint_indices: Vec<usize>,
        tip_link: &str,
        moving_links: Vec<String>,
    ) -> Result<Self, IkSolverError> {
        if joint_names.is_empty() {
            return Err(IkSolverError::MalformedJointGroup(format!(
                "group '{}' has no joints", name
            )));
        }
        if joint_names.len() != joint_indices.len() {
            return Err(IkSolverError::MalformedJointGroup(format!(
                "group '{}' lists {} joints but {} indices", name, joint_names.len(), joint_indices.len()
            )));
        }
        let mut seen = HashSet::with_capacity(joint_indices.len());
        for (joint, index) in joint_names.iter().zip(joint_indices.iter()) {
            if !seen.insert(*index) {
                return Err(IkSolverError::MalformedJointGroup(format!(
                    "group '{}' lists joint '{}' more than once", name, joint
                )));
            }
        }

        Ok(JointGroup {
            name: name.to_string(),
            joint_names,
            joint_indices,
            tip_link: tip_link.to_string(),
            moving_links,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active joint names in the solver order
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    pub fn joint_indices(&self) -> &[usize] {
        &self.joint_indices
    }

    /// Number of degrees of freedom, also the length of every solution
    pub fn dof(&self) -> usize {
        self.joint_names.len()
    }

    pub fn tip_link(&self) -> &str {
        &self.tip_link
    }

    pub fn moving_links(&self) -> &[String] {
        &self.moving_links
    }

    pub fn moves_link(&self, link: &str) -> bool {
        self.moving_links.iter().any(|l| l == link)
    }
}

/// Full body joint configuration, one value per joint of the kinematic model.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    positions: Vec<f64>,
}

impl RobotState {
    /// State with all joints at the model defaults.
    pub fn new(model: &dyn KinematicModel) -> Self {
        RobotState {
            positions: model.default_positions(),
        }
    }

    /// Default state, overwritten by every seed entry that names a joint of the model.
    /// Entries naming unknown joints are ignored.
    pub fn from_seed(model: &dyn KinematicModel, seed: &Seed) -> Self {
        let mut state = Self::new(model);
        let names = model.joint_names();
        for (joint, value) in seed {
            match names.iter().position(|n| n == joint) {
                Some(index) => state.positions[index] = *value,
                None => debug!("Seed names joint '{}' that is not in the model, ignored", joint),
            }
        }
        state
    }

    pub fn from_positions(positions: Vec<f64>) -> Self {
        RobotState { positions }
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Values of the group joints, in the group order
    pub fn group_positions(&self, group: &JointGroup) -> Solution {
        group.joint_indices().iter().map(|&i| self.positions[i]).collect()
    }

    /// Overwrite the group joints with the given values (group order).
    pub fn set_group_positions(&mut self, group: &JointGroup, values: &[f64]) {
        debug_assert_eq!(values.len(), group.dof());
        for (&index, &value) in group.joint_indices().iter().zip(values.iter()) {
            self.positions[index] = value;
        }
    }

    /// Copy of this state with the group joints replaced.
    pub fn with_group_positions(&self, group: &JointGroup, values: &[f64]) -> Self {
        let mut state = self.clone();
        state.set_group_positions(group, values);
        state
    }
}
