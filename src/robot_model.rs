//! Reference kinematic model: a tree of revolute and prismatic joints with collision
//! geometry on the links and named joint groups. Inverse kinematics is numeric,
//! see [`crate::dls`].

use std::collections::HashMap;
use nalgebra::{Translation3, Unit, UnitQuaternion, Vector3};
use tracing::debug;
use crate::dls::{DlsConfig, DlsSolver};
use crate::joint_group::JointGroup;
use crate::kinematic_traits::{IkValidity, KinematicModel, Pose, Solution};
use crate::link_body::RobotLink;
use crate::solver_error::IkSolverError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// Rotation about the axis, value in radians
    Revolute,
    /// Translation along the axis, value in meters
    Prismatic,
}

/// Joint connecting the parent link to the child link.
#[derive(Debug, Clone)]
pub struct RobotJoint {
    pub name: String,
    pub parent_link: String,
    pub child_link: String,
    /// Static transform from the parent link frame to the joint frame
    pub origin: Pose,
    /// Axis of motion in the joint frame
    pub axis: Unit<Vector3<f64>>,
    pub kind: JointKind,
    pub lower: f64,
    pub upper: f64,
    /// Value used for joints the seed does not mention
    pub default: f64,
}

impl RobotJoint {
    pub fn revolute(name: &str, parent: &str, child: &str, origin: Pose,
                    axis: Vector3<f64>, limits: (f64, f64)) -> Self {
        Self::new(name, parent, child, origin, axis, JointKind::Revolute, limits)
    }

    pub fn prismatic(name: &str, parent: &str, child: &str, origin: Pose,
                     axis: Vector3<f64>, limits: (f64, f64)) -> Self {
        Self::new(name, parent, child, origin, axis, JointKind::Prismatic, limits)
    }

    fn new(name: &str, parent: &str, child: &str, origin: Pose,
           axis: Vector3<f64>, kind: JointKind, limits: (f64, f64)) -> Self {
        RobotJoint {
            name: name.to_string(),
            parent_link: parent.to_string(),
            child_link: child.to_string(),
            origin,
            axis: Unit::new_normalize(axis),
            kind,
            lower: limits.0,
            upper: limits.1,
            default: 0.0_f64.clamp(limits.0, limits.1),
        }
    }

    /// Same joint with another default value.
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }

    /// Transform from the parent link frame to the child link frame at the given joint value.
    pub fn transform(&self, value: f64) -> Pose {
        let motion = match self.kind {
            JointKind::Revolute => Pose::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&self.axis, value),
            ),
            JointKind::Prismatic => Pose::from_parts(
                Translation3::from(self.axis.into_inner() * value),
                UnitQuaternion::identity(),
            ),
        };
        self.origin * motion
    }
}

/// Named joint group as declared on the model, resolved by [`KinematicModel::joint_group`].
#[derive(Debug, Clone)]
pub struct GroupDefinition {
    pub name: String,
    pub joints: Vec<String>,
    pub tip_link: String,
}

impl GroupDefinition {
    pub fn new(name: &str, joints: &[&str], tip_link: &str) -> Self {
        GroupDefinition {
            name: name.to_string(),
            joints: joints.iter().map(|j| j.to_string()).collect(),
            tip_link: tip_link.to_string(),
        }
    }
}

pub struct RobotModel {
    base_frame: String,
    joints: Vec<RobotJoint>,
    joint_names: Vec<String>,
    links: Vec<RobotLink>,
    /// Per link, the index of the joint whose child it is (None for the root)
    parent_joint: Vec<Option<usize>>,
    /// Per link, index of the parent link
    parent_link: Vec<Option<usize>>,
    /// Links ordered so that every parent comes before its children
    link_order: Vec<usize>,
    groups: Vec<GroupDefinition>,
    solver: DlsSolver,
}

impl RobotModel {
    /// Builds the model, checking that the joints connect all links into a single
    /// tree rooted at `base_frame` and that every group can be resolved.
    pub fn new(
        base_frame: &str,
        links: Vec<RobotLink>,
        joints: Vec<RobotJoint>,
        groups: Vec<GroupDefinition>,
    ) -> Result<Self, IkSolverError> {
        let link_index: HashMap<&str, usize> = links.iter().enumerate()
            .map(|(i, link)| (link.name.as_str(), i))
            .collect();
        if link_index.len() != links.len() {
            return Err(IkSolverError::ModelConfigurationError(
                "link names must be unique".to_string()));
        }
        let root = *link_index.get(base_frame).ok_or_else(|| IkSolverError::ModelConfigurationError(
            format!("base frame '{}' is not a link of the model", base_frame)))?;

        let mut parent_joint = vec![None; links.len()];
        let mut parent_link = vec![None; links.len()];
        let mut joint_names = Vec::with_capacity(joints.len());
        for (j, joint) in joints.iter().enumerate() {
            if joint_names.contains(&joint.name) {
                return Err(IkSolverError::ModelConfigurationError(
                    format!("joint '{}' is defined twice", joint.name)));
            }
            if !(joint.lower <= joint.upper) || !joint.default.is_finite() {
                return Err(IkSolverError::ModelConfigurationError(
                    format!("joint '{}' has invalid limits or default", joint.name)));
            }
            let lookup = |name: &str| link_index.get(name).copied().ok_or_else(||
                IkSolverError::ModelConfigurationError(
                    format!("joint '{}' references unknown link '{}'", joint.name, name)));
            let parent = lookup(&joint.parent_link)?;
            let child = lookup(&joint.child_link)?;
            if child == root || parent_joint[child].is_some() {
                return Err(IkSolverError::ModelConfigurationError(
                    format!("link '{}' has more than one parent", joint.child_link)));
            }
            parent_joint[child] = Some(j);
            parent_link[child] = Some(parent);
            joint_names.push(joint.name.clone());
        }

        // Breadth first from the root, anything not reached is detached or in a loop
        let mut link_order = vec![root];
        let mut next = 0;
        while next < link_order.len() {
            let current = link_order[next];
            for (child, parent) in parent_link.iter().enumerate() {
                if *parent == Some(current) {
                    link_order.push(child);
                }
            }
            next += 1;
        }
        if link_order.len() != links.len() {
            return Err(IkSolverError::ModelConfigurationError(
                format!("{} link(s) are not connected to '{}'", links.len() - link_order.len(), base_frame)));
        }

        let model = RobotModel {
            base_frame: base_frame.to_string(),
            joints,
            joint_names,
            links,
            parent_joint,
            parent_link,
            link_order,
            groups,
            solver: DlsSolver::default(),
        };
        for group in &model.groups {
            model.resolve_group(group)?;
        }
        Ok(model)
    }

    /// Replace the budget and tolerances of the numeric inverse kinematics.
    pub fn with_solver(mut self, config: DlsConfig) -> Self {
        self.solver = DlsSolver::new(config);
        self
    }

    pub fn joints(&self) -> &[RobotJoint] {
        &self.joints
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    fn link_index(&self, name: &str) -> Option<usize> {
        self.links.iter().position(|link| link.name == name)
    }

    /// Joint indices from the root to the given link, root first.
    fn chain_to(&self, link: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = link;
        while let (Some(joint), Some(parent)) = (self.parent_joint[current], self.parent_link[current]) {
            chain.push(joint);
            current = parent;
        }
        chain.reverse();
        chain
    }

    fn chain_pose(&self, chain: &[usize], positions: &[f64]) -> Pose {
        chain.iter().fold(Pose::identity(), |pose, &j| pose * self.joints[j].transform(positions[j]))
    }

    fn resolve_group(&self, definition: &GroupDefinition) -> Result<JointGroup, IkSolverError> {
        let tip = self.link_index(&definition.tip_link).ok_or_else(|| IkSolverError::MalformedJointGroup(
            format!("group '{}' tip link '{}' is not in the model", definition.name, definition.tip_link)))?;
        let chain = self.chain_to(tip);

        let mut joint_indices = Vec::with_capacity(definition.joints.len());
        for joint in &definition.joints {
            let index = self.joint_names.iter().position(|n| n == joint).ok_or_else(||
                IkSolverError::MalformedJointGroup(
                    format!("group '{}' references unknown joint '{}'", definition.name, joint)))?;
            if !chain.contains(&index) {
                return Err(IkSolverError::MalformedJointGroup(format!(
                    "joint '{}' of group '{}' does not move the tip link '{}'",
                    joint, definition.name, definition.tip_link)));
            }
            joint_indices.push(index);
        }

        let moving_links = self.links.iter().enumerate()
            .filter(|(i, _)| self.chain_to(*i).iter().any(|j| joint_indices.contains(j)))
            .map(|(_, link)| link.name.clone())
            .collect();

        JointGroup::new(&definition.name, definition.joints.clone(), joint_indices,
                        &definition.tip_link, moving_links)
    }
}

impl KinematicModel for RobotModel {
    fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    fn default_positions(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.default.clamp(j.lower, j.upper)).collect()
    }

    fn joint_group(&self, name: &str) -> Option<JointGroup> {
        let definition = self.groups.iter().find(|g| g.name == name)?;
        // Checked at construction
        self.resolve_group(definition).ok()
    }

    fn base_frame(&self, _group: &JointGroup) -> String {
        self.base_frame.clone()
    }

    fn links(&self) -> &[RobotLink] {
        &self.links
    }

    fn link_poses(&self, positions: &[f64]) -> Vec<Pose> {
        let mut poses = vec![Pose::identity(); self.links.len()];
        for &link in &self.link_order {
            if let (Some(joint), Some(parent)) = (self.parent_joint[link], self.parent_link[link]) {
                poses[link] = poses[parent] * self.joints[joint].transform(positions[joint]);
            }
        }
        poses
    }

    fn adjacent_links(&self) -> Vec<(String, String)> {
        self.joints.iter()
            .map(|j| (j.parent_link.clone(), j.child_link.clone()))
            .collect()
    }

    fn inverse(&self, group: &JointGroup, target: &Pose, positions: &[f64],
               is_valid: &IkValidity<'_>) -> Option<Solution> {
        let Some(tip) = self.link_index(group.tip_link()) else {
            debug!("Tip link '{}' of group '{}' is not in the model", group.tip_link(), group.name());
            return None;
        };
        let chain = self.chain_to(tip);
        let limits: Vec<(f64, f64)> = group.joint_indices().iter()
            .map(|&j| (self.joints[j].lower, self.joints[j].upper))
            .collect();
        let seed: Vec<f64> = group.joint_indices().iter().map(|&j| positions[j]).collect();

        let forward = |qs: &[f64]| {
            let mut full = positions.to_vec();
            for (&j, &q) in group.joint_indices().iter().zip(qs) {
                full[j] = q;
            }
            self.chain_pose(&chain, &full)
        };
        self.solver.solve(&forward, &limits, target, &seed, is_valid)
    }
}
