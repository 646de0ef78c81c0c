//! Hardcoded robot models

use std::f64::consts::PI;
use nalgebra::Vector3;
use crate::kinematic_traits::Pose;
use crate::link_body::RobotLink;
use crate::robot_model::{GroupDefinition, RobotJoint, RobotModel};
use crate::solver_error::IkSolverError;

impl RobotModel {
    /// Six axis arm standing on a linear rail along X. At the default configuration
    /// all joints are at zero and the arm sticks straight up, the flange (`tool0`)
    /// is 1.15 m above the base.
    ///
    /// Groups:
    /// * `manipulator` - j1 to j6, tip `tool0`
    /// * `rail_manipulator` - rail and j1 to j6, tip `tool0`
    pub fn demo_arm() -> Result<Self, IkSolverError> {
        let z = |h: f64| Pose::translation(0.0, 0.0, h);
        let wide = (-PI, PI);
        let bent = (-2.5, 2.5);

        let joints = vec![
            RobotJoint::prismatic("rail", "base_link", "rail_carriage", Pose::identity(), Vector3::x(), (-1.0, 1.0)),
            RobotJoint::revolute("j1", "rail_carriage", "shoulder_link", z(0.1), Vector3::z(), wide),
            RobotJoint::revolute("j2", "shoulder_link", "upper_arm", z(0.2), Vector3::y(), bent),
            RobotJoint::revolute("j3", "upper_arm", "forearm", z(0.4), Vector3::y(), bent),
            RobotJoint::revolute("j4", "forearm", "wrist_1", z(0.1), Vector3::z(), wide),
            RobotJoint::revolute("j5", "wrist_1", "wrist_2", z(0.25), Vector3::y(), bent),
            RobotJoint::revolute("j6", "wrist_2", "tool0", z(0.1), Vector3::z(), wide),
        ];

        // Boxes leave a gap around every joint so that the straight arm is collision free
        let slab = |name: &str, center: f32, half: f32| {
            RobotLink::with_box(name, Vector3::new(0.0, 0.0, center), Vector3::new(0.04, 0.04, half))
        };
        let links = vec![
            RobotLink::frame("base_link"),
            RobotLink::frame("rail_carriage"),
            slab("shoulder_link", 0.1, 0.08),
            slab("upper_arm", 0.2, 0.17),
            slab("forearm", 0.05, 0.03),
            slab("wrist_1", 0.125, 0.1),
            slab("wrist_2", 0.05, 0.03),
            RobotLink::with_box("tool0", Vector3::new(0.0, 0.0, 0.05), Vector3::new(0.03, 0.03, 0.04)),
        ];

        let arm = ["j1", "j2", "j3", "j4", "j5", "j6"];
        let groups = vec![
            GroupDefinition::new("manipulator", &arm, "tool0"),
            GroupDefinition::new("rail_manipulator", &[&["rail"][..], &arm[..]].concat(), "tool0"),
        ];

        RobotModel::new("base_link", links, joints, groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematic_traits::KinematicModel;

    #[test]
    fn test_demo_arm_home() {
        let robot = RobotModel::demo_arm().expect("demo arm must build");
        assert_eq!(robot.joint_names().len(), 7);
        assert_eq!(robot.group_names(), vec!["manipulator", "rail_manipulator"]);

        let poses = robot.link_poses(&robot.default_positions());
        let tool0 = robot.links().iter().position(|l| l.name == "tool0").expect("tool0");
        assert!((poses[tool0].translation.vector - Vector3::new(0.0, 0.0, 1.15)).norm() < 1e-12);
    }

    #[test]
    fn test_demo_arm_groups() {
        let robot = RobotModel::demo_arm().expect("demo arm must build");
        let manipulator = robot.joint_group("manipulator").expect("manipulator");
        assert_eq!(manipulator.dof(), 6);
        assert!(!manipulator.moves_link("rail_carriage"));
        assert!(manipulator.moves_link("shoulder_link"));

        let rail = robot.joint_group("rail_manipulator").expect("rail_manipulator");
        assert_eq!(rail.dof(), 7);
        assert_eq!(rail.joint_names()[0], "rail");
        assert!(rail.moves_link("rail_carriage"));
    }
}
