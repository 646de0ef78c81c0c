//! Collision and clearance aware inverse kinematics, with sampling of the tool rotation
//! about its approach axis.
//!
//! Many tools (drills, glue nozzles, welding torches) do not care how they are rotated
//! about their own Z axis. To find out whether the robot can reach a pose with such a
//! tool, it is enough that *some* rotation about that axis is reachable without collisions.
//!
//! # Features
//!
//! - Numeric inverse kinematics (damped least squares) for any joint group of a kinematic
//!   model, with random restarts from a fixed seed, so the results are repeatable.
//! - Every solution is checked against collisions between the moving links, other links and
//!   the obstacle. Optionally the links must also keep a minimal distance from the obstacle.
//!   Rejected candidates do not stop the search.
//! - Touch links: links allowed to contact the obstacle (like the tool touching the part).
//! - [`discretized::DiscretizedIkSolver`] samples the rotation of the target about its
//!   Z axis and returns all reachable samples, optionally solving them in parallel.
//! - The solvers can be built from YAML configuration; the obstacle can be loaded from
//!   STL, PLY or OBJ.
//!
//! ```
//! use std::sync::Arc;
//! use rs_reach_ik::ik_solver::{ClearanceIkSolver, IkSolver};
//! use rs_reach_ik::kinematic_traits::{KinematicModel, Pose, Seed};
//! use rs_reach_ik::robot_model::RobotModel;
//!
//! let model: Arc<dyn KinematicModel> = Arc::new(RobotModel::demo_arm().unwrap());
//! let solver = ClearanceIkSolver::new(model, "manipulator", 0.0).unwrap();
//!
//! // The flange straight above the base, as it is at the default configuration
//! let target = Pose::translation(0.0, 0.0, 1.15);
//! let solutions = solver.solve(&target, &Seed::new());
//! assert_eq!(solutions.len(), 1);
//! assert_eq!(solutions[0].len(), solver.joint_names().len());
//! ```

pub mod kinematic_traits;
pub mod solver_error;
pub mod utils;

pub mod joint_group;
pub mod link_body;
pub mod robot_model;
pub mod robots;

pub mod jacobian;
pub mod dls;

pub mod allowed_collisions;
pub mod collision_scene;
pub mod validity;

pub mod ik_solver;
pub mod discretized;

pub mod config;
pub mod factory;

#[cfg(feature = "allow_filesystem")]
pub mod config_from_file;

#[cfg(feature = "allow_filesystem")]
pub mod mesh;

#[cfg(test)]
mod tests;
