//! Command line front end: solves a single pose for the demo arm.

use std::sync::Arc;
use anyhow::{bail, Context, Result};
use clap::Parser;
use nalgebra::{Translation3, UnitQuaternion};
use rs_reach_ik::config::SolverConfig;
use rs_reach_ik::factory::{create_discretized_ik_solver, create_ik_solver};
use rs_reach_ik::ik_solver::IkSolver;
use rs_reach_ik::kinematic_traits::{KinematicModel, Pose, Seed};
use rs_reach_ik::robot_model::{JointKind, RobotModel};
use rs_reach_ik::utils::{as_radians, dump_pose, dump_solutions};

/// Collision and clearance aware inverse kinematics for the bundled demo arm.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// YAML solver configuration. Without it, the `manipulator` group is used with no clearance.
    #[arg(short, long)]
    config: Option<String>,

    /// Target position in meters.
    #[arg(long, num_args = 3, allow_negative_numbers = true, default_values_t = [0.3, 0.0, 0.8])]
    xyz: Vec<f64>,

    /// Target orientation as roll, pitch, yaw in degrees.
    #[arg(long, num_args = 3, allow_negative_numbers = true, default_values_t = [0.0, 180.0, 0.0])]
    rpy: Vec<f64>,

    /// Seed joint positions in degrees (or meters for the rail), as name=value.
    #[arg(short, long)]
    seed: Vec<String>,

    /// Sample the tool rotation about its Z axis (needs discretization_angle).
    #[arg(short, long)]
    discretized: bool,

    /// Angle between samples in degrees, overrides the configuration.
    #[arg(long)]
    discretization_angle: Option<f64>,
}

fn parse_seed(model: &RobotModel, entries: &[String]) -> Result<Seed> {
    let mut seed = Seed::new();
    for entry in entries {
        let (name, value) = entry.split_once('=')
            .with_context(|| format!("seed entry '{}' is not name=value", entry))?;
        let name = name.trim();
        let value: f64 = value.trim().parse()
            .with_context(|| format!("seed value of '{}' is not a number", name))?;
        let prismatic = model.joints().iter()
            .any(|j| j.name == name && j.kind == JointKind::Prismatic);
        seed.insert(name.to_string(), if prismatic { value } else { value.to_radians() });
    }
    Ok(seed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SolverConfig::from_yaml_file(path)
            .with_context(|| format!("reading configuration '{}'", path))?,
        None => SolverConfig::new("manipulator", 0.0),
    };
    if let Some(degrees) = cli.discretization_angle {
        config.discretization_angle = Some(degrees.to_radians());
    }

    let robot = RobotModel::demo_arm().context("building the demo arm")?;
    let seed = parse_seed(&robot, &cli.seed)?;
    let model: Arc<dyn KinematicModel> = Arc::new(robot);

    if cli.xyz.len() != 3 || cli.rpy.len() != 3 {
        bail!("position and orientation need three values each");
    }
    let rpy = as_radians(&cli.rpy);
    let target = Pose::from_parts(
        Translation3::new(cli.xyz[0], cli.xyz[1], cli.xyz[2]),
        UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
    );
    println!("Target:");
    dump_pose(&target);

    let solver: Box<dyn IkSolver> = if cli.discretized {
        let solver = create_discretized_ik_solver(model, &config)?;
        println!("Sampling {} tool rotations", solver.n_discretizations());
        Box::new(solver)
    } else {
        Box::new(create_ik_solver(model, &config)?)
    };

    println!("Joints: {}", solver.joint_names().join(", "));
    let solutions = solver.solve(&target, &seed);
    println!("Solutions in degrees ({}):", solutions.len());
    dump_solutions(&solutions);
    Ok(())
}
