//! Construction of solvers from [`SolverConfig`], applying the optional obstacle mesh
//! and touch links.

use std::sync::Arc;
use tracing::info;
use crate::config::SolverConfig;
use crate::discretized::DiscretizedIkSolver;
use crate::ik_solver::{ClearanceIkSolver, IkSolver};
use crate::kinematic_traits::KinematicModel;
use crate::solver_error::IkSolverError;

/// Single pose solver for the configured planning group.
pub fn create_ik_solver(model: Arc<dyn KinematicModel>, config: &SolverConfig)
                        -> Result<ClearanceIkSolver, IkSolverError> {
    let mut solver = ClearanceIkSolver::new(model, &config.planning_group, config.distance_threshold)?;

    if let Some(mesh) = &config.collision_mesh_filename {
        let frame = config.collision_mesh_frame.clone().unwrap_or_else(|| solver.base_frame());
        add_mesh(&mut solver, mesh, &frame)?;
    }

    if !config.touch_links.is_empty() {
        solver.set_touch_links(&config.touch_links);
    }
    Ok(solver)
}

/// Solver sampling the tool rotation, `discretization_angle` must be configured.
pub fn create_discretized_ik_solver(model: Arc<dyn KinematicModel>, config: &SolverConfig)
                                    -> Result<DiscretizedIkSolver<ClearanceIkSolver>, IkSolverError> {
    let dt = config.discretization_angle
        .ok_or_else(|| IkSolverError::MissingField("discretization_angle".to_string()))?;
    let inner = create_ik_solver(model, config)?;
    Ok(DiscretizedIkSolver::new(inner, dt)?.with_parallel(config.parallel_discretization))
}

#[cfg(feature = "allow_filesystem")]
fn add_mesh(solver: &mut ClearanceIkSolver, mesh: &str, frame: &str) -> Result<(), IkSolverError> {
    info!("Adding collision mesh '{}' at '{}'", mesh, frame);
    solver.add_collision_mesh(mesh, frame)
}

#[cfg(not(feature = "allow_filesystem"))]
fn add_mesh(_solver: &mut ClearanceIkSolver, mesh: &str, _frame: &str) -> Result<(), IkSolverError> {
    info!("Collision mesh '{}' requested but file access is disabled", mesh);
    Err(IkSolverError::MeshLoadError {
        path: mesh.to_string(),
        reason: "built without the allow_filesystem feature".to_string(),
    })
}
