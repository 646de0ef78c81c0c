//! Sampling of the tool rotation about its own Z axis. Tools like drills or nozzles do
//! not care about this rotation, so every sample the inner solver can reach is a
//! candidate configuration for the same task.

use std::f64::consts::PI;
use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::{info, warn};
use crate::ik_solver::IkSolver;
use crate::kinematic_traits::{Pose, Seed, Solutions};
use crate::solver_error::IkSolverError;

/// Smallest accepted discretization angle, smaller values (also zero) are raised to it.
pub const MIN_DISCRETIZATION_ANGLE: f64 = 1e-3;

/// Bring the discretization angle into (0, π]. The sign is dropped, so -0.5 is a 0.5 rad step.
/// Infinity becomes π, NaN is rejected.
pub fn clamp_discretization_angle(dt: f64) -> Result<f64, IkSolverError> {
    if dt.is_nan() {
        return Err(IkSolverError::InvalidDiscretizationAngle(dt));
    }
    let clamped = dt.abs().clamp(MIN_DISCRETIZATION_ANGLE, PI);
    if clamped != dt {
        warn!("Clamping discretization angle between 0 and pi; new value is {}", clamped);
    }
    Ok(clamped)
}

/// Wraps another solver and calls it for the target rotated by `i * dt` about its
/// local Z axis, `i` in `0..floor(2π / dt)`. The seed is the same for every sample.
/// Solutions are returned in the order of the sample angle.
pub struct DiscretizedIkSolver<S: IkSolver> {
    inner: S,
    dt: f64,
    n_discretizations: usize,
    parallel: bool,
}

impl<S: IkSolver> DiscretizedIkSolver<S> {
    pub fn new(inner: S, dt: f64) -> Result<Self, IkSolverError> {
        let dt = clamp_discretization_angle(dt)?;
        let n_discretizations = ((2.0 * PI) / dt).floor() as usize;
        info!("Discretized IK: {} samples, {:.4} rad apart", n_discretizations, dt);
        Ok(DiscretizedIkSolver {
            inner,
            dt,
            n_discretizations,
            parallel: false,
        })
    }

    /// Solve the samples on the rayon thread pool. The order of solutions does not change.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Effective (clamped) angle between samples
    pub fn discretization_angle(&self) -> f64 {
        self.dt
    }

    pub fn n_discretizations(&self) -> usize {
        self.n_discretizations
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Access to the wrapped solver, for instance to change the obstacle.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    fn sample(&self, target: &Pose, i: usize) -> Pose {
        target * Pose::rotation(Vector3::z() * (i as f64 * self.dt))
    }
}

impl<S: IkSolver> IkSolver for DiscretizedIkSolver<S> {
    fn solve(&self, target: &Pose, seed: &Seed) -> Solutions {
        let solve_sample = |i: usize| self.inner.solve(&self.sample(target, i), seed).into_iter().next();

        if self.parallel {
            // Indexed parallel iterator collects in the index order
            (0..self.n_discretizations).into_par_iter()
                .filter_map(solve_sample)
                .collect()
        } else {
            (0..self.n_discretizations)
                .filter_map(solve_sample)
                .collect()
        }
    }

    fn joint_names(&self) -> Vec<String> {
        self.inner.joint_names()
    }

    fn base_frame(&self) -> String {
        self.inner.base_frame()
    }
}
