//! Damped Least Squares (Levenberg-Marquardt) numeric inverse kinematics.
//!
//! Iterates towards the target pose using the numeric Jacobian of the group
//! forward kinematics. Every converged candidate is offered to the validity gate;
//! rejected candidates do not end the search, the solver restarts from a random
//! configuration within the joint limits until the attempt budget is spent.
//! Random restarts come from a fixed seed so the same query always gives the same
//! answer.

use nalgebra::Vector6;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};
use crate::jacobian::Jacobian;
use crate::kinematic_traits::{IkValidity, Pose, Solution};
use crate::utils::is_finite;

/// Budget and tolerances of the solver.
#[derive(Debug, Clone)]
pub struct DlsConfig {
    /// Maximum iterations per attempt.
    pub max_iterations: usize,
    /// Number of attempts, the first starts from the seed, others from random configurations.
    pub attempts: usize,
    /// Position error tolerance (meters).
    pub position_tolerance: f64,
    /// Orientation error tolerance (radians).
    pub angle_tolerance: f64,
    /// Damping factor (lambda). Higher = more robust near singularities,
    /// but slower convergence.
    pub damping: f64,
    /// Largest joint space step per iteration (norm), longer steps are scaled down.
    pub max_step: f64,
    /// Joint disturbance used for the numeric Jacobian.
    pub epsilon: f64,
    /// Seed of the random restarts.
    pub random_seed: u64,
}

impl Default for DlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            attempts: 16,
            position_tolerance: 1e-5,
            angle_tolerance: 1e-4,
            damping: 0.01,
            max_step: 0.25,
            epsilon: 1e-7,
            random_seed: 0x5eed,
        }
    }
}

/// Damped Least Squares IK solver.
#[derive(Debug, Clone, Default)]
pub struct DlsSolver {
    config: DlsConfig,
}

impl DlsSolver {
    pub fn new(config: DlsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DlsConfig {
        &self.config
    }

    /// Solve for joint values placing the tip at `target`.
    ///
    /// * `forward` - tip pose as a function of the group joint values
    /// * `limits` - (lower, upper) per group joint
    /// * `seed` - starting configuration of the first attempt
    /// * `is_valid` - acceptance gate for converged candidates
    pub fn solve<F>(
        &self,
        forward: &F,
        limits: &[(f64, f64)],
        target: &Pose,
        seed: &[f64],
        is_valid: &IkValidity<'_>,
    ) -> Option<Solution>
    where
        F: Fn(&[f64]) -> Pose + Sync,
    {
        debug_assert_eq!(seed.len(), limits.len());
        let mut rng = StdRng::seed_from_u64(self.config.random_seed);

        for attempt in 0..self.config.attempts {
            let start: Vec<f64> = if attempt == 0 {
                seed.iter().zip(limits).map(|(q, (lo, hi))| q.clamp(*lo, *hi)).collect()
            } else {
                limits.iter().map(|(lo, hi)| random_within(&mut rng, *lo, *hi)).collect()
            };

            match self.converge(forward, limits, target, start) {
                Some(candidate) if is_valid(&candidate) => {
                    debug!("IK accepted on attempt {}", attempt);
                    return Some(candidate);
                }
                Some(_) => trace!("IK candidate of attempt {} rejected by the validity check", attempt),
                None => trace!("IK attempt {} did not converge", attempt),
            }
        }
        debug!("IK failed after {} attempts", self.config.attempts);
        None
    }

    fn converge<F>(&self, forward: &F, limits: &[(f64, f64)], target: &Pose, mut q: Vec<f64>)
        -> Option<Solution>
    where
        F: Fn(&[f64]) -> Pose + Sync,
    {
        for _ in 0..self.config.max_iterations {
            let error = pose_error(&forward(&q), target);
            let position_error = error.fixed_rows::<3>(0).norm();
            let angle_error = error.fixed_rows::<3>(3).norm();
            if position_error < self.config.position_tolerance
                && angle_error < self.config.angle_tolerance {
                return if is_finite(&q) { Some(q) } else { None };
            }

            let jacobian = Jacobian::new(forward, &q, self.config.epsilon);
            let mut step = jacobian.damped_step(&error, self.config.damping)?;
            let norm = step.norm();
            if !norm.is_finite() {
                return None;
            }
            if norm > self.config.max_step {
                step *= self.config.max_step / norm;
            }

            // Clamp to joint limits
            for (i, (lo, hi)) in limits.iter().enumerate() {
                q[i] = (q[i] + step[i]).clamp(*lo, *hi);
            }
        }
        None
    }
}

/// Error between the current and target pose: translation difference followed
/// by the rotation from current to target as the scaled axis, both in the base frame.
pub fn pose_error(current: &Pose, target: &Pose) -> Vector6<f64> {
    let position = target.translation.vector - current.translation.vector;
    let rotation = (target.rotation * current.rotation.inverse()).scaled_axis();
    Vector6::new(position.x, position.y, position.z, rotation.x, rotation.y, rotation.z)
}

fn random_within(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if lo.is_finite() && lo == hi {
        return lo;
    }
    // Unlimited joints are sampled over one turn
    let (lo, hi) = if lo.is_finite() && hi.is_finite() && lo < hi {
        (lo, hi)
    } else {
        (-std::f64::consts::PI, std::f64::consts::PI)
    };
    rng.gen_range(lo..=hi)
}
