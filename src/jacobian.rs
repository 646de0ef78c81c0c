extern crate nalgebra as na;
use na::{DMatrix, DVector, Vector6};
use rayon::prelude::*;
use crate::kinematic_traits::Pose;

/// Struct representing the Jacobian matrix of a joint group
pub struct Jacobian {
    /// A 6xN matrix representing the Jacobian
    ///
    /// The Jacobian matrix maps the joint velocities to the end-effector velocities.
    /// Each column corresponds to a joint, and each row corresponds to a degree of freedom
    /// of the end-effector (linear and angular velocities).
    matrix: DMatrix<f64>,
}

impl Jacobian {
    /// Constructs a new Jacobian struct by numeric differentiation of the forward kinematics
    ///
    /// # Arguments
    ///
    /// * `forward` - Forward kinematics of the group tip, taking group joint values
    /// * `qs` - Joint configuration to differentiate at
    /// * `epsilon` - A small value used for numerical differentiation
    ///
    /// # Returns
    ///
    /// A new instance of `Jacobian`
    pub fn new<F>(forward: &F, qs: &[f64], epsilon: f64) -> Self
    where
        F: Fn(&[f64]) -> Pose + Sync,
    {
        Self { matrix: compute_jacobian(forward, qs, epsilon) }
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Computes the joint step that reduces the given end-effector error (linear, angular),
    /// using damped least squares: dq = J^T (J J^T + lambda^2 I)^-1 e
    ///
    /// Returns None if the damped matrix is still not invertible.
    pub fn damped_step(&self, error: &Vector6<f64>, damping: f64) -> Option<DVector<f64>> {
        let jjt = &self.matrix * self.matrix.transpose();
        let damped = jjt + DMatrix::identity(6, 6) * (damping * damping);
        let damped_inverse = damped.try_inverse()?;
        let error = DVector::from_column_slice(error.as_slice());
        Some(self.matrix.transpose() * damped_inverse * error)
    }
}

/// Function to compute the Jacobian matrix for the given forward kinematics and joint configuration
///
/// # Arguments
///
/// * `forward` - Forward kinematics of the group tip
/// * `joints` - The joint configuration
/// * `epsilon` - A small value used for numerical differentiation
///
/// # Returns
///
/// A 6xN matrix representing the Jacobian, N being the number of joints.
pub fn compute_jacobian<F>(forward: &F, joints: &[f64], epsilon: f64) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Pose + Sync,
{
    let dof = joints.len();
    let mut jacobian = DMatrix::zeros(6, dof);
    let current_pose = forward(joints);
    let current_position = current_pose.translation.vector;
    let current_orientation = current_pose.rotation;

    // Parallelize the loop using rayon
    let jacobian_columns: Vec<_> = (0..dof).into_par_iter().map(|i| {
        let mut perturbed_qs = joints.to_vec();
        perturbed_qs[i] += epsilon;
        let perturbed_pose = forward(&perturbed_qs);
        let perturbed_position = perturbed_pose.translation.vector;
        let perturbed_orientation = perturbed_pose.rotation;

        let delta_position = (perturbed_position - current_position) / epsilon;
        let delta_orientation = (perturbed_orientation * current_orientation.inverse()).scaled_axis() / epsilon;

        (delta_position, delta_orientation)
    }).collect();

    for (i, (delta_position, delta_orientation)) in jacobian_columns.into_iter().enumerate() {
        jacobian.fixed_view_mut::<3, 1>(0, i).copy_from(&delta_position);
        jacobian.fixed_view_mut::<3, 1>(3, i).copy_from(&delta_orientation);
    }

    jacobian
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::{Isometry3, Translation3, UnitQuaternion};

    const EPSILON: f64 = 1e-6;

    /// Single rotary joint of the length 1 rotating about Z.
    /// When the joint rotates, it affects the Y-position and the Z-orientation of the end-effector.
    fn single_rotary_joint(qs: &[f64]) -> Pose {
        let angle = qs[0];
        let rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, angle);
        let translation = Translation3::new(angle.cos(), angle.sin(), 0.0);
        Isometry3::from_parts(translation, rotation)
    }

    #[test]
    fn test_compute_jacobian() {
        let jacobian = compute_jacobian(&single_rotary_joint, &[0.0], EPSILON);
        assert_eq!(jacobian.ncols(), 1);
        assert_eq!(jacobian.nrows(), 6);

        let expected = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        for row in 0..6 {
            assert!((jacobian[(row, 0)] - expected[row]).abs() < 1e-4,
                    "row {} is {} but {} expected", row, jacobian[(row, 0)], expected[row]);
        }
    }

    #[test]
    fn test_damped_step_follows_error() {
        let jacobian = Jacobian::new(&single_rotary_joint, &[0.0], EPSILON);

        // Tip moving along Y while turning around Z is exactly what the joint does
        let error = Vector6::new(0.0, 0.1, 0.0, 0.0, 0.0, 0.1);
        let step = jacobian.damped_step(&error, 1e-3).expect("must be invertible with damping");
        assert_eq!(step.len(), 1);
        assert!((step[0] - 0.1).abs() < 1e-3);
    }
}
