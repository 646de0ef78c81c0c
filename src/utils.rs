//! Helper functions

use crate::kinematic_traits::{Pose, Solutions};

/// Checks if all elements in the array are finite
pub fn is_finite(qs: &[f64]) -> bool {
    qs.iter().all(|&q| q.is_finite())
}

/// Print joint values for all solutions, converting radians to degrees.
pub fn dump_solutions(solutions: &Solutions) {
    if solutions.is_empty() {
        println!("No solutions");
    }
    for solution in solutions {
        dump_joints(solution);
    }
}

/// Print joint values, converting radians to degrees.
pub fn dump_joints(joints: &[f64]) {
    let mut row_str = String::new();
    for joint in joints {
        row_str.push_str(&format!("{:5.2} ", joint.to_degrees()));
    }
    println!("[{}]", row_str.trim_end());
}

/// Print the pose as translation and roll, pitch, yaw in degrees.
pub fn dump_pose(pose: &Pose) {
    let translation = pose.translation.vector;
    let (roll, pitch, yaw) = pose.rotation.euler_angles();
    println!(
        "x: {:.5}, y: {:.5}, z: {:.5}, roll: {:5.2}, pitch: {:5.2}, yaw: {:5.2}",
        translation.x, translation.y, translation.z,
        roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()
    );
}

/// Allows to specify joint values in degrees (converts to radians)
pub fn as_radians(degrees: &[f64]) -> Vec<f64> {
    degrees.iter().map(|d| d.to_radians()).collect()
}

/// True if both poses match within the given position (meters) and angle (radians) tolerance.
pub fn poses_close(a: &Pose, b: &Pose, position_tolerance: f64, angle_tolerance: f64) -> bool {
    (a.translation.vector - b.translation.vector).norm() <= position_tolerance
        && a.rotation.angle_to(&b.rotation) <= angle_tolerance
}
