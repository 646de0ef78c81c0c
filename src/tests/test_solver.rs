#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::ik_solver::{ClearanceIkSolver, IkSolver, OBSTACLE_NAME};
    use crate::kinematic_traits::{KinematicModel, Pose, Seed};
    use crate::solver_error::IkSolverError;
    use crate::tests::test_utils::{arm_seed, cube, demo_model, full, RecordingObserver};
    use crate::utils::poses_close;

    const TARGET_JOINTS: [f64; 6] = [0.3, 0.4, 0.6, 0.2, 0.5, -0.3];
    const NEARBY_SEED: [f64; 6] = [0.35, 0.35, 0.65, 0.25, 0.45, -0.25];

    /// Flange pose at the default configuration
    fn home() -> Pose {
        Pose::translation(0.0, 0.0, 1.15)
    }

    fn tool0_pose(model: &Arc<dyn KinematicModel>, positions: &[f64]) -> Pose {
        let index = model.links().iter().position(|l| l.name == "tool0").expect("tool0");
        model.link_poses(positions)[index]
    }

    fn solver(threshold: f64) -> (Arc<dyn KinematicModel>, ClearanceIkSolver) {
        let model = demo_model();
        let solver = ClearanceIkSolver::new(model.clone(), "manipulator", threshold)
            .expect("solver must build");
        (model, solver)
    }

    #[test]
    fn test_construction_errors() {
        let model = demo_model();
        let unknown = ClearanceIkSolver::new(model.clone(), "gantry", 0.0);
        assert!(matches!(unknown, Err(IkSolverError::UnknownPlanningGroup(ref g)) if g == "gantry"));

        assert!(matches!(ClearanceIkSolver::new(model.clone(), "manipulator", -0.1),
            Err(IkSolverError::InvalidThreshold(_))));
        assert!(matches!(ClearanceIkSolver::new(model, "manipulator", f64::NAN),
            Err(IkSolverError::InvalidThreshold(_))));
    }

    #[test]
    fn test_joint_names_and_frame() {
        let (_, solver) = solver(0.0);
        assert_eq!(solver.joint_names(), vec!["j1", "j2", "j3", "j4", "j5", "j6"]);
        assert_eq!(solver.base_frame(), "base_link");
    }

    #[test]
    fn test_reachable_pose() {
        let (model, solver) = solver(0.0);
        let target = tool0_pose(&model, &full(0.0, &TARGET_JOINTS));

        let solutions = solver.solve(&target, &arm_seed(&NEARBY_SEED));
        assert_eq!(solutions.len(), 1);
        let solution = &solutions[0];
        assert_eq!(solution.len(), solver.joint_names().len());

        let joints: [f64; 6] = solution.clone().try_into().expect("6 joints");
        let reached = tool0_pose(&model, &full(0.0, &joints));
        assert!(poses_close(&reached, &target, 1e-4, 1e-3), "reached {:?}", reached);
        assert!(solver.is_valid(&full(0.0, &joints)));
    }

    #[test]
    fn test_seed_outside_group_is_kept() {
        let (model, solver) = solver(0.0);
        let target = tool0_pose(&model, &full(0.1, &TARGET_JOINTS));

        let mut seed = arm_seed(&NEARBY_SEED);
        seed.insert("rail".to_string(), 0.1);
        seed.insert("not_a_joint".to_string(), 42.0);

        let solutions = solver.solve(&target, &seed);
        assert_eq!(solutions.len(), 1);
        let joints: [f64; 6] = solutions[0].clone().try_into().expect("6 joints");
        assert!(poses_close(&tool0_pose(&model, &full(0.1, &joints)), &target, 1e-4, 1e-3));
    }

    #[test]
    fn test_obstacle_in_tool_and_touch_links() {
        let (_, mut solver) = solver(0.0);
        solver.add_obstacle(cube(0.0, 0.0, 1.2, 0.01), "base_link").expect("base frame");

        assert!(solver.solve(&home(), &Seed::new()).is_empty());
        assert!(!solver.is_valid(&full(0.0, &[0.0; 6])));

        solver.set_touch_links(&["tool0".to_string()]);
        let solutions = solver.solve(&home(), &Seed::new());
        assert_eq!(solutions, vec![vec![0.0; 6]]);
    }

    #[test]
    fn test_clearance_threshold() {
        // Flange box stays 0.16 away from this cube whatever the arm does to reach the home pose
        let (_, mut near) = solver(0.1);
        near.add_obstacle(cube(0.2, 0.0, 1.2, 0.01), "base_link").expect("base frame");
        assert_eq!(near.solve(&home(), &Seed::new()).len(), 1);

        let (_, mut far) = solver(0.2);
        far.add_obstacle(cube(0.2, 0.0, 1.2, 0.01), "base_link").expect("base frame");
        assert!(far.solve(&home(), &Seed::new()).is_empty());
        assert!(!far.is_valid(&full(0.0, &[0.0; 6])));
    }

    #[test]
    fn test_unknown_frame() {
        let (_, mut solver) = solver(0.0);
        let result = solver.add_obstacle(cube(0.0, 0.0, 0.0, 0.1), "world");
        assert!(matches!(result, Err(IkSolverError::UnknownFrame(_))));
        assert_eq!(solver.scene().obstacle_count(), 0);
    }

    #[test]
    fn test_unreachable_pose() {
        let (_, solver) = solver(0.0);
        assert!(solver.solve(&Pose::translation(5.0, 0.0, 0.0), &Seed::new()).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let (model, solver) = solver(0.0);
        let target = tool0_pose(&model, &full(0.0, &TARGET_JOINTS));
        // Far seed so that random restarts are involved
        let seed = arm_seed(&[-2.0, 1.5, -1.5, 2.0, -1.0, 2.0]);
        assert_eq!(solver.solve(&target, &seed), solver.solve(&target, &seed));
    }

    #[test]
    fn test_rail_group() {
        let model = demo_model();
        let solver = ClearanceIkSolver::new(model.clone(), "rail_manipulator", 0.0)
            .expect("solver must build");
        assert_eq!(solver.joint_names().len(), 7);

        let target = tool0_pose(&model, &full(0.5, &TARGET_JOINTS));
        let mut seed = arm_seed(&NEARBY_SEED);
        seed.insert("rail".to_string(), 0.45);
        let solutions = solver.solve(&target, &seed);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].len(), 7);
        assert!(poses_close(&tool0_pose(&model, &solutions[0]), &target, 1e-4, 1e-3));
    }

    #[test]
    fn test_scene_observer() {
        let (_, mut solver) = solver(0.0);
        let observer = RecordingObserver::default();
        solver.subscribe(Box::new(observer.clone()));
        assert_eq!(observer.count(), 1);

        solver.add_obstacle(cube(1.0, 0.0, 0.5, 0.1), "base_link").expect("base frame");
        solver.set_touch_links(&["tool0".to_string(), "gripper".to_string()]);
        assert_eq!(observer.count(), 3);

        let snapshot = observer.last().expect("snapshot");
        assert_eq!(snapshot.obstacles, vec![(OBSTACLE_NAME.to_string(), "base_link".to_string())]);
        // Unknown links are accepted
        assert!(solver.scene().allowed_collisions().is_allowed("gripper", OBSTACLE_NAME));
    }
}
