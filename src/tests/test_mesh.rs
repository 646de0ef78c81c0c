#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use crate::config::SolverConfig;
    use crate::factory::{create_discretized_ik_solver, create_ik_solver};
    use crate::ik_solver::{ClearanceIkSolver, IkSolver, OBSTACLE_NAME};
    use crate::kinematic_traits::{Pose, Seed};
    use crate::solver_error::IkSolverError;
    use crate::tests::test_utils::{demo_model, full};

    const OBSTACLE_FILE: &str = "src/tests/data/obstacle.stl";

    fn home() -> Pose {
        Pose::translation(0.0, 0.0, 1.15)
    }

    #[test]
    fn test_collision_mesh_at_flange() {
        let mut solver = ClearanceIkSolver::new(demo_model(), "manipulator", 0.0).expect("solver");
        solver.add_collision_mesh(OBSTACLE_FILE, "tool0").expect("mesh must load");
        assert_eq!(solver.scene().obstacle(OBSTACLE_NAME).map(|b| b.frame.as_str()), Some("tool0"));

        // Small cube inside the flange box
        assert!(!solver.is_valid(&full(0.0, &[0.0; 6])));
        assert!(solver.solve(&home(), &Seed::new()).is_empty());

        solver.set_touch_links(&["tool0".to_string()]);
        assert_eq!(solver.solve(&home(), &Seed::new()).len(), 1);
    }

    #[test]
    fn test_missing_mesh() {
        let mut solver = ClearanceIkSolver::new(demo_model(), "manipulator", 0.0).expect("solver");
        let result = solver.add_collision_mesh("src/tests/data/missing.stl", "base_link");
        assert!(matches!(result, Err(IkSolverError::MeshLoadError { .. })));
        assert_eq!(solver.scene().obstacle_count(), 0);
    }

    #[test]
    fn test_factory_from_yaml() {
        let config = SolverConfig::from_yaml_file("src/tests/data/solver_full.yaml")
            .expect("configuration must load");
        let solver = create_discretized_ik_solver(demo_model(), &config).expect("solver must build");

        assert_eq!(solver.n_discretizations(), 4);
        assert_eq!(solver.inner().scene().obstacle_count(), 1);
        assert!(solver.inner().scene().allowed_collisions().is_allowed("tool0", OBSTACLE_NAME));

        // Wrist stays 0.06 below the cube for any rotation about the flange axis
        let solutions = solver.solve(&home(), &Seed::new());
        assert_eq!(solutions.len(), 4);
        assert!(solutions.iter().all(|s| s.len() == 6));
    }

    #[test]
    fn test_factory_threshold_too_large() {
        let mut config = SolverConfig::from_yaml_file("src/tests/data/solver_full.yaml")
            .expect("configuration must load");
        config.distance_threshold = 0.1;
        config.discretization_angle = Some(PI);
        let solver = create_discretized_ik_solver(demo_model(), &config).expect("solver must build");
        assert!(solver.solve(&home(), &Seed::new()).is_empty());
    }

    #[test]
    fn test_factory_mesh_error() {
        let mut config = SolverConfig::new("manipulator", 0.0);
        config.collision_mesh_filename = Some("src/tests/data/missing.stl".to_string());
        assert!(matches!(create_ik_solver(demo_model(), &config),
            Err(IkSolverError::MeshLoadError { .. })));

        // Without a frame, the mesh goes to the base frame
        config.collision_mesh_filename = Some(OBSTACLE_FILE.to_string());
        let solver = create_ik_solver(demo_model(), &config).expect("solver must build");
        assert_eq!(solver.scene().obstacle(OBSTACLE_NAME).map(|b| b.frame.as_str()), Some("base_link"));
    }
}
