#[cfg(test)]
mod tests {
    use crate::config::SolverConfig;
    use crate::factory::{create_discretized_ik_solver, create_ik_solver};
    use crate::ik_solver::{IkSolver, OBSTACLE_NAME};
    use crate::solver_error::IkSolverError;
    use crate::tests::test_utils::demo_model;

    #[test]
    fn test_create_ik_solver() {
        let config = SolverConfig::new("rail_manipulator", 0.02).with_touch_links(&["tool0", "wrist_2"]);
        let solver = create_ik_solver(demo_model(), &config).expect("solver must build");

        assert_eq!(solver.joint_names().len(), 7);
        assert_eq!(solver.distance_threshold(), 0.02);
        let allowed = solver.scene().allowed_collisions();
        assert!(allowed.is_allowed(OBSTACLE_NAME, "tool0"));
        assert!(allowed.is_allowed(OBSTACLE_NAME, "wrist_2"));
        assert!(!allowed.is_allowed(OBSTACLE_NAME, "wrist_1"));
    }

    #[test]
    fn test_create_errors() {
        let unknown = create_ik_solver(demo_model(), &SolverConfig::new("legs", 0.0));
        assert!(matches!(unknown, Err(IkSolverError::UnknownPlanningGroup(_))));

        let negative = create_ik_solver(demo_model(), &SolverConfig::new("manipulator", -1.0));
        assert!(matches!(negative, Err(IkSolverError::InvalidThreshold(_))));

        let no_angle = create_discretized_ik_solver(demo_model(), &SolverConfig::new("manipulator", 0.0));
        assert!(matches!(no_angle, Err(IkSolverError::MissingField(ref f)) if f == "discretization_angle"));

        let nan_angle = create_discretized_ik_solver(
            demo_model(), &SolverConfig::new("manipulator", 0.0).with_discretization_angle(f64::NAN));
        assert!(matches!(nan_angle, Err(IkSolverError::InvalidDiscretizationAngle(_))));
    }

    #[test]
    fn test_create_discretized() {
        let config = SolverConfig::new("manipulator", 0.0).with_discretization_angle(0.01);
        let solver = create_discretized_ik_solver(demo_model(), &config).expect("solver must build");
        assert_eq!(solver.n_discretizations(), 628);
        assert_eq!(solver.joint_names(), solver.inner().joint_names());
        assert_eq!(solver.base_frame(), "base_link");

        let clamped = create_discretized_ik_solver(
            demo_model(), &SolverConfig::new("manipulator", 0.0).with_discretization_angle(10.0))
            .expect("solver must build");
        assert_eq!(clamped.n_discretizations(), 2);
    }
}
