#[cfg(test)]
mod tests {
    use crate::config::SolverConfig;
    use crate::solver_error::IkSolverError;

    const READ_ERROR: &'static str = "Failed to load configuration from file";

    #[test]
    fn test_minimal_from_yaml() {
        let loaded = SolverConfig::from_yaml_file("src/tests/data/solver_minimal.yaml").expect(READ_ERROR);
        assert_eq!(loaded, SolverConfig::new("manipulator", 0.0));
    }

    #[test]
    fn test_full_from_yaml() {
        let loaded = SolverConfig::from_yaml_file("src/tests/data/solver_full.yaml").expect(READ_ERROR);

        assert_eq!(loaded.planning_group, "manipulator");
        assert_eq!(loaded.distance_threshold, 0.05);
        assert_eq!(loaded.discretization_angle, Some(1.5));
        // Relative to the directory of the YAML file
        assert_eq!(loaded.collision_mesh_filename.as_deref(), Some("src/tests/data/obstacle.stl"));
        assert_eq!(loaded.collision_mesh_frame.as_deref(), Some("tool0"));
        assert_eq!(loaded.touch_links, vec!["tool0".to_string()]);
        assert!(loaded.parallel_discretization);
    }

    #[test]
    fn test_legacy_frame_key_from_yaml() {
        let loaded = SolverConfig::from_yaml_file("src/tests/data/solver_legacy.yaml").expect(READ_ERROR);
        assert_eq!(loaded.planning_group, "rail_manipulator");
        assert_eq!(loaded.collision_mesh_frame.as_deref(), Some("tool0"));
        assert!(loaded.touch_links.is_empty());
        assert!(!loaded.parallel_discretization);
    }

    #[test]
    fn test_missing_file() {
        let result = SolverConfig::from_yaml_file("src/tests/data/no_such_config.yaml");
        assert!(matches!(result, Err(IkSolverError::IoError(_))));
    }
}
