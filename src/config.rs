//! Settings the solver factories are built from.

/// Solver configuration. Usually read from YAML (see `from_yaml_file` with the
/// `allow_filesystem` feature) but can also be filled in code.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Joint group of the kinematic model the solver controls
    pub planning_group: String,
    /// Minimal clearance from the obstacle in meters, 0 to only check collisions
    pub distance_threshold: f64,
    /// Angle between samples about the tool Z axis, used by the discretized solver
    pub discretization_angle: Option<f64>,
    /// Obstacle mesh to load (STL, PLY, OBJ)
    pub collision_mesh_filename: Option<String>,
    /// Frame the obstacle mesh is attached to, the base frame if not given
    pub collision_mesh_frame: Option<String>,
    /// Links allowed to touch the obstacle
    pub touch_links: Vec<String>,
    /// Solve the discretized samples in parallel
    pub parallel_discretization: bool,
}

impl SolverConfig {
    /// Configuration with the required settings only.
    pub fn new(planning_group: &str, distance_threshold: f64) -> Self {
        SolverConfig {
            planning_group: planning_group.to_string(),
            distance_threshold,
            discretization_angle: None,
            collision_mesh_filename: None,
            collision_mesh_frame: None,
            touch_links: Vec::new(),
            parallel_discretization: false,
        }
    }

    pub fn with_discretization_angle(mut self, dt: f64) -> Self {
        self.discretization_angle = Some(dt);
        self
    }

    pub fn with_touch_links(mut self, links: &[&str]) -> Self {
        self.touch_links = links.iter().map(|l| l.to_string()).collect();
        self
    }
}
