//! Error handling for solver construction and scene setup

use std::io;

/// Structural failures: the solver or its scene cannot be set up. Note that a pose
/// being unreachable is never reported through this type, solvers return an empty
/// list of solutions instead.
#[derive(Debug)]
pub enum IkSolverError {
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
    WrongType { field: String, expected: &'static str },
    UnknownPlanningGroup(String),
    MalformedJointGroup(String),
    InvalidThreshold(f64),
    InvalidDiscretizationAngle(f64),
    UnknownFrame(String),
    MeshLoadError { path: String, reason: String },
    ModelConfigurationError(String),
}

impl std::fmt::Display for IkSolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            IkSolverError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            IkSolverError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            IkSolverError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
            IkSolverError::WrongType { ref field, expected } =>
                write!(f, "Wrong Type: '{}' must be {}", field, expected),
            IkSolverError::UnknownPlanningGroup(ref group) =>
                write!(f, "Failed to initialize joint model group for planning group '{}'", group),
            IkSolverError::MalformedJointGroup(ref msg) =>
                write!(f, "Malformed joint group: {}", msg),
            IkSolverError::InvalidThreshold(value) =>
                write!(f, "Distance threshold must be finite and non-negative, got {}", value),
            IkSolverError::InvalidDiscretizationAngle(value) =>
                write!(f, "Discretization angle must be finite, got {}", value),
            IkSolverError::UnknownFrame(ref frame) =>
                write!(f, "Frame '{}' is neither the base frame nor a robot link", frame),
            IkSolverError::MeshLoadError { ref path, ref reason } =>
                write!(f, "Failed to load collision mesh '{}': {}", path, reason),
            IkSolverError::ModelConfigurationError(ref msg) =>
                write!(f, "Kinematic model configuration error: {}", msg),
        }
    }
}

impl std::error::Error for IkSolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IkSolverError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for IkSolverError {
    fn from(err: io::Error) -> Self {
        IkSolverError::IoError(err)
    }
}
