//! Supports reading the solver configuration from YAML file (optional)

use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};
use crate::config::SolverConfig;
use crate::solver_error::IkSolverError;

/// Key of the obstacle frame. `collision_mesh_key` is accepted for older configurations.
const FRAME_KEY: &str = "collision_mesh_frame";
const LEGACY_FRAME_KEY: &str = "collision_mesh_key";

impl SolverConfig {
    /// Read the solver configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// planning_group: manipulator
    /// distance_threshold: 0.02
    /// discretization_angle: 0.5236
    /// collision_mesh_filename: part.stl
    /// collision_mesh_frame: base_link
    /// touch_links: [tool0]
    /// parallel_discretization: true
    /// ```
    /// Only `planning_group` and `distance_threshold` are required. A relative mesh path
    /// is resolved against the directory of the YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, IkSolverError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&contents)?;

        if let (Some(mesh), Some(dir)) = (&config.collision_mesh_filename, path.parent()) {
            if Path::new(mesh).is_relative() {
                config.collision_mesh_filename = Some(dir.join(mesh).to_string_lossy().to_string());
            }
        }
        Ok(config)
    }

    /// Parse the configuration from the YAML text, see [`Self::from_yaml_file`].
    pub fn from_yaml_str(contents: &str) -> Result<Self, IkSolverError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| IkSolverError::ParseError(e.to_string()))?;
        let doc = docs.first()
            .ok_or_else(|| IkSolverError::ParseError("empty YAML document".to_string()))?;
        if doc.as_hash().is_none() {
            return Err(IkSolverError::ParseError("configuration must be a mapping".to_string()));
        }

        let collision_mesh_frame = match optional_string(doc, FRAME_KEY)? {
            Some(frame) => Some(frame),
            None => optional_string(doc, LEGACY_FRAME_KEY)?,
        };

        Ok(SolverConfig {
            planning_group: required(doc, "planning_group", as_string)?,
            distance_threshold: required(doc, "distance_threshold", as_number)?,
            discretization_angle: optional(doc, "discretization_angle", as_number)?,
            collision_mesh_filename: optional_string(doc, "collision_mesh_filename")?,
            collision_mesh_frame,
            touch_links: optional(doc, "touch_links", as_string_list)?.unwrap_or_default(),
            parallel_discretization: optional(doc, "parallel_discretization", as_bool)?.unwrap_or(false),
        })
    }
}

type Reader<T> = fn(&Yaml, &str) -> Result<T, IkSolverError>;

fn required<T>(doc: &Yaml, key: &str, read: Reader<T>) -> Result<T, IkSolverError> {
    optional(doc, key, read)?.ok_or_else(|| IkSolverError::MissingField(key.to_string()))
}

fn optional<T>(doc: &Yaml, key: &str, read: Reader<T>) -> Result<Option<T>, IkSolverError> {
    match &doc[key] {
        Yaml::BadValue | Yaml::Null => Ok(None),
        value => read(value, key).map(Some),
    }
}

fn optional_string(doc: &Yaml, key: &str) -> Result<Option<String>, IkSolverError> {
    optional(doc, key, as_string)
}

fn wrong_type(field: &str, expected: &'static str) -> IkSolverError {
    IkSolverError::WrongType { field: field.to_string(), expected }
}

fn as_string(value: &Yaml, key: &str) -> Result<String, IkSolverError> {
    value.as_str().map(str::to_string).ok_or_else(|| wrong_type(key, "a string"))
}

// Integers are also accepted where a real number is expected
fn as_number(value: &Yaml, key: &str) -> Result<f64, IkSolverError> {
    match value {
        Yaml::Real(_) => value.as_f64().ok_or_else(|| wrong_type(key, "a number")),
        Yaml::Integer(i) => Ok(*i as f64),
        _ => Err(wrong_type(key, "a number")),
    }
}

fn as_bool(value: &Yaml, key: &str) -> Result<bool, IkSolverError> {
    value.as_bool().ok_or_else(|| wrong_type(key, "a boolean"))
}

fn as_string_list(value: &Yaml, key: &str) -> Result<Vec<String>, IkSolverError> {
    value.as_vec()
        .ok_or_else(|| wrong_type(key, "a list of strings"))?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(|| wrong_type(key, "a list of strings")))
        .collect()
}
