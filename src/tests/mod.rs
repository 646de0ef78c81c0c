mod test_solver;
mod test_factory;

#[cfg(feature = "allow_filesystem")]
mod test_from_yaml;
#[cfg(feature = "allow_filesystem")]
mod test_mesh;
