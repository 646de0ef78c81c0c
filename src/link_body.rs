use nalgebra::{Isometry3, Point3, Vector3};
use parry3d::bounding_volume::{Aabb, BoundingVolume};
use parry3d::shape::{SharedShape, TriMesh};
use crate::solver_error::IkSolverError;

/// Struct representing a shape attached to the link, placed by the local transform
pub struct CollisionShape {
    pub name: String,
    pub local_transform: Isometry3<f32>,
    pub shape: SharedShape,
}

/// Struct representing a robot link, which contains zero or more collision shapes
/// and the bounding box around all of them (in the link frame). Links without shapes
/// take no part in collision checks.
pub struct RobotLink {
    pub name: String,
    pub shapes: Vec<CollisionShape>,
    /// Box around all shapes, used to skip pairs that are clearly apart
    pub local_aabb: Option<Aabb>,
}

impl RobotLink {
    /// Constructor to initialize a link with a given list of collision shapes.
    /// The constructor also computes an AABB around all the shapes.
    ///
    /// # Arguments
    /// * `name` - Name of the link, as referenced by touch links and frames.
    /// * `shapes` - A vector of `CollisionShape`s that belong to the link.
    ///
    /// # Returns
    /// A new instance of `RobotLink`.
    pub fn new(name: &str, shapes: Vec<CollisionShape>) -> Self {
        let local_aabb = if shapes.is_empty() {
            None
        } else {
            Some(Self::compute_aabb(&shapes))
        };
        RobotLink {
            name: name.to_string(),
            shapes,
            local_aabb,
        }
    }

    /// Link that only serves as a frame and has no geometry.
    pub fn frame(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    /// Link with the single box shape, centered at `center` in the link frame.
    pub fn with_box(name: &str, center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(name, vec![CollisionShape {
            name: format!("{}_box", name),
            local_transform: Isometry3::translation(center.x, center.y, center.z),
            shape: SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
        }])
    }

    pub fn has_geometry(&self) -> bool {
        !self.shapes.is_empty()
    }

    /// Compute the AABB (Axis-Aligned Bounding Box) that surrounds all the shapes in the link.
    ///
    /// # Arguments
    /// * `shapes` - A reference to the vector of shapes to compute the bounding box from.
    ///
    /// # Returns
    /// An `Aabb` that fits all the shapes in the link.
    fn compute_aabb(shapes: &[CollisionShape]) -> Aabb {
        let mut overall_aabb = Aabb::new_invalid();

        // Loop over each shape and expand the AABB to include its local bounding box
        for shape in shapes {
            let local_aabb = shape.shape.compute_aabb(&shape.local_transform);
            overall_aabb.merge(&local_aabb);
        }

        overall_aabb
    }
}

/// Convert an AABB into a TriMesh (a triangular mesh). Used to build simple box
/// obstacles without reading any file.
///
/// # Arguments
/// * `aabb` - The AABB to convert into a mesh.
///
/// # Returns
/// A `TriMesh` representing the AABB.
pub fn aabb_to_trimesh(aabb: &Aabb) -> Result<TriMesh, IkSolverError> {
    let mins = &aabb.mins;
    let maxs = &aabb.maxs;

    // Define the 8 vertices of the box (corners)
    let vertices = vec![
        // Bottom face
        Point3::new(mins.x, mins.y, mins.z), // 0: Bottom-left-back
        Point3::new(maxs.x, mins.y, mins.z), // 1: Bottom-right-back
        Point3::new(mins.x, maxs.y, mins.z), // 2: Top-left-back
        Point3::new(maxs.x, maxs.y, mins.z), // 3: Top-right-back
        // Top face
        Point3::new(mins.x, mins.y, maxs.z), // 4: Bottom-left-front
        Point3::new(maxs.x, mins.y, maxs.z), // 5: Bottom-right-front
        Point3::new(mins.x, maxs.y, maxs.z), // 6: Top-left-front
        Point3::new(maxs.x, maxs.y, maxs.z), // 7: Top-right-front
    ];

    // Define the 12 triangles (6 faces, 2 triangles per face)
    let indices = vec![
        // Back face
        [0, 1, 2], [1, 3, 2],
        // Front face
        [4, 5, 6], [5, 7, 6],
        // Left face
        [0, 2, 4], [2, 6, 4],
        // Right face
        [1, 5, 3], [5, 7, 3],
        // Top face
        [2, 3, 6], [3, 7, 6],
        // Bottom face
        [0, 1, 4], [1, 5, 4],
    ];

    TriMesh::new(vertices, indices)
        .map_err(|e| IkSolverError::ModelConfigurationError(format!("invalid box mesh: {:?}", e)))
}

/// Box mesh centered at the given point.
pub fn box_mesh(center: Point3<f32>, half_extents: Vector3<f32>) -> Result<TriMesh, IkSolverError> {
    aabb_to_trimesh(&Aabb::new(center - half_extents, center + half_extents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_aabb_covers_all_shapes() {
        let link = RobotLink::new("two_boxes", vec![
            CollisionShape {
                name: "low".to_string(),
                local_transform: Isometry3::translation(0.0, 0.0, -1.0),
                shape: SharedShape::cuboid(0.5, 0.5, 0.5),
            },
            CollisionShape {
                name: "high".to_string(),
                local_transform: Isometry3::translation(0.0, 0.0, 2.0),
                shape: SharedShape::ball(0.25),
            },
        ]);

        let aabb = link.local_aabb.expect("link with shapes must have a box");
        assert!((aabb.mins.z - -1.5).abs() < 1e-6);
        assert!((aabb.maxs.z - 2.25).abs() < 1e-6);
        assert!((aabb.maxs.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_frame_has_no_geometry() {
        let link = RobotLink::frame("flange");
        assert!(!link.has_geometry());
        assert!(link.local_aabb.is_none());
    }

    #[test]
    fn test_box_mesh() {
        let mesh = box_mesh(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.5, 0.5, 0.5))
            .expect("box mesh must build");
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.indices().len(), 12);
        let aabb = mesh.local_aabb();
        assert!((aabb.mins.x - 0.5).abs() < 1e-6);
        assert!((aabb.maxs.z - 3.5).abs() < 1e-6);
    }
}
