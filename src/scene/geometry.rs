use glam::Vec3;

/// Shared mesh data referenced by shape nodes.
///
/// Geometry is a component, not a node: several shapes may reference the
/// same geometry through one [`GeometryKey`](crate::scene::GeometryKey),
/// and the persistence layer preserves that sharing (one stored copy, one
/// identity, however many referencing shapes).
///
/// All arrays may be empty; an empty geometry is valid and round-trips as
/// empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle index list, three entries per face.
    pub indices: Vec<u32>,
}

impl Geometry {
    #[must_use]
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals,
            indices,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
