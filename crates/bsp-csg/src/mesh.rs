//! Conversion between indexed mesh buffers and triangle lists.
//!
//! This is the validation boundary of the crate: geometry coming in through
//! [`MeshBuffers::to_triangles`] is checked here, so the tree and the
//! operations can assume well-formed triangles.

use std::collections::hash_map::{Entry, HashMap};

use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};
use tracing::{debug, warn};

use crate::bsp::BspTree;
use crate::{CsgError, Result, Triangle, Vertex};

/// Host-style mesh data: parallel per-vertex attribute buffers plus one index
/// buffer per sub-mesh.
///
/// Every attribute buffer other than `positions` may be left empty, in which
/// case [`Vertex::new`] defaults are used; a non-empty buffer must be exactly
/// as long as `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshBuffers {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub tangents: Vec<Vector4<f32>>,
    pub uv1: Vec<Vector2<f32>>,
    pub uv2: Vec<Vector2<f32>>,
    pub colors: Vec<Vector4<f32>>,
    /// Triangle lists, three indices per triangle.
    pub submeshes: Vec<Vec<u32>>,
}

/// What to do with triangles whose corners are collinear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Drop them and log a warning.
    #[default]
    Skip,
    /// Fail the import with [`CsgError::DegenerateTriangle`].
    Reject,
}

/// Settings for [`MeshBuffers::to_triangles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
    /// Applied to positions (as points) and to normals and tangents (as vectors).
    pub transform: Matrix4<f32>,
    pub degenerate: DegeneratePolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            transform: Matrix4::identity(),
            degenerate: DegeneratePolicy::default(),
        }
    }
}

impl ImportOptions {
    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }
}

/// How [`MeshBuffers::from_triangles`] lays out vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexLayout {
    /// Three fresh vertices per triangle (flat, nothing shared).
    #[default]
    Unshared,
    /// Bitwise identical vertices are stored once and shared by index.
    Shared,
}

impl MeshBuffers {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of indexed triangles over all sub-meshes.
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Builds one triangle per index triple, sub-mesh by sub-mesh.
    pub fn to_triangles(&self, options: &ImportOptions) -> Result<Vec<Triangle>> {
        self.validate_vertices()?;

        let vertex_count = self.vertex_count();
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let mut skipped = 0usize;

        for (submesh, indices) in self.submeshes.iter().enumerate() {
            if indices.len() % 3 != 0 {
                return Err(CsgError::IndexCount {
                    submesh,
                    len: indices.len(),
                });
            }

            for (triangle, corner) in indices.chunks_exact(3).enumerate() {
                let mut vertices = [Vertex::default(); 3];
                for (slot, &index) in vertices.iter_mut().zip(corner) {
                    if index as usize >= vertex_count {
                        return Err(CsgError::IndexOutOfBounds {
                            submesh,
                            index,
                            vertex_count,
                        });
                    }
                    *slot = self.vertex(index as usize).transformed(&options.transform);
                }

                let tri = Triangle::from(vertices);
                if tri.is_degenerate() {
                    match options.degenerate {
                        DegeneratePolicy::Reject => {
                            return Err(CsgError::DegenerateTriangle { submesh, triangle });
                        }
                        DegeneratePolicy::Skip => {
                            skipped += 1;
                            continue;
                        }
                    }
                }
                triangles.push(tri);
            }
        }

        if skipped > 0 {
            warn!(skipped, "dropped degenerate triangles during import");
        }
        debug!(
            submeshes = self.submeshes.len(),
            triangles = triangles.len(),
            "imported mesh"
        );
        Ok(triangles)
    }

    /// Packs triangles into a single sub-mesh.
    ///
    /// Fails with [`CsgError::TooManyVertices`] if the layout needs more
    /// vertices than a `u32` index can address.
    pub fn from_triangles(triangles: &[Triangle], layout: VertexLayout) -> Result<Self> {
        let mut mesh = Self::default();
        let mut indices = Vec::with_capacity(triangles.len() * 3);

        match layout {
            VertexLayout::Unshared => {
                for vertex in triangles.iter().flat_map(|t| t.vertices()) {
                    indices.push(mesh.push_vertex(vertex)?);
                }
            }
            VertexLayout::Shared => {
                let mut seen: HashMap<[u32; 18], u32> = HashMap::new();
                for vertex in triangles.iter().flat_map(|t| t.vertices()) {
                    let index = match seen.entry(vertex_key(vertex)) {
                        Entry::Occupied(entry) => *entry.get(),
                        Entry::Vacant(entry) => *entry.insert(mesh.push_vertex(vertex)?),
                    };
                    indices.push(index);
                }
            }
        }

        mesh.submeshes.push(indices);
        debug!(
            ?layout,
            vertices = mesh.vertex_count(),
            triangles = triangles.len(),
            "exported mesh"
        );
        Ok(mesh)
    }

    /// Assembles the vertex at `index` from whichever buffers are populated.
    fn vertex(&self, index: usize) -> Vertex {
        let mut vertex = Vertex::new(self.positions[index]);
        if let Some(&normal) = self.normals.get(index) {
            vertex.normal = normal;
        }
        if let Some(&tangent) = self.tangents.get(index) {
            vertex.tangent = tangent;
        }
        if let Some(&uv) = self.uv1.get(index) {
            vertex.uv1 = uv;
        }
        if let Some(&uv) = self.uv2.get(index) {
            vertex.uv2 = uv;
        }
        if let Some(&color) = self.colors.get(index) {
            vertex.color = color;
        }
        vertex
    }

    fn push_vertex(&mut self, vertex: &Vertex) -> Result<u32> {
        let index = next_index(self.positions.len())?;
        self.positions.push(vertex.position);
        self.normals.push(vertex.normal);
        self.tangents.push(vertex.tangent);
        self.uv1.push(vertex.uv1);
        self.uv2.push(vertex.uv2);
        self.colors.push(vertex.color);
        Ok(index)
    }

    fn validate_vertices(&self) -> Result<()> {
        let expected = self.positions.len();
        let attributes = [
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("uv1", self.uv1.len()),
            ("uv2", self.uv2.len()),
            ("colors", self.colors.len()),
        ];
        for (attribute, len) in attributes {
            if len != 0 && len != expected {
                return Err(CsgError::AttributeLength {
                    attribute,
                    len,
                    expected,
                });
            }
        }

        if let Some(index) = self
            .positions
            .iter()
            .position(|p| !p.iter().all(|c| c.is_finite()))
        {
            return Err(CsgError::NonFinitePosition { index });
        }
        Ok(())
    }
}

/// Bit pattern of every attribute, for exact de-duplication.
/// Index of the vertex appended after `count` existing ones.
fn next_index(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| CsgError::TooManyVertices { count: count + 1 })
}

fn vertex_key(vertex: &Vertex) -> [u32; 18] {
    let mut key = [0u32; 18];
    let components = vertex
        .position
        .iter()
        .chain(vertex.normal.iter())
        .chain(vertex.tangent.iter())
        .chain(vertex.uv1.iter())
        .chain(vertex.uv2.iter())
        .chain(vertex.color.iter());
    for (slot, c) in key.iter_mut().zip(components) {
        *slot = c.to_bits();
    }
    key
}

/// Imports `mesh` and builds a tree from its triangles.
pub fn tree_from_mesh(mesh: &MeshBuffers, options: &ImportOptions) -> Result<BspTree> {
    Ok(BspTree::from_triangles(mesh.to_triangles(options)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cuboid, signed_volume};
    use approx::assert_relative_eq;

    /// Unit square on z = 0 as two triangles sharing the diagonal, clockwise
    /// seen from +Z.
    fn quad_mesh() -> MeshBuffers {
        MeshBuffers {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ],
            normals: vec![Vector3::z(); 4],
            uv1: vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(0.0, 1.0),
                Vector2::new(1.0, 1.0),
                Vector2::new(1.0, 0.0),
            ],
            submeshes: vec![vec![0, 1, 2, 0, 2, 3]],
            ..Default::default()
        }
    }

    #[test]
    fn imports_attributes_and_defaults() {
        let triangles = quad_mesh().to_triangles(&ImportOptions::default()).unwrap();
        assert_eq!(triangles.len(), 2);

        let first = &triangles[0];
        assert_relative_eq!(first.normal(), Vector3::z());
        assert_eq!(first.c().uv1, Vector2::new(1.0, 1.0));
        assert_eq!(first.a().normal, Vector3::z());
        // Missing buffers fall back to vertex defaults.
        assert_eq!(first.a().color, Vector4::repeat(1.0));
        assert_eq!(first.a().tangent, Vector4::zeros());
    }

    #[test]
    fn import_applies_transform() {
        let transform = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 3.0))
            * Matrix4::new_rotation(Vector3::new(std::f32::consts::PI, 0.0, 0.0));
        let options = ImportOptions::default().with_transform(transform);

        let triangles = quad_mesh().to_triangles(&options).unwrap();

        for tri in &triangles {
            // Rotating half a turn about X turns the square upside down.
            assert_relative_eq!(tri.normal(), -Vector3::z(), epsilon = 1e-5);
            assert_relative_eq!(tri.plane().offset(), -3.0, epsilon = 1e-5);
            for v in tri.vertices() {
                assert_relative_eq!(v.position.z, 3.0, epsilon = 1e-5);
                assert_relative_eq!(v.normal, -Vector3::z(), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn rejects_partial_triangle() {
        let mut mesh = quad_mesh();
        mesh.submeshes.push(vec![0, 1]);
        assert_eq!(
            mesh.to_triangles(&ImportOptions::default()),
            Err(CsgError::IndexCount { submesh: 1, len: 2 })
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut mesh = quad_mesh();
        mesh.submeshes[0][4] = 9;
        assert_eq!(
            mesh.to_triangles(&ImportOptions::default()),
            Err(CsgError::IndexOutOfBounds {
                submesh: 0,
                index: 9,
                vertex_count: 4
            })
        );
    }

    #[test]
    fn rejects_short_attribute_buffer() {
        let mut mesh = quad_mesh();
        mesh.normals.pop();
        assert_eq!(
            mesh.to_triangles(&ImportOptions::default()),
            Err(CsgError::AttributeLength {
                attribute: "normals",
                len: 3,
                expected: 4
            })
        );
    }

    #[test]
    fn rejects_non_finite_position() {
        let mut mesh = quad_mesh();
        mesh.positions[2].y = f32::NAN;
        assert_eq!(
            mesh.to_triangles(&ImportOptions::default()),
            Err(CsgError::NonFinitePosition { index: 2 })
        );
    }

    #[test]
    fn degenerate_policy() {
        let mut mesh = quad_mesh();
        // Collinear along the x axis.
        mesh.positions.push(Point3::new(2.0, 0.0, 0.0));
        mesh.normals.push(Vector3::z());
        mesh.uv1.push(Vector2::zeros());
        mesh.submeshes[0].extend([0, 3, 4]);

        let skipped = mesh.to_triangles(&ImportOptions::default()).unwrap();
        assert_eq!(skipped.len(), 2);

        let strict = ImportOptions::default().with_degenerate(DegeneratePolicy::Reject);
        assert_eq!(
            mesh.to_triangles(&strict),
            Err(CsgError::DegenerateTriangle {
                submesh: 0,
                triangle: 2
            })
        );
    }

    #[test]
    fn unshared_export_duplicates_corners() {
        let triangles = quad_mesh().to_triangles(&ImportOptions::default()).unwrap();
        let mesh = MeshBuffers::from_triangles(&triangles, VertexLayout::Unshared).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.submeshes, vec![vec![0, 1, 2, 3, 4, 5]]);
        assert_eq!(mesh.colors.len(), 6);
    }

    #[test]
    fn shared_export_merges_identical_corners() {
        let original = quad_mesh();
        let triangles = original.to_triangles(&ImportOptions::default()).unwrap();
        let mesh = MeshBuffers::from_triangles(&triangles, VertexLayout::Shared).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.submeshes, original.submeshes);
        assert_eq!(mesh.positions, original.positions);

        // Importing the export gives back the same triangles.
        assert_eq!(mesh.to_triangles(&ImportOptions::default()).unwrap(), triangles);
    }

    #[test]
    fn cube_survives_mesh_round_trip() {
        let cube = cuboid(Point3::origin(), Vector3::repeat(1.0));
        let mesh = MeshBuffers::from_triangles(&cube, VertexLayout::Shared).unwrap();
        // Corners are shared within a face but not across faces (normals differ).
        assert_eq!(mesh.vertex_count(), 24);

        let tree = tree_from_mesh(&mesh, &ImportOptions::default()).unwrap();
        assert_eq!(tree.triangle_count(), 12);
        assert_relative_eq!(signed_volume(&tree.triangles()), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn vertex_indices_stop_at_u32_max() {
        assert_eq!(next_index(0), Ok(0));
        assert_eq!(next_index(u32::MAX as usize), Ok(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn vertex_index_overflow_is_an_error() {
        let count = u32::MAX as usize + 1;
        assert_eq!(
            next_index(count),
            Err(CsgError::TooManyVertices { count: count + 1 })
        );
    }
}
