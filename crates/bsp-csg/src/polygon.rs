//! Convex polygon representation used while splitting geometry.

use crate::{Plane3D, Triangle, Vertex};

/// A convex polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices should be coplanar and wound clockwise when viewed from the front
/// (the direction the normal points), the same convention as [`Triangle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vertex>,
}

impl Polygon {
    /// Creates a new polygon from a list of vertices.
    ///
    /// # Panics (debug builds only)
    /// Panics if fewer than 3 vertices are provided.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        debug_assert!(
            vertices.len() >= 3,
            "Polygon must have at least 3 vertices"
        );
        Self { vertices }
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the plane that this polygon lies on, built from its first
    /// three vertices.
    pub fn plane(&self) -> Plane3D {
        Plane3D::from_three_points(
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        )
    }

    /// Reverses the winding and flips every vertex normal.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for vertex in &mut self.vertices {
            vertex.flip();
        }
    }

    /// Splits the polygon into a fan of triangles anchored at vertex 0.
    pub fn triangulate(&self) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.vertices.len().saturating_sub(2));
        fan_triangulate(&self.vertices, &mut triangles);
        triangles
    }
}

/// Fan-triangulates a convex vertex loop from vertex 0 into `out`:
/// `(0, 1, 2), (0, 2, 3), ...`. Degenerate fan pieces are skipped.
pub(crate) fn fan_triangulate(vertices: &[Vertex], out: &mut Vec<Triangle>) {
    if vertices.len() < 3 {
        return;
    }
    for i in 1..vertices.len() - 1 {
        let triangle = Triangle::new(vertices[0], vertices[i], vertices[i + 1]);
        if !triangle.is_degenerate() {
            out.push(triangle);
        }
    }
}

impl From<Triangle> for Polygon {
    fn from(triangle: Triangle) -> Self {
        Self {
            vertices: triangle.vertices().to_vec(),
        }
    }
}

impl From<&Triangle> for Polygon {
    fn from(triangle: &Triangle) -> Self {
        Self {
            vertices: triangle.vertices().to_vec(),
        }
    }
}

impl From<Polygon> for Plane3D {
    fn from(polygon: Polygon) -> Self {
        polygon.plane()
    }
}

impl From<&Polygon> for Plane3D {
    fn from(polygon: &Polygon) -> Self {
        polygon.plane()
    }
}
