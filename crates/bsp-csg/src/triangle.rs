//! Triangle representation with a cached orientation plane.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::{Plane3D, Vertex};

/// A triangle in 3D space, defined by three vertices.
///
/// The orientation plane is built from the positions in `a, b, c` order and
/// cached. It always matches the vertices except while a caller is editing
/// them through [`Triangle::set_vertex`], which must be followed by
/// [`Triangle::rebuild_plane`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[Vertex; 3]", into = "[Vertex; 3]"))]
pub struct Triangle {
    vertices: [Vertex; 3],
    plane: Plane3D,
}

impl Triangle {
    /// Creates a new triangle from three vertices.
    ///
    /// The winding order determines the normal direction:
    /// normal = (c - a) × (b - a), i.e. clockwise faces point at the viewer.
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        let plane = Plane3D::from_three_points(a.position, b.position, c.position);
        Self {
            vertices: [a, b, c],
            plane,
        }
    }

    /// Creates a triangle from bare positions; other attributes are defaulted.
    pub fn from_positions(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self::new(a.into(), b.into(), c.into())
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    #[inline]
    pub fn a(&self) -> &Vertex {
        &self.vertices[0]
    }

    #[inline]
    pub fn b(&self) -> &Vertex {
        &self.vertices[1]
    }

    #[inline]
    pub fn c(&self) -> &Vertex {
        &self.vertices[2]
    }

    /// Returns the vertex at `index`.
    ///
    /// # Panics
    /// Panics if `index > 2`.
    #[inline]
    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    /// Replaces the vertex at `index` without touching the cached plane.
    ///
    /// Call [`Triangle::rebuild_plane`] once the edit is complete.
    ///
    /// # Panics
    /// Panics if `index > 2`.
    #[inline]
    pub fn set_vertex(&mut self, index: usize, vertex: Vertex) {
        self.vertices[index] = vertex;
    }

    /// Recomputes the cached plane from the current vertex positions.
    pub fn rebuild_plane(&mut self) {
        let [a, b, c] = &self.vertices;
        self.plane = Plane3D::from_three_points(a.position, b.position, c.position);
    }

    /// Returns a triangle whose vertices are `f` applied to each of ours, with
    /// the plane rebuilt.
    pub fn map_vertices<F>(&self, f: F) -> Self
    where
        F: FnMut(&Vertex) -> Vertex,
    {
        let [a, b, c] = self.vertices.each_ref().map(f);
        Self::new(a, b, c)
    }

    /// Returns the plane that this triangle lies on.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the unit normal of the orientation plane (zero if degenerate).
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.plane.normal()
    }

    /// Returns `true` if the vertices are collinear and no plane can be built.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.plane.is_degenerate()
    }

    /// Returns the positions of the three vertices.
    pub fn positions(&self) -> [Point3<f32>; 3] {
        self.vertices.map(|v| v.position)
    }

    pub fn area(&self) -> f32 {
        let [a, b, c] = self.positions();
        (b - a).cross(&(c - a)).norm() * 0.5
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = self.positions();
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Turns the triangle around: flips the plane, flips every vertex normal
    /// and swaps `a` with `c` to reverse the winding.
    pub fn invert(&mut self) {
        self.plane.flip();
        for vertex in &mut self.vertices {
            vertex.flip();
        }
        self.vertices.swap(0, 2);
    }

    /// Returns an inverted copy of this triangle.
    pub fn inverted(&self) -> Self {
        let mut t = self.clone();
        t.invert();
        t
    }

    /// Returns this triangle with every vertex transformed and the plane rebuilt.
    pub fn transformed(&self, transform: &Matrix4<f32>) -> Self {
        self.map_vertices(|v| v.transformed(transform))
    }
}

impl From<[Vertex; 3]> for Triangle {
    fn from([a, b, c]: [Vertex; 3]) -> Self {
        Self::new(a, b, c)
    }
}

impl From<Triangle> for [Vertex; 3] {
    fn from(triangle: Triangle) -> Self {
        triangle.vertices
    }
}

impl From<Triangle> for Plane3D {
    fn from(triangle: Triangle) -> Self {
        triangle.plane
    }
}

impl From<&Triangle> for Plane3D {
    fn from(triangle: &Triangle) -> Self {
        triangle.plane
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::from_positions(a.into(), b.into(), c.into())
    }

    #[test]
    fn plane_follows_clockwise_winding() {
        // Clockwise seen from +Y.
        let tri = make_triangle([0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0]);
        assert_relative_eq!(tri.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(tri.plane().offset(), 1.0);
    }

    #[test]
    fn invert_flips_plane_normals_and_winding() {
        let mut tri = Triangle::new(
            Vertex::new(Point3::new(0.0, 0.0, 0.0)).with_normal(Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0)).with_normal(Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)).with_normal(Vector3::z()),
        );
        let original = tri.clone();
        tri.invert();

        assert_eq!(tri.a().position, original.c().position);
        assert_eq!(tri.c().position, original.a().position);
        assert_eq!(tri.b().position, original.b().position);
        assert!(tri.vertices().iter().all(|v| v.normal == -Vector3::z()));
        assert_relative_eq!(tri.normal(), -original.normal());

        // The cached plane agrees with one rebuilt from the new winding.
        let mut rebuilt = tri.clone();
        rebuilt.rebuild_plane();
        assert_relative_eq!(rebuilt.normal(), tri.normal());
        assert_relative_eq!(rebuilt.plane().offset(), tri.plane().offset());

        assert_eq!(tri.inverted(), original);
    }

    #[test]
    fn set_vertex_needs_rebuild() {
        let mut tri = make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let before = *tri.plane();
        tri.set_vertex(2, Vertex::new(Point3::new(0.0, 0.0, 1.0)));
        assert_eq!(*tri.plane(), before);
        tri.rebuild_plane();
        assert_relative_eq!(tri.normal(), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn vertex_index_out_of_range_panics() {
        let tri = make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let _ = tri.vertex(3);
    }

    #[test]
    fn degenerate_detection() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(tri.is_degenerate());
        assert_eq!(tri.area(), 0.0);
    }

    #[test]
    fn area_and_centroid() {
        let tri = make_triangle([0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [2.0, 0.0, 0.0]);
        assert_relative_eq!(tri.area(), 2.0);
        assert_relative_eq!(tri.centroid(), Point3::new(2.0 / 3.0, 2.0 / 3.0, 0.0));
    }

    #[test]
    fn transformed_rebuilds_plane() {
        let tri = make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let moved = tri.transformed(&Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0)));
        assert_relative_eq!(moved.plane().offset(), 2.0);
        assert_relative_eq!(moved.normal(), tri.normal());
    }

    #[test]
    fn vertex_array_round_trip() {
        let tri = make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let vertices: [Vertex; 3] = tri.clone().into();
        assert_eq!(Triangle::from(vertices), tri);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_vertices_and_rebuilds_plane() {
        use nalgebra::Vector2;

        let tri = Triangle::new(
            Vertex::new(Point3::new(0.0, 2.0, 0.0)).with_uv1(Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 2.0, 0.0)).with_uv1(Vector2::new(1.0, 0.0)),
            Vertex::new(Point3::new(0.0, 2.0, 1.0)).with_uv1(Vector2::new(0.0, 1.0)),
        );

        let value = serde_json::to_value(&tri).unwrap();
        let corners = value.as_array().unwrap();
        assert_eq!(corners.len(), 3);
        assert!(corners.iter().all(|corner| corner.get("position").is_some()));
        assert!(!value.to_string().contains("plane"));

        let back: Triangle = serde_json::from_value(value).unwrap();
        assert_eq!(back, tri);
        assert_relative_eq!(back.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(back.plane().offset(), 2.0);
    }
}
