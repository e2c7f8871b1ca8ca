//! Triangle classification and splitting against a plane.

use nalgebra::Point3;
use tracing::trace;

use crate::polygon::fan_triangulate;
use crate::{CsgError, Plane3D, PlaneSide, Polygon, Result, Triangle, Vertex, PLANE_EPSILON};

/// Where a triangle lies relative to a splitting plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// All vertices are behind the plane (or on it)
    Behind,
    /// All vertices are in front of the plane (or on it)
    InFront,
    /// All vertices are on the plane and the triangle faces along the plane normal
    CoplanarFront,
    /// All vertices are on the plane and the triangle faces against the plane normal
    CoplanarBack,
    /// Vertices are on both sides of the plane
    Spanning,
}

/// Destination of one piece produced by [`Partitioner::split_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Behind,
    InFront,
    CoplanarFront,
    CoplanarBack,
}

/// The four output lists of a split.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub behind: Vec<Triangle>,
    pub in_front: Vec<Triangle>,
    pub coplanar_front: Vec<Triangle>,
    pub coplanar_back: Vec<Triangle>,
}

impl Partition {
    /// Appends `triangle` to the list named by `bucket`.
    pub fn push(&mut self, bucket: Bucket, triangle: Triangle) {
        match bucket {
            Bucket::Behind => self.behind.push(triangle),
            Bucket::InFront => self.in_front.push(triangle),
            Bucket::CoplanarFront => self.coplanar_front.push(triangle),
            Bucket::CoplanarBack => self.coplanar_back.push(triangle),
        }
    }

    /// Total number of triangles over all four lists.
    pub fn len(&self) -> usize {
        self.behind.len() + self.in_front.len() + self.coplanar_front.len() + self.coplanar_back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over both coplanar lists, front-facing first.
    pub fn coplanar(&self) -> impl Iterator<Item = &Triangle> {
        self.coplanar_front.iter().chain(self.coplanar_back.iter())
    }
}

/// Returns `true` if the triangle's orientation plane points the same way as
/// `plane` (positive dot product of the normals).
#[inline]
pub fn faces_same_direction(triangle: &Triangle, plane: &Plane3D) -> bool {
    triangle.normal().dot(&plane.normal()) > 0.0
}

/// Classifies and splits triangles against planes.
///
/// The partitioner is a plain value holding the classification tolerance:
/// vertices with `|N·P - D| <= epsilon` count as lying on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partitioner {
    epsilon: f32,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self {
            epsilon: PLANE_EPSILON,
        }
    }
}

impl Partitioner {
    /// Creates a partitioner with a custom classification tolerance.
    ///
    /// Returns [`CsgError::InvalidEpsilon`] if `epsilon` is negative or not finite.
    pub fn with_epsilon(epsilon: f32) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(CsgError::InvalidEpsilon(epsilon));
        }
        Ok(Self { epsilon })
    }

    #[inline]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Classifies a single point against `plane`.
    #[inline]
    pub fn classify_vertex(&self, position: Point3<f32>, plane: &Plane3D) -> PlaneSide {
        plane.classify_point_with_epsilon(position, self.epsilon)
    }

    /// Classifies `triangle` against `plane` without splitting it.
    ///
    /// Degenerate triangles report [`Orientation::CoplanarBack`]; they are
    /// treated as lying on the plane and are never emitted by a split.
    pub fn classify(&self, triangle: &Triangle, plane: &Plane3D) -> Orientation {
        if triangle.is_degenerate() {
            return Orientation::CoplanarBack;
        }
        let sides = self.vertex_sides(triangle.vertices(), plane);
        self.orientation_from_sides(triangle, plane, &sides)
    }

    /// Splits `triangle` against `plane` and collects the pieces.
    pub fn split(&self, triangle: Triangle, plane: &Plane3D) -> Partition {
        let mut partition = Partition::default();
        self.split_with(triangle, plane, |bucket, piece| partition.push(bucket, piece));
        partition
    }

    /// Splits `triangle` against `plane`, handing every resulting piece to
    /// `emit` together with its destination bucket.
    ///
    /// Whole triangles are passed through untouched; spanning triangles are
    /// cut along the plane and the pieces re-triangulated, so every piece lies
    /// entirely on one side. Degenerate input emits nothing.
    pub fn split_with<F>(&self, triangle: Triangle, plane: &Plane3D, mut emit: F) -> Orientation
    where
        F: FnMut(Bucket, Triangle),
    {
        if triangle.is_degenerate() {
            trace!("skipping degenerate triangle");
            return Orientation::CoplanarBack;
        }

        let sides = self.vertex_sides(triangle.vertices(), plane);
        let orientation = self.orientation_from_sides(&triangle, plane, &sides);
        match orientation {
            Orientation::Behind => emit(Bucket::Behind, triangle),
            Orientation::InFront => emit(Bucket::InFront, triangle),
            Orientation::CoplanarFront => emit(Bucket::CoplanarFront, triangle),
            Orientation::CoplanarBack => emit(Bucket::CoplanarBack, triangle),
            Orientation::Spanning => {
                let (behind, in_front) = split_loop(triangle.vertices(), &sides, plane);

                let mut pieces = Vec::with_capacity(2);
                fan_triangulate(&behind, &mut pieces);
                for piece in pieces.drain(..) {
                    emit(Bucket::Behind, piece);
                }
                fan_triangulate(&in_front, &mut pieces);
                for piece in pieces {
                    emit(Bucket::InFront, piece);
                }
            }
        }
        orientation
    }

    /// Splits a convex polygon into its behind and in-front parts.
    ///
    /// A polygon entirely on one side (or on the plane) comes back whole on
    /// the matching side; coplanar polygons go to the side their facing
    /// points at.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
        plane: &Plane3D,
    ) -> (Option<Polygon>, Option<Polygon>) {
        let sides = self.vertex_sides(polygon.vertices(), plane);
        let combined = sides.iter().fold(0, |acc, side| acc | side.bits());

        match combined {
            0 => {
                if polygon.plane().normal().dot(&plane.normal()) > 0.0 {
                    (None, Some(polygon.clone()))
                } else {
                    (Some(polygon.clone()), None)
                }
            }
            1 => (Some(polygon.clone()), None),
            2 => (None, Some(polygon.clone())),
            _ => {
                let (behind, in_front) = split_loop(polygon.vertices(), &sides, plane);
                let wrap = |vertices: Vec<Vertex>| (vertices.len() >= 3).then(|| Polygon::new(vertices));
                (wrap(behind), wrap(in_front))
            }
        }
    }

    fn vertex_sides(&self, vertices: &[Vertex], plane: &Plane3D) -> Vec<PlaneSide> {
        vertices
            .iter()
            .map(|v| self.classify_vertex(v.position, plane))
            .collect()
    }

    fn orientation_from_sides(
        &self,
        triangle: &Triangle,
        plane: &Plane3D,
        sides: &[PlaneSide],
    ) -> Orientation {
        let combined = sides.iter().fold(0, |acc, side| acc | side.bits());
        match combined {
            0 if faces_same_direction(triangle, plane) => Orientation::CoplanarFront,
            0 => Orientation::CoplanarBack,
            1 => Orientation::Behind,
            2 => Orientation::InFront,
            _ => Orientation::Spanning,
        }
    }
}

/// Walks the edges of a vertex loop in winding order and builds the behind
/// and in-front vertex loops (a Sutherland-Hodgman pass against one plane).
///
/// On-plane vertices go into both loops. Where an edge goes from one side to
/// the other, an interpolated vertex is inserted into both. An edge nearly
/// parallel to the plane gets no split vertex.
fn split_loop(
    vertices: &[Vertex],
    sides: &[PlaneSide],
    plane: &Plane3D,
) -> (Vec<Vertex>, Vec<Vertex>) {
    let n = vertices.len();
    let mut behind = Vec::with_capacity(n + 1);
    let mut in_front = Vec::with_capacity(n + 1);

    for i in 0..n {
        let next_idx = (i + 1) % n;
        let current = &vertices[i];
        let next = &vertices[next_idx];
        let current_side = sides[i];
        let next_side = sides[next_idx];

        match current_side {
            PlaneSide::Behind => behind.push(*current),
            PlaneSide::InFront => in_front.push(*current),
            PlaneSide::OnPlane => {
                behind.push(*current);
                in_front.push(*current);
            }
        }

        let crosses = matches!(
            (current_side, next_side),
            (PlaneSide::InFront, PlaneSide::Behind) | (PlaneSide::Behind, PlaneSide::InFront)
        );
        if crosses && let Some(t) = plane.intersect_parameter(current.position, next.position) {
            let split = current.lerp(next, t);
            behind.push(split);
            in_front.push(split);
        }
    }

    (behind, in_front)
}
