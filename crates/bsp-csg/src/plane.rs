//! Plane representation and point classification.

use nalgebra::{Point3, Vector3};

/// Default epsilon for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Normals shorter than this cannot be normalized and mark a degenerate plane.
pub(crate) const DEGENERATE_EPSILON: f32 = f32::EPSILON;

/// Which side of a plane a point lies on.
///
/// The discriminants are bit flags: OR-ing the sides of several points gives
/// `0` when all are on the plane, `1` or `2` when all share a side and `3`
/// when they straddle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlaneSide {
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane = 0,
    /// Point is behind the plane (negative side of normal)
    Behind = 1,
    /// Point is in front of the plane (positive side of normal)
    InFront = 2,
}

impl PlaneSide {
    /// Returns the flag value of this side.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// A plane in 3D space, represented as `normal · point = offset`.
///
/// Points with `normal · point > offset` are in front of the plane, points with
/// `normal · point < offset` are behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    ///
    /// Both are scaled so the normal has unit length. A zero normal is kept
    /// as-is and yields a degenerate plane (see [`Plane3D::is_degenerate`]).
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        if norm > DEGENERATE_EPSILON {
            Self {
                normal: normal / norm,
                offset: offset / norm,
            }
        } else {
            Self { normal, offset }
        }
    }

    /// Creates a plane from a point on the plane and a normal vector.
    /// The normal will be normalized when possible.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        let norm = normal.norm();
        let unit_normal = if norm > DEGENERATE_EPSILON {
            normal / norm
        } else {
            normal
        };
        let offset = unit_normal.dot(&point.coords);
        Self {
            normal: unit_normal,
            offset,
        }
    }

    /// Creates a plane from three points.
    ///
    /// The normal is `(c - a) × (b - a)`: a triangle wound clockwise when seen
    /// from the outside of a solid gets an outward facing normal. Collinear
    /// points give a degenerate plane.
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let ac = c - a;
        let ab = b - a;
        let normal = ac.cross(&ab);
        Self::from_point_and_normal(a, normal)
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns `true` if the normal could not be normalized.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.normal.norm() <= DEGENERATE_EPSILON
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default `PLANE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist < -epsilon {
            PlaneSide::Behind
        } else if dist > epsilon {
            PlaneSide::InFront
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Flips the plane in place: the normal and offset are negated, which
    /// swaps the front and back half-spaces without moving the plane.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.offset = -self.offset;
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Projects a point onto the plane (finds the closest point on the plane).
    #[inline]
    pub fn project_point(&self, point: Point3<f32>) -> Point3<f32> {
        point - self.normal * self.signed_distance(point)
    }

    /// Computes where the segment `start -> end` crosses the plane as an
    /// interpolation parameter (0.0 = start, 1.0 = end).
    ///
    /// Returns `None` if the segment is (nearly) parallel to the plane or the
    /// crossing lies outside the segment.
    pub fn intersect_parameter(&self, start: Point3<f32>, end: Point3<f32>) -> Option<f32> {
        let denom = self.normal.dot(&(end - start));

        // Segment is parallel to plane
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(&start.coords)) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some(t)
    }

    /// Computes the intersection of a line segment with the plane.
    ///
    /// Returns `Some((t, point))` where:
    /// - `t` is the interpolation parameter (0.0 = start, 1.0 = end)
    /// - `point` is the intersection point
    ///
    /// Returns `None` if the segment is parallel to the plane or doesn't intersect.
    pub fn intersect_segment(
        &self,
        start: Point3<f32>,
        end: Point3<f32>,
    ) -> Option<(f32, Point3<f32>)> {
        let t = self.intersect_parameter(start, end)?;
        Some((t, start + (end - start) * t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_normalizes_normal_and_offset() {
        let plane = Plane3D::new(Vector3::new(0.0, 2.0, 0.0), 4.0);
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn zero_normal_is_degenerate_not_a_panic() {
        let plane = Plane3D::new(Vector3::zeros(), 1.0);
        assert!(plane.is_degenerate());
        assert_eq!(plane.normal(), Vector3::zeros());
    }

    #[test]
    fn three_points_clockwise_convention() {
        // Seen from +Z, a -> b -> c turns clockwise.
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);
        let c = Point3::new(1.0, 0.0, 0.0);
        let plane = Plane3D::from_three_points(a, b, c);
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.offset(), 0.0);
    }

    #[test]
    fn collinear_points_give_degenerate_plane() {
        let plane = Plane3D::from_three_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        assert!(plane.is_degenerate());
    }

    #[test]
    fn classify_with_tolerance() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 1.0);
        assert_eq!(plane.classify_point(Point3::new(0.0, 2.0, 0.0)), PlaneSide::InFront);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 0.0)), PlaneSide::Behind);
        assert_eq!(plane.classify_point(Point3::new(5.0, 1.0 + 1e-6, 3.0)), PlaneSide::OnPlane);
        assert_eq!(
            plane.classify_point_with_epsilon(Point3::new(0.0, 1.1, 0.0), 0.5),
            PlaneSide::OnPlane
        );
    }

    #[test]
    fn side_bits_combine() {
        let all = [PlaneSide::Behind, PlaneSide::OnPlane, PlaneSide::InFront]
            .iter()
            .fold(0, |acc, side| acc | side.bits());
        assert_eq!(all, 3);
        assert_eq!(PlaneSide::OnPlane.bits() | PlaneSide::Behind.bits(), 1);
    }

    #[test]
    fn flip_keeps_plane_in_place() {
        let mut plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 2.0);
        let on_plane = Point3::new(2.0, 7.0, -1.0);
        plane.flip();
        assert_relative_eq!(plane.normal(), Vector3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(plane.signed_distance(on_plane), 0.0);
        assert_eq!(plane.classify_point(Point3::new(3.0, 0.0, 0.0)), PlaneSide::Behind);
        assert_eq!(plane.flipped().flipped(), plane);
    }

    #[test]
    fn project_point_lands_on_plane() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 3.0);
        let projected = plane.project_point(Point3::new(1.0, 2.0, 10.0));
        assert_relative_eq!(projected, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn intersect_segment_crossing() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        let (t, point) = plane
            .intersect_segment(Point3::new(0.0, -1.0, 0.0), Point3::new(0.0, 3.0, 4.0))
            .unwrap();
        assert_relative_eq!(t, 0.25);
        assert_relative_eq!(point, Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn intersect_segment_parallel_or_outside() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        assert!(plane
            .intersect_parameter(Point3::new(0.0, 1.0, 0.0), Point3::new(5.0, 1.0, 0.0))
            .is_none());
        assert!(plane
            .intersect_parameter(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 2.0, 0.0))
            .is_none());
    }
}
