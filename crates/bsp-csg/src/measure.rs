//! Bounding boxes and whole-solid measurements over triangle lists.

use nalgebra::{Point3, Vector3};

use crate::Triangle;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Returns the smallest box holding every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::new(first, first);
        for p in points {
            aabb.expand_to_contain(p);
        }
        Some(aabb)
    }

    /// Grows the box so that it contains `point`.
    pub fn expand_to_contain(&mut self, point: Point3<f32>) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Checks if this bounding box overlaps with another (touching counts).
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
            && self.max.z >= other.min.z
            && self.min.z <= other.max.z
    }

    /// Checks if `point` lies inside or on the box.
    #[inline]
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Bounding box of every vertex in `triangles`.
pub fn bounds(triangles: &[Triangle]) -> Option<Aabb> {
    Aabb::from_points(triangles.iter().flat_map(|t| t.positions()))
}

/// Volume enclosed by a closed triangle mesh, from the sum of the signed
/// tetrahedra each triangle forms with the origin.
///
/// Positive when the triangles are wound clockwise seen from outside (normals
/// point outward), negative for an inside-out solid. Meaningless for open
/// meshes.
pub fn signed_volume(triangles: &[Triangle]) -> f32 {
    let sum: f32 = triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.positions();
            a.coords.dot(&c.coords.cross(&b.coords))
        })
        .sum();
    sum / 6.0
}

/// Total area of all triangles.
pub fn surface_area(triangles: &[Triangle]) -> f32 {
    triangles.iter().map(Triangle::area).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuboid;
    use approx::assert_relative_eq;

    #[test]
    fn from_points_spans_extremes() {
        let aabb = Aabb::from_points([
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 3.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 3.0, 2.0));
        assert_eq!(aabb.center(), Point3::new(0.0, 0.5, 1.0));
        assert_eq!(aabb.size(), Vector3::new(2.0, 5.0, 2.0));

        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn intersects_and_contains() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let touching = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let apart = Aabb::new(Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));

        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(a.contains_point(Point3::new(1.0, 0.5, 0.0)));
        assert!(!a.contains_point(Point3::new(1.0, 0.5, -0.1)));

        let u = a.union(&apart);
        assert_eq!(u.max.x, 2.0);
        assert_eq!(u.min.x, 0.0);
    }

    #[test]
    fn cube_volume_and_area() {
        let cube = cuboid(Point3::new(3.0, -1.0, 2.0), Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(signed_volume(&cube), 6.0, epsilon = 1e-4);
        assert_relative_eq!(surface_area(&cube), 22.0, epsilon = 1e-4);

        let inside_out: Vec<Triangle> = cube.iter().map(Triangle::inverted).collect();
        assert_relative_eq!(signed_volume(&inside_out), -6.0, epsilon = 1e-4);
    }

    #[test]
    fn bounds_of_nothing() {
        assert!(bounds(&[]).is_none());
    }
}
