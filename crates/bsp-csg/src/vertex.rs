//! Mesh vertex with interpolatable attributes.

use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

/// A triangle corner: position plus the shading attributes a host mesh carries.
///
/// Every attribute is interpolated component-wise when an edge is split, so
/// texture coordinates and colours stay continuous across cut lines.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    /// Tangent direction in `xyz`, handedness in `w`.
    pub tangent: Vector4<f32>,
    pub uv1: Vector2<f32>,
    pub uv2: Vector2<f32>,
    /// RGBA colour.
    pub color: Vector4<f32>,
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

impl Vertex {
    /// Creates a vertex at `position` with zeroed attributes and an opaque white colour.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            tangent: Vector4::zeros(),
            uv1: Vector2::zeros(),
            uv2: Vector2::zeros(),
            color: Vector4::repeat(1.0),
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_tangent(mut self, tangent: Vector4<f32>) -> Self {
        self.tangent = tangent;
        self
    }

    pub fn with_uv1(mut self, uv: Vector2<f32>) -> Self {
        self.uv1 = uv;
        self
    }

    pub fn with_uv2(mut self, uv: Vector2<f32>) -> Self {
        self.uv2 = uv;
        self
    }

    pub fn with_color(mut self, color: Vector4<f32>) -> Self {
        self.color = color;
        self
    }

    /// Linearly interpolates every attribute towards `other` by `t`.
    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: Point3::from(self.position.coords.lerp(&other.position.coords, t)),
            normal: self.normal.lerp(&other.normal, t),
            tangent: self.tangent.lerp(&other.tangent, t),
            uv1: self.uv1.lerp(&other.uv1, t),
            uv2: self.uv2.lerp(&other.uv2, t),
            color: self.color.lerp(&other.color, t),
        }
    }

    /// Negates the normal. Position and tangent are left untouched.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Returns a copy with the normal negated.
    #[inline]
    pub fn flipped(&self) -> Self {
        let mut v = *self;
        v.flip();
        v
    }

    /// Applies an affine transform: the position as a point, the normal and
    /// the tangent direction as vectors. Tangent handedness is preserved.
    pub fn transformed(&self, transform: &Matrix4<f32>) -> Self {
        let tangent = transform.transform_vector(&self.tangent.xyz());
        Self {
            position: transform.transform_point(&self.position),
            normal: transform.transform_vector(&self.normal),
            tangent: Vector4::new(tangent.x, tangent.y, tangent.z, self.tangent.w),
            ..*self
        }
    }
}

impl From<Point3<f32>> for Vertex {
    fn from(position: Point3<f32>) -> Self {
        Self::new(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_interpolates_every_attribute() {
        let a = Vertex::new(Point3::new(0.0, 0.0, 0.0))
            .with_normal(Vector3::new(0.0, 1.0, 0.0))
            .with_tangent(Vector4::new(1.0, 0.0, 0.0, 1.0))
            .with_uv1(Vector2::new(0.0, 0.0))
            .with_uv2(Vector2::new(1.0, 1.0))
            .with_color(Vector4::new(1.0, 0.0, 0.0, 1.0));
        let b = Vertex::new(Point3::new(2.0, 4.0, -2.0))
            .with_normal(Vector3::new(0.0, 0.0, 1.0))
            .with_tangent(Vector4::new(0.0, 1.0, 0.0, -1.0))
            .with_uv1(Vector2::new(1.0, 0.5))
            .with_uv2(Vector2::new(0.0, 0.0))
            .with_color(Vector4::new(0.0, 0.0, 1.0, 0.0));

        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.position, Point3::new(1.0, 2.0, -1.0));
        assert_relative_eq!(mid.normal, Vector3::new(0.0, 0.5, 0.5));
        assert_relative_eq!(mid.tangent, Vector4::new(0.5, 0.5, 0.0, 0.0));
        assert_relative_eq!(mid.uv1, Vector2::new(0.5, 0.25));
        assert_relative_eq!(mid.uv2, Vector2::new(0.5, 0.5));
        assert_relative_eq!(mid.color, Vector4::new(0.5, 0.0, 0.5, 0.5));

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_relative_eq!(a.lerp(&b, 1.0).position, b.position);
    }

    #[test]
    fn flip_only_touches_normal() {
        let v = Vertex::new(Point3::new(1.0, 2.0, 3.0))
            .with_normal(Vector3::new(0.0, 1.0, 0.0))
            .with_tangent(Vector4::new(1.0, 0.0, 0.0, 1.0));
        let flipped = v.flipped();
        assert_eq!(flipped.normal, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(flipped.position, v.position);
        assert_eq!(flipped.tangent, v.tangent);
        assert_eq!(flipped.flipped(), v);
    }

    #[test]
    fn transform_moves_position_but_not_directions() {
        let v = Vertex::new(Point3::new(1.0, 0.0, 0.0))
            .with_normal(Vector3::new(1.0, 0.0, 0.0))
            .with_tangent(Vector4::new(0.0, 1.0, 0.0, -1.0));
        let translation = Matrix4::new_translation(&Vector3::new(0.0, 5.0, 0.0));
        let moved = v.transformed(&translation);
        assert_relative_eq!(moved.position, Point3::new(1.0, 5.0, 0.0));
        assert_relative_eq!(moved.normal, Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved.tangent, Vector4::new(0.0, 1.0, 0.0, -1.0));
    }

    #[test]
    fn transform_rotates_directions() {
        let v = Vertex::new(Point3::new(1.0, 0.0, 0.0))
            .with_normal(Vector3::new(1.0, 0.0, 0.0))
            .with_tangent(Vector4::new(1.0, 0.0, 0.0, 1.0));
        let rotation = Matrix4::new_rotation(Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let rotated = v.transformed(&rotation);
        assert_relative_eq!(rotated.position, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(rotated.normal, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(rotated.tangent, Vector4::new(0.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
    }
}
