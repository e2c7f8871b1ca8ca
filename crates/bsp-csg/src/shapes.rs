//! Ready-made closed solids.

use nalgebra::{Point3, Vector2, Vector3};

use crate::{Polygon, Triangle, Vertex};

/// Generates the 12 triangles of an axis-aligned box.
///
/// Faces are wound clockwise seen from outside, so every triangle's normal
/// points away from the box. Vertices carry the face normal, a tangent along
/// the face's `u` axis and per-face UVs spanning `[0, 1]`.
pub fn cuboid(center: Point3<f32>, size: Vector3<f32>) -> Vec<Triangle> {
    let half = size / 2.0;
    let (hx, hy, hz) = (half.x, half.y, half.z);

    // 8 corners of the box
    let corners = [
        center + Vector3::new(-hx, -hy, -hz), // 0: left-bottom-back
        center + Vector3::new(hx, -hy, -hz),  // 1: right-bottom-back
        center + Vector3::new(hx, hy, -hz),   // 2: right-top-back
        center + Vector3::new(-hx, hy, -hz),  // 3: left-top-back
        center + Vector3::new(-hx, -hy, hz),  // 4: left-bottom-front
        center + Vector3::new(hx, -hy, hz),   // 5: right-bottom-front
        center + Vector3::new(hx, hy, hz),    // 6: right-top-front
        center + Vector3::new(-hx, hy, hz),   // 7: left-top-front
    ];

    // 6 faces with clockwise winding (viewed from outside)
    let faces: [([usize; 4], Vector3<f32>); 6] = [
        ([4, 7, 6, 5], Vector3::z()),  // front (+Z)
        ([1, 2, 3, 0], -Vector3::z()), // back (-Z)
        ([0, 3, 7, 4], -Vector3::x()), // left (-X)
        ([5, 6, 2, 1], Vector3::x()),  // right (+X)
        ([7, 3, 2, 6], Vector3::y()),  // top (+Y)
        ([0, 4, 5, 1], -Vector3::y()), // bottom (-Y)
    ];
    let uvs = [
        Vector2::new(0.0, 0.0),
        Vector2::new(0.0, 1.0),
        Vector2::new(1.0, 1.0),
        Vector2::new(1.0, 0.0),
    ];

    let mut triangles = Vec::with_capacity(12);
    for (indices, normal) in faces {
        let u_axis = (corners[indices[3]] - corners[indices[0]]).normalize();
        let quad: Vec<Vertex> = indices
            .iter()
            .zip(uvs)
            .map(|(&i, uv)| {
                Vertex::new(corners[i])
                    .with_normal(normal)
                    .with_tangent(u_axis.push(1.0))
                    .with_uv1(uv)
            })
            .collect();
        triangles.extend(Polygon::new(quad).triangulate());
    }
    triangles
}
