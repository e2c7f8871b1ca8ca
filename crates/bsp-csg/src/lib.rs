//! Constructive solid geometry on triangle meshes using BSP trees.
//!
//! Solids are closed triangle meshes wound clockwise seen from outside. A
//! [`BspTree`] built from one partitions space by the planes of its
//! triangles; inverting and clipping such trees against each other gives the
//! boolean operations in [`ops`].
//!
//! ```
//! use bsp_csg::{cuboid, ops, signed_volume, BspTree};
//! use nalgebra::{Point3, Vector3};
//!
//! let a = BspTree::from_triangles(cuboid(Point3::origin(), Vector3::repeat(1.0)));
//! let b = BspTree::from_triangles(cuboid(Point3::new(0.5, 0.0, 0.0), Vector3::repeat(1.0)));
//!
//! let notched = ops::subtract(&a, &b).into_triangles();
//! assert!((signed_volume(&notched) - 0.5).abs() < 1e-4);
//! ```

pub mod bsp;
mod error;
mod measure;
mod mesh;
pub mod ops;
mod partition;
mod plane;
mod polygon;
mod shapes;
mod triangle;
mod vertex;

pub use bsp::{BspNode, BspTree, ClipMode};
pub use error::{CsgError, Result};
pub use measure::{bounds, signed_volume, surface_area, Aabb};
pub use mesh::{tree_from_mesh, DegeneratePolicy, ImportOptions, MeshBuffers, VertexLayout};
pub use ops::Slice;
pub use partition::{faces_same_direction, Bucket, Orientation, Partition, Partitioner};
pub use plane::{Plane3D, PlaneSide, PLANE_EPSILON};
pub use polygon::Polygon;
pub use shapes::cuboid;
pub use triangle::Triangle;
pub use vertex::Vertex;
