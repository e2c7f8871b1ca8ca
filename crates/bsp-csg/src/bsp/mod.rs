//! Binary Space Partitioning tree for triangle solids.
//!
//! This module provides a BSP tree that recursively partitions 3D space using
//! planes taken from the inserted triangles. The tree supports:
//!
//! - Incremental insertion, splitting triangles that straddle a node's plane
//! - Inversion, which swaps the inside and outside of the solid
//! - Clipping against another tree, keeping either side of that solid
//! - Extraction of the stored triangles in a stable order
//!
//! # Example
//!
//! ```
//! use bsp_csg::bsp::{BspTree, ClipMode};
//! use bsp_csg::cuboid;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut a = BspTree::from_triangles(cuboid(Point3::origin(), Vector3::repeat(1.0)));
//! let b = BspTree::from_triangles(cuboid(Point3::new(0.5, 0.0, 0.0), Vector3::repeat(1.0)));
//!
//! // Keep only the part of A's surface that is outside B.
//! a.clip_to(&b, ClipMode::KeepOutside);
//! let remaining = a.into_triangles();
//! assert!(!remaining.is_empty());
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The main container holding the root node and the partitioner
//! - [`BspNode`]: Internal nodes storing a splitting plane and coplanar triangles
//! - [`BspVisitor`]: Visitor trait for custom traversal behavior

mod node;
mod tree;
mod visitor;

// Re-export main types
pub use node::BspNode;
pub use tree::{BspTree, ClipMode};
pub use visitor::{BspVisitor, CollectingVisitor, FnVisitor};
