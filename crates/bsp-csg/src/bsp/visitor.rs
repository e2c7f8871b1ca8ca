//! Visitor pattern for BSP tree traversal.
//!
//! Visitors receive the stored geometry one coplanar bucket at a time, in the
//! tree's extraction order: a node's front-facing bucket, then its back-facing
//! bucket, then the `less` subtree, then the `greater` subtree.

use crate::{Plane3D, Triangle};

/// Visitor for processing triangles during BSP tree traversal.
pub trait BspVisitor {
    /// Called for each non-empty coplanar bucket.
    ///
    /// `plane` is the splitting plane of the node that owns the bucket; all
    /// `triangles` lie on it.
    fn visit(&mut self, plane: &Plane3D, triangles: &[Triangle]);
}

/// A simple visitor that collects all visited triangles.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<Triangle>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            collected: Vec::with_capacity(capacity),
        }
    }

    /// Returns the collected triangles.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.collected
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.collected
    }
}

impl BspVisitor for CollectingVisitor {
    fn visit(&mut self, _plane: &Plane3D, triangles: &[Triangle]) {
        self.collected.extend(triangles.iter().cloned());
    }
}

/// A visitor that calls a closure for each bucket.
pub struct FnVisitor<F>
where
    F: FnMut(&Plane3D, &[Triangle]),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&Plane3D, &[Triangle]),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> BspVisitor for FnVisitor<F>
where
    F: FnMut(&Plane3D, &[Triangle]),
{
    fn visit(&mut self, plane: &Plane3D, triangles: &[Triangle]) {
        (self.func)(plane, triangles);
    }
}
