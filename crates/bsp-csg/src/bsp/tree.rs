//! BSP tree container and construction.

use tracing::trace;

use crate::measure::{self, Aabb};
use crate::{Partitioner, Plane3D, Triangle};

use super::node::BspNode;
use super::visitor::{BspVisitor, CollectingVisitor};

/// Which side of the other solid survives a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Remove everything inside the other solid.
    #[default]
    KeepOutside,
    /// Remove everything outside the other solid.
    KeepInside,
}

/// A Binary Space Partitioning tree over triangles, describing a solid.
///
/// Each node contains triangles that are coplanar with its splitting plane,
/// while everything else is stored in the subtree behind (`less`) or in front
/// of (`greater`) that plane. Space that ends behind a plane with no `less`
/// child is inside the solid; space in front of a plane with no `greater`
/// child is outside.
///
/// # Construction
///
/// Trees are built incrementally. The first triangle inserted into an empty
/// tree (or an empty side of a node) supplies the splitting plane there, so
/// the shape of the tree depends on insertion order:
///
/// ```
/// use bsp_csg::{cuboid, BspTree};
/// use nalgebra::{Point3, Vector3};
///
/// let tree = BspTree::from_triangles(cuboid(Point3::origin(), Vector3::repeat(1.0)));
/// assert_eq!(tree.triangle_count(), 12);
/// ```
///
/// # Boolean building blocks
///
/// [`BspTree::invert`] turns the solid inside out and [`BspTree::clip_to`]
/// removes everything on one side of another solid. The operations in
/// [`crate::ops`] are compositions of these two steps.
#[derive(Debug, Clone, Default)]
pub struct BspTree {
    root: Option<BspNode>,
    partitioner: Partitioner,
}

impl BspTree {
    /// Creates an empty BSP tree using the default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty BSP tree that classifies with `partitioner`.
    pub fn with_partitioner(partitioner: Partitioner) -> Self {
        Self {
            root: None,
            partitioner,
        }
    }

    /// Builds a BSP tree from a collection of triangles.
    ///
    /// Returns an empty tree if the input is empty or entirely degenerate.
    pub fn from_triangles<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = Triangle>,
    {
        let mut tree = Self::new();
        tree.insert(triangles);
        tree
    }

    /// Returns the partitioner used for every classification on this tree.
    #[inline]
    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    /// Returns `true` if the tree contains no geometry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&BspNode> {
        self.root.as_ref()
    }

    /// Returns the root's splitting plane, or `None` for an empty tree.
    pub fn splitting_plane(&self) -> Option<&Plane3D> {
        self.root.as_ref().map(BspNode::plane)
    }

    /// Returns the total number of triangles in the tree.
    pub fn triangle_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.triangle_count())
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.node_count())
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.depth())
    }

    /// Returns the bounding box of every stored vertex, or `None` when empty.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        self.traverse(&mut super::FnVisitor::new(|_: &Plane3D, triangles: &[Triangle]| {
            if let Some(b) = measure::bounds(triangles) {
                bounds = Some(match bounds {
                    Some(acc) => acc.union(&b),
                    None => b,
                });
            }
        }));
        bounds
    }

    /// Adds triangles to the tree.
    ///
    /// If the tree is empty, the first non-degenerate triangle's plane becomes
    /// the root's splitting plane. Degenerate triangles are skipped.
    pub fn insert<I>(&mut self, triangles: I)
    where
        I: IntoIterator<Item = Triangle>,
    {
        let triangles: Vec<Triangle> = triangles.into_iter().collect();
        if triangles.is_empty() {
            return;
        }
        trace!(count = triangles.len(), "inserting triangles");

        if self.root.is_none() {
            let Some(seed) = triangles.iter().find(|t| !t.is_degenerate()) else {
                trace!("no usable triangle to seed the root");
                return;
            };
            self.root = Some(BspNode::new(*seed.plane()));
        }

        if let Some(ref mut root) = self.root {
            root.insert(triangles, &self.partitioner);
        }
    }

    /// Turns the solid inside out: every plane and triangle is flipped and
    /// the `less`/`greater` subtrees of every node trade places.
    ///
    /// Inverting twice restores the original tree exactly.
    pub fn invert(&mut self) {
        if let Some(ref mut root) = self.root {
            root.invert();
        }
    }

    /// Removes every piece of this tree's geometry that lies on the side of
    /// `other` that `mode` discards.
    ///
    /// Clipping against an empty tree leaves this tree unchanged.
    pub fn clip_to(&mut self, other: &BspTree, mode: ClipMode) {
        self.clip_to_inner(other, mode, None);
    }

    /// Like [`BspTree::clip_to`], but appends the removed pieces to `discarded`.
    pub fn clip_to_collecting(
        &mut self,
        other: &BspTree,
        mode: ClipMode,
        discarded: &mut Vec<Triangle>,
    ) {
        self.clip_to_inner(other, mode, Some(discarded));
    }

    fn clip_to_inner(
        &mut self,
        other: &BspTree,
        mode: ClipMode,
        discarded: Option<&mut Vec<Triangle>>,
    ) {
        let (Some(root), Some(other_root)) = (self.root.as_mut(), other.root.as_ref()) else {
            return;
        };
        trace!(?mode, "clipping tree");
        root.clip_to(other_root, mode, &self.partitioner, discarded);
    }

    /// Clips a loose list of triangles against this solid and returns the
    /// survivors.
    ///
    /// With an empty tree every triangle survives.
    pub fn clip_triangles(&self, triangles: Vec<Triangle>, mode: ClipMode) -> Vec<Triangle> {
        match self.root {
            Some(ref root) => root.clip_triangles(triangles, mode, &self.partitioner, None),
            None => triangles,
        }
    }

    /// Walks the tree in extraction order, handing each non-empty bucket to
    /// `visitor`.
    pub fn traverse<V: BspVisitor>(&self, visitor: &mut V) {
        if let Some(ref root) = self.root {
            traverse_node(root, visitor);
        }
    }

    /// Collects every stored triangle.
    ///
    /// Order is pre-order: a node's own triangles (front-facing bucket, then
    /// back-facing), then the `less` subtree, then the `greater` subtree.
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut visitor = CollectingVisitor::with_capacity(self.triangle_count());
        self.traverse(&mut visitor);
        visitor.into_triangles()
    }

    /// Consumes the tree and returns its triangles in the same order as
    /// [`BspTree::triangles`].
    pub fn into_triangles(self) -> Vec<Triangle> {
        let mut result = Vec::with_capacity(self.triangle_count());
        if let Some(root) = self.root {
            root.drain_into(&mut result);
        }
        result
    }
}

fn traverse_node<V: BspVisitor>(node: &BspNode, visitor: &mut V) {
    if !node.coplanar_front().is_empty() {
        visitor.visit(node.plane(), node.coplanar_front());
    }
    if !node.coplanar_back().is_empty() {
        visitor.visit(node.plane(), node.coplanar_back());
    }
    if let Some(less) = node.less() {
        traverse_node(less, visitor);
    }
    if let Some(greater) = node.greater() {
        traverse_node(greater, visitor);
    }
}
