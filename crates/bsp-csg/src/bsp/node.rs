//! BSP tree node implementation.

use std::mem;

use crate::{Bucket, Partitioner, Plane3D, Triangle};

use super::ClipMode;

/// A node in the BSP tree.
///
/// Each node partitions space using a splitting plane and stores triangles
/// that are coplanar with that plane. Triangles behind or in front of the
/// plane are stored in the `less` or `greater` subtree.
///
/// # Coplanar Triangle Storage
///
/// Coplanar triangles are separated by their facing direction relative to
/// the splitting plane's normal:
/// - `coplanar_front`: triangles whose normal points the same direction as the plane normal
/// - `coplanar_back`: triangles whose normal points opposite to the plane normal
///
/// Children are created lazily: a child exists only once some geometry has
/// been placed on its side of the plane.
///
/// Nodes cannot be assembled by hand; they only come out of
/// [`BspTree::insert`](super::BspTree::insert), so an empty child can never
/// stand in for geometry:
///
/// ```compile_fail
/// use bsp_csg::{BspNode, Plane3D};
/// use nalgebra::Vector3;
///
/// let node = BspNode::new(Plane3D::new(Vector3::y(), 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct BspNode {
    /// The splitting plane for this node.
    plane: Plane3D,

    /// Triangles coplanar with the plane, facing the SAME direction as the plane normal.
    coplanar_front: Vec<Triangle>,

    /// Triangles coplanar with the plane, facing the OPPOSITE direction as the plane normal.
    coplanar_back: Vec<Triangle>,

    /// Subtree for the negative half-space (BEHIND the splitting plane).
    less: Option<Box<BspNode>>,

    /// Subtree for the positive half-space (IN FRONT of the splitting plane).
    greater: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a node with the given splitting plane and nothing stored yet.
    ///
    /// Nodes are only created while inserting, which fills them right away:
    /// the triangle whose plane seeded the node lands in one of its buckets.
    pub(crate) fn new(plane: Plane3D) -> Self {
        Self {
            plane,
            coplanar_front: Vec::new(),
            coplanar_back: Vec::new(),
            less: None,
            greater: None,
        }
    }

    /// Returns a reference to the splitting plane.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns coplanar triangles facing the same direction as the plane normal.
    #[inline]
    pub fn coplanar_front(&self) -> &[Triangle] {
        &self.coplanar_front
    }

    /// Returns coplanar triangles facing opposite to the plane normal.
    #[inline]
    pub fn coplanar_back(&self) -> &[Triangle] {
        &self.coplanar_back
    }

    /// Returns all coplanar triangles at this node (front-facing first).
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.coplanar_front.iter().chain(self.coplanar_back.iter())
    }

    /// Returns the number of coplanar triangles at this node.
    pub fn coplanar_count(&self) -> usize {
        self.coplanar_front.len() + self.coplanar_back.len()
    }

    /// Returns a reference to the subtree behind the plane.
    #[inline]
    pub fn less(&self) -> Option<&BspNode> {
        self.less.as_deref()
    }

    /// Returns a reference to the subtree in front of the plane.
    #[inline]
    pub fn greater(&self) -> Option<&BspNode> {
        self.greater.as_deref()
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.less.is_none() && self.greater.is_none()
    }

    /// Returns the total number of triangles in this subtree (including all descendants).
    pub fn triangle_count(&self) -> usize {
        let mut count = self.coplanar_count();

        if let Some(ref less) = self.less {
            count += less.triangle_count();
        }
        if let Some(ref greater) = self.greater {
            count += greater.triangle_count();
        }

        count
    }

    /// Returns the number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.less.as_ref().map_or(0, |n| n.node_count())
            + self.greater.as_ref().map_or(0, |n| n.node_count())
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        let less_depth = self.less.as_ref().map_or(0, |n| n.depth());
        let greater_depth = self.greater.as_ref().map_or(0, |n| n.depth());
        1 + less_depth.max(greater_depth)
    }

    /// Partitions `triangles` by this node's plane: coplanar pieces join this
    /// node, the rest recurse into the children, which are created on demand
    /// from the plane of the first triangle headed their way.
    pub(crate) fn insert(&mut self, triangles: Vec<Triangle>, partitioner: &Partitioner) {
        let Self {
            plane,
            coplanar_front,
            coplanar_back,
            less,
            greater,
        } = self;

        let mut behind = Vec::new();
        let mut in_front = Vec::new();
        for triangle in triangles {
            partitioner.split_with(triangle, plane, |bucket, piece| match bucket {
                Bucket::Behind => behind.push(piece),
                Bucket::InFront => in_front.push(piece),
                Bucket::CoplanarFront => coplanar_front.push(piece),
                Bucket::CoplanarBack => coplanar_back.push(piece),
            });
        }

        if let Some(first) = behind.first() {
            let seed = *first.plane();
            less.get_or_insert_with(|| Box::new(BspNode::new(seed)))
                .insert(behind, partitioner);
        }
        if let Some(first) = in_front.first() {
            let seed = *first.plane();
            greater
                .get_or_insert_with(|| Box::new(BspNode::new(seed)))
                .insert(in_front, partitioner);
        }
    }

    /// Flips every plane and triangle in this subtree and swaps the children,
    /// turning the solid inside out.
    pub(crate) fn invert(&mut self) {
        for triangle in self.coplanar_front.iter_mut().chain(self.coplanar_back.iter_mut()) {
            triangle.invert();
        }
        self.plane.flip();

        if let Some(ref mut less) = self.less {
            less.invert();
        }
        if let Some(ref mut greater) = self.greater {
            greater.invert();
        }

        mem::swap(&mut self.less, &mut self.greater);
    }

    /// Pushes `triangles` down this subtree and returns the pieces that
    /// survive `mode`.
    ///
    /// Coplanar pieces follow their facing: front-facing ones go with the
    /// positive side, back-facing ones with the negative side. A piece that
    /// reaches a missing child has left the partitioned space; it is dropped
    /// (and recorded in `discarded`) if that side is the one `mode` removes.
    pub(crate) fn clip_triangles(
        &self,
        triangles: Vec<Triangle>,
        mode: ClipMode,
        partitioner: &Partitioner,
        mut discarded: Option<&mut Vec<Triangle>>,
    ) -> Vec<Triangle> {
        if triangles.is_empty() {
            return triangles;
        }

        let mut behind = Vec::new();
        let mut in_front = Vec::new();
        for triangle in triangles {
            partitioner.split_with(triangle, &self.plane, |bucket, piece| match bucket {
                Bucket::Behind | Bucket::CoplanarBack => behind.push(piece),
                Bucket::InFront | Bucket::CoplanarFront => in_front.push(piece),
            });
        }

        let mut kept = match &self.less {
            Some(less) => less.clip_triangles(behind, mode, partitioner, discarded.as_deref_mut()),
            None if mode == ClipMode::KeepOutside => {
                discard(behind, discarded.as_deref_mut());
                Vec::new()
            }
            None => behind,
        };

        let kept_in_front = match &self.greater {
            Some(greater) => greater.clip_triangles(in_front, mode, partitioner, discarded),
            None if mode == ClipMode::KeepInside => {
                discard(in_front, discarded);
                Vec::new()
            }
            None => in_front,
        };

        kept.extend(kept_in_front);
        kept
    }

    /// Clips every bucket in this subtree against the solid rooted at `other`,
    /// replacing each bucket with its surviving pieces.
    pub(crate) fn clip_to(
        &mut self,
        other: &BspNode,
        mode: ClipMode,
        partitioner: &Partitioner,
        mut discarded: Option<&mut Vec<Triangle>>,
    ) {
        let front = mem::take(&mut self.coplanar_front);
        self.coplanar_front = other.clip_triangles(front, mode, partitioner, discarded.as_deref_mut());
        let back = mem::take(&mut self.coplanar_back);
        self.coplanar_back = other.clip_triangles(back, mode, partitioner, discarded.as_deref_mut());

        if let Some(ref mut less) = self.less {
            less.clip_to(other, mode, partitioner, discarded.as_deref_mut());
        }
        if let Some(ref mut greater) = self.greater {
            greater.clip_to(other, mode, partitioner, discarded);
        }
    }

    /// Moves every triangle of this subtree into `out` in extraction order.
    pub(crate) fn drain_into(self, out: &mut Vec<Triangle>) {
        out.extend(self.coplanar_front);
        out.extend(self.coplanar_back);
        if let Some(less) = self.less {
            less.drain_into(out);
        }
        if let Some(greater) = self.greater {
            greater.drain_into(out);
        }
    }
}

fn discard(triangles: Vec<Triangle>, sink: Option<&mut Vec<Triangle>>) {
    if let Some(sink) = sink {
        sink.extend(triangles);
    }
}
