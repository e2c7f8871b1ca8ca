//! Boolean operations built from tree inversion and clipping.
//!
//! None of the operations touch their inputs: each works on clones, so the
//! same trees can be reused across any number of calls.

use tracing::debug;

use crate::bsp::{BspTree, ClipMode};
use crate::{Bucket, Triangle};

/// The two pieces of a solid cut by another solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slice {
    /// The part of the sliced solid outside the cutter.
    pub outside: Vec<Triangle>,
    /// The part of the sliced solid inside the cutter.
    pub inside: Vec<Triangle>,
}

/// Computes `a - b`: the geometry of `a` that is not inside `b`.
///
/// The surface of `b` that lies inside `a` is turned around and becomes the
/// wall of the cavity, so two closed inputs give a closed result.
#[tracing::instrument(level = "debug", skip_all, fields(a = a.triangle_count(), b = b.triangle_count()))]
pub fn subtract(a: &BspTree, b: &BspTree) -> BspTree {
    if a.is_empty() || b.is_empty() {
        return a.clone();
    }

    let mut a_clone = a.clone();
    let mut b_clone = b.clone();

    // Inside-out B, trimmed to the part within A, is the cavity wall.
    b_clone.invert();
    b_clone.clip_to(a, ClipMode::KeepInside);
    a_clone.clip_to(b, ClipMode::KeepOutside);
    a_clone.insert(b_clone.into_triangles());

    debug!(triangles = a_clone.triangle_count(), "subtract finished");
    a_clone
}

/// Cuts `a` with the solid `b` into the part outside `b` and the part inside.
///
/// Both pieces are closed: the surface of `b` within `a` caps each of them,
/// turned around for [`Slice::outside`] and as-is for [`Slice::inside`].
#[tracing::instrument(level = "debug", skip_all, fields(a = a.triangle_count(), b = b.triangle_count()))]
pub fn slice(a: &BspTree, b: &BspTree) -> Slice {
    if a.is_empty() {
        return Slice::default();
    }
    if b.is_empty() {
        return Slice {
            outside: a.triangles(),
            inside: Vec::new(),
        };
    }

    let mut outside_tree = a.clone();
    let mut inside = Vec::new();
    outside_tree.clip_to_collecting(b, ClipMode::KeepOutside, &mut inside);

    let mut caps = b.clone();
    caps.invert();
    caps.clip_to(a, ClipMode::KeepInside);
    let caps = caps.into_triangles();

    let mut outside = outside_tree.into_triangles();
    outside.reserve(caps.len());
    inside.reserve(caps.len());
    for cap in caps {
        inside.push(cap.inverted());
        outside.push(cap);
    }

    debug!(outside = outside.len(), inside = inside.len(), "slice finished");
    Slice { outside, inside }
}

/// Splits `a` by the root splitting plane of `b` alone, treating `b` as a
/// single infinite plane.
///
/// Runs in one pass over `a` but ignores the rest of `b`, so it only matches
/// [`slice`] when `b` is a half-space. The pieces are not capped. Triangles
/// lying on the plane go with the side their normal faces; an empty `b`
/// leaves everything outside.
#[tracing::instrument(level = "debug", skip_all, fields(a = a.triangle_count()))]
pub fn fast_slice(a: &BspTree, b: &BspTree) -> Slice {
    let Some(plane) = b.splitting_plane() else {
        return Slice {
            outside: a.triangles(),
            inside: Vec::new(),
        };
    };

    let mut result = Slice::default();
    let partitioner = a.partitioner();
    for triangle in a.triangles() {
        partitioner.split_with(triangle, plane, |bucket, piece| match bucket {
            Bucket::Behind | Bucket::CoplanarBack => result.inside.push(piece),
            Bucket::InFront | Bucket::CoplanarFront => result.outside.push(piece),
        });
    }

    debug!(
        outside = result.outside.len(),
        inside = result.inside.len(),
        "fast slice finished"
    );
    result
}
