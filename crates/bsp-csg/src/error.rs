//! Error types for the geometry boundary.
//!
//! Boolean operations themselves never fail; only malformed input handed to
//! the mesh adapter and invalid partitioner settings are reported.

use thiserror::Error;

/// Errors raised while importing geometry or configuring the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsgError {
    /// An index buffer does not describe whole triangles
    #[error("submesh {submesh} has {len} indices, which is not a multiple of 3")]
    IndexCount { submesh: usize, len: usize },

    /// An index points past the end of the vertex buffers
    #[error("index {index} in submesh {submesh} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        submesh: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A per-vertex attribute buffer is neither empty nor as long as the positions
    #[error("attribute `{attribute}` has {len} entries, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        expected: usize,
    },

    /// A position contains NaN or infinity
    #[error("vertex {index} has a non-finite position")]
    NonFinitePosition { index: usize },

    /// A triangle has collinear corners and no orientation plane
    #[error("triangle {triangle} of submesh {submesh} is degenerate")]
    DegenerateTriangle { submesh: usize, triangle: usize },

    /// An exported mesh needs more vertices than `u32` indices can address
    #[error("mesh needs {count} vertices, more than a u32 index can address")]
    TooManyVertices { count: usize },

    /// The classification tolerance is negative or not finite
    #[error("invalid plane epsilon {0}: must be finite and non-negative")]
    InvalidEpsilon(f32),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CsgError>;
