//! Error types for the geometry library.

use thiserror::Error;

/// Errors raised by batched geometry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Shape mismatch: cannot broadcast {left:?} against {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("Batch data has {actual} elements but its shape requires {expected}")]
    DataLength { expected: usize, actual: usize },

    #[error("Singular matrix at batch index {index}")]
    SingularMatrix { index: usize },
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
