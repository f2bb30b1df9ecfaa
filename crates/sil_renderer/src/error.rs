//! Error types for rendering.

use sil_math::GeometryError;
use thiserror::Error;

/// Errors that can occur while rendering or grading a canvas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}: both dimensions must be positive")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Camera {camera} out of range for a batch of {batch_size}")]
    CameraOutOfRange { camera: usize, batch_size: usize },

    #[error("Reference image is {actual_width}x{actual_height} but the canvas is {width}x{height}")]
    ImageSizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("{images} reference images for {cameras} cameras")]
    ImageCountMismatch { cameras: usize, images: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;
