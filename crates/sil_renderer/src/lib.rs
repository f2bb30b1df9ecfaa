//! Silhouette renderer - binary point cloud rasterization.
//!
//! Projects a world-space point cloud through a batch of pinhole cameras and
//! marks every pixel a vertex lands on. Used to check a dataset's camera
//! convention by comparing the silhouettes against its reference images.

mod canvas;
mod compare;
mod error;
mod rasterizer;

pub use canvas::{Canvas, BACKGROUND, HIT};
pub use compare::{dataset_agreement, silhouette_agreement, SILHOUETTE_THRESHOLD};
pub use error::{RenderError, RenderResult};
pub use rasterizer::{render_dataset, render_point_cloud, Resolution};

/// Re-export common math types from sil_math
pub use sil_math::{pinhole_intrinsics, Mat3, Mat4, Vec2, Vec3};
