//! Point cloud rasterization.
//!
//! Every vertex is transformed into every camera, projected to normalized
//! image coordinates and stamped onto that camera's plane. There is no depth
//! test: a pixel is either hit or not.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sil_core::CameraDataset;
use sil_math::{
    homogenize_points, project, world_to_camera, Batch, GeometryError, Mat3, Mat4, Vec2, Vec3,
};

use crate::canvas::{Canvas, HIT};
use crate::{RenderError, RenderResult};

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
        }
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions must be positive.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Map a normalized image coordinate to a pixel (x, y).
    ///
    /// Coordinates outside [0, 1] are clamped onto the nearest border pixel
    /// rather than dropped. NaN lands on pixel 0.
    pub fn pixel_index(&self, coord: Vec2) -> (u32, u32) {
        (
            scale_to_index(coord.x, self.width),
            scale_to_index(coord.y, self.height),
        )
    }
}

/// `round(value * (size - 1))` with ties to even, clamped to `[0, size - 1]`.
#[inline]
fn scale_to_index(value: f32, size: u32) -> u32 {
    let max = size.saturating_sub(1);
    let scaled = (value * max as f32).round_ties_even();
    // `as` saturates: +inf -> i64::MAX, -inf -> i64::MIN, NaN -> 0
    (scaled as i64).clamp(0, max as i64) as u32
}

/// Render a point cloud into one binary silhouette per camera.
///
/// `extrinsics` are camera-to-world poses, index-aligned with `intrinsics`.
/// Vertices behind a camera are not culled; their projections are clamped
/// onto the border like any other out-of-frame point.
pub fn render_point_cloud(
    vertices: &[Vec3],
    extrinsics: &[Mat4],
    intrinsics: &[Mat3],
    resolution: Resolution,
) -> RenderResult<Canvas> {
    resolution.validate()?;
    if extrinsics.len() != intrinsics.len() {
        return Err(GeometryError::ShapeMismatch {
            left: vec![extrinsics.len()],
            right: vec![intrinsics.len()],
        }
        .into());
    }

    let batch_size = extrinsics.len();
    let vertex_count = vertices.len();
    log::debug!(
        "Rendering {} vertices from {} cameras at {}x{}",
        vertex_count,
        batch_size,
        resolution.width,
        resolution.height
    );

    // [1, V] vertices against [B, 1] cameras
    let vertices_world = homogenize_points(&Batch::from_vec(vertices.to_vec())).insert_axis(0);
    let poses = Batch::from_vec(extrinsics.to_vec()).insert_axis(1);
    let vertices_camera = world_to_camera(&vertices_world, &poses)?;

    let intrinsics = Batch::from_vec(intrinsics.to_vec()).insert_axis(1);
    let projected = project(&vertices_camera, &intrinsics)?;

    let mut canvas = Canvas::new(batch_size, resolution)?;
    if vertex_count == 0 || batch_size == 0 {
        return Ok(canvas);
    }

    // Each camera owns its plane, so planes are filled in parallel
    let width = resolution.width as usize;
    canvas
        .par_planes_mut()
        .zip(projected.as_slice().par_chunks(vertex_count))
        .for_each(|(plane, coords)| {
            for &coord in coords {
                let (x, y) = resolution.pixel_index(coord);
                plane[y as usize * width + x as usize] = HIT;
            }
        });

    if log::log_enabled!(log::Level::Debug) {
        let hits: usize = (0..batch_size).map(|b| canvas.hit_count(b)).sum();
        log::debug!("Rendered {} hit pixels across {} cameras", hits, batch_size);
    }

    Ok(canvas)
}

/// Render a point cloud from every camera in a dataset.
pub fn render_dataset(
    vertices: &[Vec3],
    dataset: &CameraDataset,
    resolution: Resolution,
) -> RenderResult<Canvas> {
    render_point_cloud(
        vertices,
        &dataset.extrinsics,
        &dataset.intrinsics,
        resolution,
    )
}
