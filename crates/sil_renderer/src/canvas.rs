//! Binary silhouette canvas.
//!
//! A batch of `height x width` planes, one per camera. Every pixel is either
//! `BACKGROUND` (1.0, never hit) or `HIT` (0.0, hit by at least one vertex).

use rayon::prelude::*;

use crate::{RenderError, RenderResult, Resolution};

/// Value of a pixel no vertex landed on.
pub const BACKGROUND: f32 = 1.0;

/// Value of a pixel at least one vertex landed on.
pub const HIT: f32 = 0.0;

/// A `batch x height x width` silhouette buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    batch_size: usize,
    resolution: Resolution,
    pixels: Vec<f32>,
}

impl Canvas {
    /// Create a canvas with every pixel set to `BACKGROUND`.
    pub fn new(batch_size: usize, resolution: Resolution) -> RenderResult<Self> {
        resolution.validate()?;
        Ok(Self {
            batch_size,
            resolution,
            pixels: vec![BACKGROUND; batch_size * resolution.pixel_count()],
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn width(&self) -> u32 {
        self.resolution.width
    }

    pub fn height(&self) -> u32 {
        self.resolution.height
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Pixel value of camera `camera` at (x, y).
    pub fn get(&self, camera: usize, x: u32, y: u32) -> Option<f32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let plane = self.plane(camera)?;
        plane.get(y as usize * self.width() as usize + x as usize).copied()
    }

    /// Row-major plane of one camera.
    pub fn plane(&self, camera: usize) -> Option<&[f32]> {
        if camera >= self.batch_size {
            return None;
        }
        let len = self.resolution.pixel_count();
        Some(&self.pixels[camera * len..(camera + 1) * len])
    }

    /// Planes as disjoint mutable chunks, one per camera.
    pub(crate) fn par_planes_mut(&mut self) -> rayon::slice::ChunksMut<'_, f32> {
        let len = self.resolution.pixel_count();
        self.pixels.par_chunks_mut(len)
    }

    /// All pixels, camera-major then row-major.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Raw bytes of the pixel buffer (native-endian f32).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn into_pixels(self) -> Vec<f32> {
        self.pixels
    }

    /// Number of hit pixels for one camera.
    pub fn hit_count(&self, camera: usize) -> usize {
        self.plane(camera)
            .map(|plane| plane.iter().filter(|&&v| v == HIT).count())
            .unwrap_or(0)
    }

    /// True if every pixel is exactly `HIT` or `BACKGROUND`.
    pub fn is_binary(&self) -> bool {
        self.pixels.iter().all(|&v| v == HIT || v == BACKGROUND)
    }

    /// Convert one camera's plane to an 8-bit grayscale image.
    pub fn to_image(&self, camera: usize) -> RenderResult<image::GrayImage> {
        let plane = self.plane(camera).ok_or(RenderError::CameraOutOfRange {
            camera,
            batch_size: self.batch_size,
        })?;
        let width = self.width();
        Ok(image::GrayImage::from_fn(width, self.height(), |x, y| {
            let value = plane[(y * width + x) as usize];
            image::Luma([(255.0 * value.clamp(0.0, 1.0)) as u8])
        }))
    }
}
