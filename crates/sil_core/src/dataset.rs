//! Camera dataset loading.
//!
//! A dataset directory contains:
//!
//! - `metadata.json` with `extrinsics` (one row-major 4x4 matrix per camera)
//!   and `intrinsics` (one row-major 3x3 matrix per camera)
//! - `images/`, one reference image per camera, read in filename order
//!
//! Images are only used to grade renders against; the renderer itself
//! consumes poses and intrinsics.

use std::fs;
use std::path::{Path, PathBuf};

use glam::{Mat3, Mat4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Camera count mismatch: {extrinsics} extrinsics but {intrinsics} intrinsics")]
    CameraCountMismatch { extrinsics: usize, intrinsics: usize },
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// On-disk layout of `metadata.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub extrinsics: Vec<[[f32; 4]; 4]>,
    pub intrinsics: Vec<[[f32; 3]; 3]>,
}

impl Metadata {
    /// Convert the nested row-major arrays into glam matrices.
    pub fn to_matrices(&self) -> DatasetResult<(Vec<Mat4>, Vec<Mat3>)> {
        if self.extrinsics.len() != self.intrinsics.len() {
            return Err(DatasetError::CameraCountMismatch {
                extrinsics: self.extrinsics.len(),
                intrinsics: self.intrinsics.len(),
            });
        }

        // glam is column-major; the JSON is row-major
        let extrinsics = self
            .extrinsics
            .iter()
            .map(|rows| Mat4::from_cols_array_2d(rows).transpose())
            .collect();
        let intrinsics = self
            .intrinsics
            .iter()
            .map(|rows| Mat3::from_cols_array_2d(rows).transpose())
            .collect();

        Ok((extrinsics, intrinsics))
    }
}

/// A grayscale reference image with values in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetImage {
    pub width: u32,
    pub height: u32,
    /// Row-major luminance values
    pub pixels: Vec<f32>,
}

impl DatasetImage {
    /// Build from an 8-bit grayscale + alpha image, composited onto white.
    ///
    /// Transparent pixels read as background rather than as dark hits.
    pub fn from_luma_alpha(img: &image::GrayAlphaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img
                .pixels()
                .map(|p| {
                    let luma = p[0] as f32 / 255.0;
                    let alpha = p[1] as f32 / 255.0;
                    luma * alpha + (1.0 - alpha)
                })
                .collect(),
        }
    }

    /// Value at (x, y), or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

/// Camera poses, intrinsics and reference images, index-aligned by camera.
#[derive(Clone, Debug, Default)]
pub struct CameraDataset {
    /// Camera-to-world poses (or whatever convention the source used)
    pub extrinsics: Vec<Mat4>,
    pub intrinsics: Vec<Mat3>,
    pub images: Vec<DatasetImage>,
}

impl CameraDataset {
    pub fn camera_count(&self) -> usize {
        self.extrinsics.len()
    }
}

/// Parse `metadata.json` contents into poses and intrinsics.
pub fn parse_metadata(json: &str) -> DatasetResult<(Vec<Mat4>, Vec<Mat3>)> {
    let metadata: Metadata = serde_json::from_str(json)?;
    metadata.to_matrices()
}

/// Load a dataset directory.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> DatasetResult<CameraDataset> {
    let path = path.as_ref();

    let json = fs::read_to_string(path.join("metadata.json"))?;
    let (extrinsics, intrinsics) = parse_metadata(&json)?;

    let images = load_images(&path.join("images"))?;

    if images.len() != extrinsics.len() {
        log::warn!(
            "Dataset {} has {} cameras but {} images",
            path.display(),
            extrinsics.len(),
            images.len()
        );
    }

    log::info!(
        "Loaded dataset {}: {} cameras, {} images",
        path.display(),
        extrinsics.len(),
        images.len()
    );

    Ok(CameraDataset {
        extrinsics,
        intrinsics,
        images,
    })
}

/// Load every file in `dir`, sorted by filename.
fn load_images(dir: &Path) -> DatasetResult<Vec<DatasetImage>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths
        .iter()
        .map(|path| {
            let img = image::open(path).map_err(|source| DatasetError::Image {
                path: path.clone(),
                source,
            })?;
            let image = DatasetImage::from_luma_alpha(&img.to_luma_alpha8());
            log::debug!(
                "Loaded image: {} ({}x{})",
                path.display(),
                image.width,
                image.height
            );
            Ok(image)
        })
        .collect()
}
