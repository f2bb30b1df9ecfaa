//! Silhouette core - camera datasets and coordinate conventions.
//!
//! This crate provides:
//!
//! - **Dataset loading**: `metadata.json` poses and intrinsics plus the
//!   reference images, as a typed `CameraDataset`
//! - **Conventions**: a record of a dataset's pose format and camera axes,
//!   and conversion of its poses to OpenCV camera-to-world
//!
//! # Example
//!
//! ```ignore
//! use sil_core::{convert_dataset, load_dataset, CameraConvention};
//!
//! let dataset = load_dataset("data/puzzle")?;
//! let dataset = convert_dataset(&dataset, &CameraConvention::OPENGL)?;
//! println!("Loaded {} cameras", dataset.camera_count());
//! ```

pub mod convention;
pub mod dataset;

// Re-export commonly used types
pub use convention::{convert_dataset, Axis, CameraConvention, ConventionError, PoseFormat};
pub use dataset::{load_dataset, parse_metadata, CameraDataset, DatasetError, DatasetImage};
