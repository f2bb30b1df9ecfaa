//! Grading rendered silhouettes against reference images.

use sil_core::DatasetImage;

use crate::canvas::{Canvas, HIT};
use crate::{RenderError, RenderResult};

/// Reference pixels darker than this count as silhouette.
pub const SILHOUETTE_THRESHOLD: f32 = 0.5;

/// Fraction of pixels where one camera's canvas agrees with a reference image.
///
/// 1.0 means the silhouettes match exactly.
pub fn silhouette_agreement(
    canvas: &Canvas,
    camera: usize,
    reference: &DatasetImage,
) -> RenderResult<f32> {
    let plane = canvas.plane(camera).ok_or(RenderError::CameraOutOfRange {
        camera,
        batch_size: canvas.batch_size(),
    })?;

    if reference.width != canvas.width() || reference.height != canvas.height() {
        return Err(RenderError::ImageSizeMismatch {
            width: canvas.width(),
            height: canvas.height(),
            actual_width: reference.width,
            actual_height: reference.height,
        });
    }

    let matching = plane
        .iter()
        .zip(&reference.pixels)
        .filter(|&(&rendered, &expected)| (rendered == HIT) == (expected < SILHOUETTE_THRESHOLD))
        .count();

    Ok(matching as f32 / plane.len() as f32)
}

/// Agreement of every camera with its index-aligned reference image.
pub fn dataset_agreement(canvas: &Canvas, references: &[DatasetImage]) -> RenderResult<Vec<f32>> {
    if references.len() != canvas.batch_size() {
        return Err(RenderError::ImageCountMismatch {
            cameras: canvas.batch_size(),
            images: references.len(),
        });
    }

    let scores = references
        .iter()
        .enumerate()
        .map(|(camera, reference)| silhouette_agreement(canvas, camera, reference))
        .collect::<RenderResult<Vec<_>>>()?;

    for (camera, score) in scores.iter().enumerate() {
        log::debug!("Camera {}: {:.1}% agreement", camera, score * 100.0);
    }

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::normalized_intrinsics;
    use crate::{render_point_cloud, Resolution};
    use sil_math::{Mat4, Vec3};

    fn centered_hit() -> Canvas {
        // 0.5 * 4 = 2 -> pixel (2, 2)
        render_point_cloud(
            &[Vec3::new(0.0, 0.0, 1.0)],
            &[Mat4::IDENTITY],
            &[normalized_intrinsics()],
            Resolution::new(5, 5),
        )
        .unwrap()
    }

    fn reference(dark: &[(u32, u32)]) -> DatasetImage {
        let mut pixels = vec![1.0; 25];
        for &(x, y) in dark {
            pixels[(y * 5 + x) as usize] = 0.1;
        }
        DatasetImage {
            width: 5,
            height: 5,
            pixels,
        }
    }

    #[test]
    fn test_exact_match() {
        let canvas = centered_hit();
        let score = silhouette_agreement(&canvas, 0, &reference(&[(2, 2)])).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_partial_match() {
        let canvas = centered_hit();
        // One missed pixel and one extra pixel
        let score = silhouette_agreement(&canvas, 0, &reference(&[(0, 0)])).unwrap();
        assert!((score - 23.0 / 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_size_mismatch() {
        let canvas = centered_hit();
        let small = DatasetImage {
            width: 2,
            height: 2,
            pixels: vec![1.0; 4],
        };
        assert!(matches!(
            silhouette_agreement(&canvas, 0, &small),
            Err(RenderError::ImageSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_camera_out_of_range() {
        let canvas = centered_hit();
        assert_eq!(
            silhouette_agreement(&canvas, 3, &reference(&[])),
            Err(RenderError::CameraOutOfRange {
                camera: 3,
                batch_size: 1
            })
        );
    }

    #[test]
    fn test_dataset_agreement_count() {
        let canvas = centered_hit();
        assert_eq!(
            dataset_agreement(&canvas, &[reference(&[(2, 2)])]).unwrap(),
            vec![1.0]
        );
        assert!(matches!(
            dataset_agreement(&canvas, &[]),
            Err(RenderError::ImageCountMismatch {
                cameras: 1,
                images: 0
            })
        ));
    }
}
