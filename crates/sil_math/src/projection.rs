//! Pinhole projection.
//!
//! The projection operator is the 3x3 intrinsics matrix with a zero fourth
//! column, so the homogeneous component of a camera-space coordinate never
//! contributes to the image coordinate. Depth `w` is not checked: points at or
//! behind the camera produce flipped, infinite or NaN coordinates.

use glam::{Mat3, Vec2, Vec3, Vec4};

use crate::{homogenize_vector, Batch, GeometryResult};

/// A 3x4 `[K | 0]` projection operator, stored as rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionMatrix {
    rows: [Vec4; 3],
}

impl ProjectionMatrix {
    /// Build the operator by appending a zero column to the intrinsics.
    pub fn from_intrinsics(intrinsics: &Mat3) -> Self {
        Self {
            rows: [0, 1, 2].map(|i| homogenize_vector(intrinsics.row(i))),
        }
    }

    pub fn rows(&self) -> &[Vec4; 3] {
        &self.rows
    }

    /// Homogeneous image coordinate `(u, v, w)`.
    #[inline]
    pub fn apply(&self, xyz: Vec4) -> Vec3 {
        Vec3::new(
            self.rows[0].dot(xyz),
            self.rows[1].dot(xyz),
            self.rows[2].dot(xyz),
        )
    }

    /// Normalized image coordinate `(u / w, v / w)`.
    #[inline]
    pub fn project(&self, xyz: Vec4) -> Vec2 {
        let uvw = self.apply(xyz);
        uvw.truncate() / uvw.z
    }
}

/// Pinhole intrinsics with rows `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`.
pub fn pinhole_intrinsics(fx: f32, fy: f32, cx: f32, cy: f32) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(fx, 0.0, 0.0),
        Vec3::new(0.0, fy, 0.0),
        Vec3::new(cx, cy, 1.0),
    )
}

/// Project homogeneous camera-space coordinates to normalized image coordinates.
///
/// Batch shapes of `xyz` and `intrinsics` are broadcast against each other.
pub fn project(xyz: &Batch<Vec4>, intrinsics: &Batch<Mat3>) -> GeometryResult<Batch<Vec2>> {
    let operators = intrinsics.map(ProjectionMatrix::from_intrinsics);
    xyz.zip_broadcast(&operators, |v, p| p.project(*v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homogenize_point;
    use crate::test_fixtures::intrinsics;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_pinhole_intrinsics_rows() {
        let k = pinhole_intrinsics(128.0, 64.0, 0.5, 0.25);
        assert_eq!(k.row(0), Vec3::new(128.0, 0.0, 0.5));
        assert_eq!(k.row(1), Vec3::new(0.0, 64.0, 0.25));
        assert_eq!(k.row(2), Vec3::Z);
    }

    #[test]
    fn test_operator_has_zero_column() {
        let p = ProjectionMatrix::from_intrinsics(&intrinsics());
        for row in p.rows() {
            assert_eq!(row.w, 0.0);
        }
        assert_eq!(p.rows()[0], Vec4::new(128.0, 0.0, 0.5, 0.0));
    }

    #[test]
    fn test_project_on_axis() {
        let xyz = Batch::scalar(homogenize_point(Vec3::new(0.0, 0.0, 5.0)));
        let out = project(&xyz, &Batch::scalar(intrinsics())).unwrap();
        assert_eq!(out.as_slice()[0], Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_homogeneous_component_ignored() {
        let p = ProjectionMatrix::from_intrinsics(&intrinsics());
        let a = p.project(Vec4::new(1.0, 2.0, 4.0, 1.0));
        let b = p.project(Vec4::new(1.0, 2.0, 4.0, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scale_invariance() {
        let mut rng = StdRng::seed_from_u64(9);
        let p = ProjectionMatrix::from_intrinsics(&intrinsics());
        for _ in 0..128 {
            let xyz = Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(0.5..20.0),
            );
            let scale = rng.gen_range(0.1..10.0);
            let a = p.project(homogenize_point(xyz));
            let b = p.project(homogenize_point(xyz * scale));
            assert!(
                (a - b).length() <= 1e-4 * a.length().max(1.0),
                "{:?} vs {:?}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_zero_depth_is_not_finite() {
        // Known edge case: no guard at w = 0
        let p = ProjectionMatrix::from_intrinsics(&intrinsics());
        let out = p.project(Vec4::new(1.0, 1.0, 0.0, 1.0));
        assert!(!out.is_finite());
    }

    #[test]
    fn test_negative_depth_flips() {
        // Known edge case: points behind the camera mirror through the center
        let p = ProjectionMatrix::from_intrinsics(&Mat3::IDENTITY);
        let front = p.project(Vec4::new(1.0, 2.0, 1.0, 1.0));
        let back = p.project(Vec4::new(1.0, 2.0, -1.0, 1.0));
        assert_eq!(front, -back);
    }

    #[test]
    fn test_project_broadcasts_over_vertices() {
        let cameras = Batch::from_vec(vec![intrinsics(), Mat3::IDENTITY]).insert_axis(1);
        let xyz = Batch::from_vec(vec![
            homogenize_point(Vec3::new(0.0, 0.0, 1.0)),
            homogenize_point(Vec3::new(2.0, 4.0, 2.0)),
            homogenize_point(Vec3::new(1.0, 1.0, 1.0)),
        ])
        .insert_axis(0);

        let out = project(&xyz, &cameras).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out.get(&[1, 1]), Some(&Vec2::new(1.0, 2.0)));
        assert_eq!(out.get(&[0, 0]), Some(&Vec2::new(0.5, 0.5)));
    }
}
