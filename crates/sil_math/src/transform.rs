// Rigid-body transforms between world and camera space
//
// Poses are stored camera-to-world. Going the other way needs an inverse,
// which is checked rather than trusted: glam's Mat4::inverse() silently
// produces inf/NaN for singular input.

use glam::{Mat4, Vec4};

use crate::{Batch, GeometryError, GeometryResult};

/// Determinants at or below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-10;

/// Extension trait for Mat4 with transform utilities for camera poses.
pub trait Mat4Ext {
    /// Inverse of the matrix, or `None` if it is singular or non-finite.
    fn checked_inverse(&self) -> Option<Mat4>;

    /// Apply the matrix to a homogeneous coordinate.
    /// The trailing component is carried through the product, never renormalized.
    fn transform_homogeneous(&self, xyz: Vec4) -> Vec4;
}

impl Mat4Ext for Mat4 {
    fn checked_inverse(&self) -> Option<Mat4> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= SINGULAR_EPSILON {
            return None;
        }
        let inverse = self.inverse();
        inverse.is_finite().then_some(inverse)
    }

    #[inline]
    fn transform_homogeneous(&self, xyz: Vec4) -> Vec4 {
        *self * xyz
    }
}

/// Apply rigid-body transforms to homogeneous points or vectors.
///
/// The batch shapes of `xyz` and `transform` are broadcast against each other.
pub fn rigid_transform(xyz: &Batch<Vec4>, transform: &Batch<Mat4>) -> GeometryResult<Batch<Vec4>> {
    xyz.zip_broadcast(transform, |v, m| m.transform_homogeneous(*v))
}

/// Invert every pose in a batch.
///
/// Fails with `SingularMatrix` naming the flat index of the first bad pose.
pub fn invert_poses(poses: &Batch<Mat4>) -> GeometryResult<Batch<Mat4>> {
    poses.try_map(|index, pose| {
        pose.checked_inverse()
            .ok_or(GeometryError::SingularMatrix { index })
    })
}

/// Transform homogeneous world coordinates into camera coordinates.
pub fn world_to_camera(xyz: &Batch<Vec4>, cam2world: &Batch<Mat4>) -> GeometryResult<Batch<Vec4>> {
    let world2cam = invert_poses(cam2world)?;
    rigid_transform(xyz, &world2cam)
}

/// Transform homogeneous camera coordinates into world coordinates.
pub fn camera_to_world(xyz: &Batch<Vec4>, cam2world: &Batch<Mat4>) -> GeometryResult<Batch<Vec4>> {
    rigid_transform(xyz, cam2world)
}
