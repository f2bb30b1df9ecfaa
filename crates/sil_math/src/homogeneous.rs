//! Homogeneous coordinates.
//!
//! Points get a trailing 1 so translations apply to them; vectors get a
//! trailing 0 so they only rotate.

use glam::{Vec2, Vec3, Vec4};

use crate::Batch;

/// A coordinate that can be lifted into homogeneous form.
pub trait Homogenize: Copy {
    /// The coordinate with one extra trailing component.
    type Homogeneous;

    /// Append `w` as the trailing component.
    fn with_trailing(self, w: f32) -> Self::Homogeneous;
}

impl Homogenize for Vec2 {
    type Homogeneous = Vec3;

    fn with_trailing(self, w: f32) -> Vec3 {
        self.extend(w)
    }
}

impl Homogenize for Vec3 {
    type Homogeneous = Vec4;

    fn with_trailing(self, w: f32) -> Vec4 {
        self.extend(w)
    }
}

/// Turn an n-dimensional point into an (n+1)-dimensional homogeneous point.
#[inline]
pub fn homogenize_point<P: Homogenize>(point: P) -> P::Homogeneous {
    point.with_trailing(1.0)
}

/// Turn an n-dimensional vector into an (n+1)-dimensional homogeneous vector.
#[inline]
pub fn homogenize_vector<V: Homogenize>(vector: V) -> V::Homogeneous {
    vector.with_trailing(0.0)
}

/// Homogenize a batch of points, keeping the batch shape.
pub fn homogenize_points<P: Homogenize>(points: &Batch<P>) -> Batch<P::Homogeneous> {
    points.map(|&p| homogenize_point(p))
}

/// Homogenize a batch of vectors, keeping the batch shape.
pub fn homogenize_vectors<V: Homogenize>(vectors: &Batch<V>) -> Batch<V::Homogeneous> {
    vectors.map(|&v| homogenize_vector(v))
}
