//! Geometry transform library for point-cloud silhouette rendering.
//!
//! Batched homogeneous coordinates, rigid transforms between world and camera
//! space, and pinhole projection to normalized image coordinates.

// Re-export glam for convenience
pub use glam::*;

mod batch;
mod error;
mod homogeneous;
mod projection;
mod transform;

pub use batch::{broadcast_shapes, Batch};
pub use error::{GeometryError, GeometryResult};
pub use homogeneous::{
    homogenize_point, homogenize_points, homogenize_vector, homogenize_vectors, Homogenize,
};
pub use projection::{pinhole_intrinsics, project, ProjectionMatrix};
pub use transform::{
    camera_to_world, invert_poses, rigid_transform, world_to_camera, Mat4Ext, SINGULAR_EPSILON,
};
