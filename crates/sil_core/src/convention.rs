//! Camera coordinate conventions.
//!
//! Datasets disagree on whether poses are world-to-camera or camera-to-world,
//! and on which local axis the camera looks down. A `CameraConvention` records
//! what a dataset uses (determined by a human comparing renders against the
//! reference images) and converts its poses into the OpenCV convention:
//!
//! - poses are camera-to-world
//! - look = +Z, up = -Y, right = +X

use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use sil_math::{invert_poses, Batch, GeometryError};
use thiserror::Error;

use crate::dataset::CameraDataset;

/// Errors from building or applying a convention.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConventionError {
    #[error("Unknown axis: {0:?} (expected one of +x, -x, +y, -y, +z, -z)")]
    UnknownAxis(String),

    #[error("Unknown pose format: {0:?} (expected w2c or c2w)")]
    UnknownFormat(String),

    #[error("Look {look}, up {up} and right {right} must lie on distinct axes")]
    DegenerateAxes { look: Axis, up: Axis, right: Axis },

    #[error("Look {look}, up {up} and right {right} form a left-handed frame")]
    Mirrored { look: Axis, up: Axis, right: Axis },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

pub type ConventionResult<T> = Result<T, ConventionError>;

/// A signed coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "+x")]
    PosX,
    #[serde(rename = "-x")]
    NegX,
    #[serde(rename = "+y")]
    PosY,
    #[serde(rename = "-y")]
    NegY,
    #[serde(rename = "+z")]
    PosZ,
    #[serde(rename = "-z")]
    NegZ,
}

impl Axis {
    pub const ALL: [Axis; 6] = [
        Axis::PosX,
        Axis::NegX,
        Axis::PosY,
        Axis::NegY,
        Axis::PosZ,
        Axis::NegZ,
    ];

    /// Unit vector along this axis.
    pub fn to_vec3(self) -> Vec3 {
        match self {
            Axis::PosX => Vec3::X,
            Axis::NegX => Vec3::NEG_X,
            Axis::PosY => Vec3::Y,
            Axis::NegY => Vec3::NEG_Y,
            Axis::PosZ => Vec3::Z,
            Axis::NegZ => Vec3::NEG_Z,
        }
    }

    /// Index of the unsigned coordinate axis (0 = x, 1 = y, 2 = z).
    pub fn dimension(self) -> usize {
        match self {
            Axis::PosX | Axis::NegX => 0,
            Axis::PosY | Axis::NegY => 1,
            Axis::PosZ | Axis::NegZ => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::PosX => "+x",
            Axis::NegX => "-x",
            Axis::PosY => "+y",
            Axis::NegY => "-y",
            Axis::PosZ => "+z",
            Axis::NegZ => "-z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = ConventionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Axis::ALL
            .into_iter()
            .find(|axis| axis.as_str() == s)
            .ok_or(ConventionError::UnknownAxis(s))
    }
}

/// Which way a dataset's extrinsics map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoseFormat {
    #[serde(rename = "w2c")]
    WorldToCamera,
    #[serde(rename = "c2w")]
    CameraToWorld,
}

impl FromStr for PoseFormat {
    type Err = ConventionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w2c" => Ok(PoseFormat::WorldToCamera),
            "c2w" => Ok(PoseFormat::CameraToWorld),
            other => Err(ConventionError::UnknownFormat(other.to_string())),
        }
    }
}

/// A dataset's pose format and camera axes.
///
/// Deserializing goes through [`CameraConvention::new`], so invalid axis
/// triples are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConvention")]
pub struct CameraConvention {
    pub format: PoseFormat,
    pub look: Axis,
    pub up: Axis,
    pub right: Axis,
}

impl CameraConvention {
    /// OpenCV: camera-to-world, look +Z, up -Y, right +X.
    pub const OPENCV: CameraConvention = CameraConvention {
        format: PoseFormat::CameraToWorld,
        look: Axis::PosZ,
        up: Axis::NegY,
        right: Axis::PosX,
    };

    /// OpenGL / Blender: camera-to-world, look -Z, up +Y, right +X.
    pub const OPENGL: CameraConvention = CameraConvention {
        format: PoseFormat::CameraToWorld,
        look: Axis::NegZ,
        up: Axis::PosY,
        right: Axis::PosX,
    };

    /// Create a convention, rejecting axes that share a coordinate or that
    /// form a left-handed frame.
    pub fn new(format: PoseFormat, look: Axis, up: Axis, right: Axis) -> ConventionResult<Self> {
        let convention = Self {
            format,
            look,
            up,
            right,
        };
        convention.validate()?;
        Ok(convention)
    }

    /// Check that the axes span a right-handed frame.
    ///
    /// The fields are public, so conventions built as struct literals are
    /// only checked here.
    pub fn validate(&self) -> ConventionResult<()> {
        let (look, up, right) = (self.look, self.up, self.right);
        let dims = [look.dimension(), up.dimension(), right.dimension()];
        if dims[0] == dims[1] || dims[1] == dims[2] || dims[0] == dims[2] {
            return Err(ConventionError::DegenerateAxes { look, up, right });
        }
        // OpenCV's x cross y is z; the mapped axes must keep that orientation
        if right.to_vec3().cross(-up.to_vec3()) != look.to_vec3() {
            return Err(ConventionError::Mirrored { look, up, right });
        }
        Ok(())
    }

    /// Change of basis from OpenCV camera axes to this convention's axes.
    ///
    /// Columns are where OpenCV's +X, +Y, +Z land in this convention's
    /// camera frame: right, -up, look.
    pub fn basis(&self) -> Mat4 {
        Mat4::from_cols(
            self.right.to_vec3().extend(0.0),
            (-self.up.to_vec3()).extend(0.0),
            self.look.to_vec3().extend(0.0),
            Vec4::W,
        )
    }

    /// Convert poses in this convention to OpenCV camera-to-world poses.
    pub fn to_opencv(&self, poses: &[Mat4]) -> ConventionResult<Vec<Mat4>> {
        self.validate()?;
        let poses = Batch::from_vec(poses.to_vec());
        let cam2world = match self.format {
            PoseFormat::CameraToWorld => poses,
            PoseFormat::WorldToCamera => invert_poses(&poses)?,
        };

        let basis = self.basis();
        Ok(cam2world
            .into_vec()
            .into_iter()
            .map(|pose| pose * basis)
            .collect())
    }
}

/// Unchecked serde form of [`CameraConvention`].
#[derive(Deserialize)]
struct RawConvention {
    format: PoseFormat,
    look: Axis,
    up: Axis,
    right: Axis,
}

impl TryFrom<RawConvention> for CameraConvention {
    type Error = ConventionError;

    fn try_from(raw: RawConvention) -> ConventionResult<Self> {
        Self::new(raw.format, raw.look, raw.up, raw.right)
    }
}

impl Default for CameraConvention {
    fn default() -> Self {
        Self::OPENCV
    }
}

/// Convert a dataset's extrinsics to OpenCV camera-to-world.
///
/// Intrinsics and images are carried over unchanged.
pub fn convert_dataset(
    dataset: &CameraDataset,
    convention: &CameraConvention,
) -> ConventionResult<CameraDataset> {
    log::debug!(
        "Converting {} poses from {:?} (look {}, up {}, right {}) to OpenCV",
        dataset.camera_count(),
        convention.format,
        convention.look,
        convention.up,
        convention.right
    );

    Ok(CameraDataset {
        extrinsics: convention.to_opencv(&dataset.extrinsics)?,
        intrinsics: dataset.intrinsics.clone(),
        images: dataset.images.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;

    fn approx_eq(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("+x".parse::<Axis>().unwrap(), Axis::PosX);
        assert_eq!(" -Z ".parse::<Axis>().unwrap(), Axis::NegZ);
        assert_eq!(
            "up".parse::<Axis>(),
            Err(ConventionError::UnknownAxis("up".to_string()))
        );
        for axis in Axis::ALL {
            assert_eq!(axis.to_string().parse::<Axis>().unwrap(), axis);
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("c2w".parse::<PoseFormat>().unwrap(), PoseFormat::CameraToWorld);
        assert_eq!("W2C".parse::<PoseFormat>().unwrap(), PoseFormat::WorldToCamera);
        assert!("cam".parse::<PoseFormat>().is_err());
    }

    #[test]
    fn test_convention_serde() {
        let json = r#"{"format": "w2c", "look": "-z", "up": "+y", "right": "+x"}"#;
        let convention: CameraConvention = serde_json::from_str(json).unwrap();
        assert_eq!(convention.format, PoseFormat::WorldToCamera);
        assert_eq!(convention.look, Axis::NegZ);
        assert_eq!(convention.up, Axis::PosY);
    }

    #[test]
    fn test_degenerate_axes() {
        let err = CameraConvention::new(
            PoseFormat::CameraToWorld,
            Axis::PosZ,
            Axis::NegZ,
            Axis::PosX,
        )
        .unwrap_err();
        assert!(matches!(err, ConventionError::DegenerateAxes { .. }));
    }

    #[test]
    fn test_deserialize_rejects_degenerate_axes() {
        let json = r#"{"format":"c2w","look":"+z","up":"-z","right":"+x"}"#;
        let err = serde_json::from_str::<CameraConvention>(json).unwrap_err();
        assert!(err.to_string().contains("distinct axes"), "{}", err);
    }

    #[test]
    fn test_deserialize_rejects_mirrored_axes() {
        let json = r#"{"format":"c2w","look":"+z","up":"+y","right":"+x"}"#;
        let err = serde_json::from_str::<CameraConvention>(json).unwrap_err();
        assert!(err.to_string().contains("left-handed"), "{}", err);
    }

    #[test]
    fn test_mirrored_axes() {
        let err = CameraConvention::new(
            PoseFormat::CameraToWorld,
            Axis::PosZ,
            Axis::PosY,
            Axis::PosX,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConventionError::Mirrored {
                look: Axis::PosZ,
                up: Axis::PosY,
                right: Axis::PosX,
            }
        );

        assert_eq!(CameraConvention::OPENCV.validate(), Ok(()));
        assert_eq!(CameraConvention::OPENGL.validate(), Ok(()));
    }

    #[test]
    fn test_right_handed_bases_are_rotations() {
        // Every accepted triple yields a proper rotation, never a reflection
        let mut accepted = 0;
        for look in Axis::ALL {
            for up in Axis::ALL {
                for right in Axis::ALL {
                    if let Ok(c) = CameraConvention::new(PoseFormat::CameraToWorld, look, up, right)
                    {
                        assert!((c.basis().determinant() - 1.0).abs() < 1e-6);
                        accepted += 1;
                    }
                }
            }
        }
        assert_eq!(accepted, 24);
    }

    #[test]
    fn test_to_opencv_rejects_unchecked_literal() {
        let convention = CameraConvention {
            format: PoseFormat::CameraToWorld,
            look: Axis::PosZ,
            up: Axis::NegZ,
            right: Axis::PosX,
        };
        assert!(matches!(
            convention.to_opencv(&[Mat4::IDENTITY]),
            Err(ConventionError::DegenerateAxes { .. })
        ));
    }

    #[test]
    fn test_opencv_is_identity() {
        let pose = Mat4::from_rotation_translation(
            glam::Quat::from_rotation_y(0.7),
            Vec3::new(1.0, -2.0, 3.0),
        );
        assert_eq!(CameraConvention::OPENCV.basis(), Mat4::IDENTITY);
        let out = CameraConvention::OPENCV.to_opencv(&[pose]).unwrap();
        assert!(approx_eq(out[0], pose));
    }

    #[test]
    fn test_opengl_to_opencv() {
        let out = CameraConvention::OPENGL.to_opencv(&[Mat4::IDENTITY]).unwrap();

        // An OpenGL camera at the origin looks down world -Z
        let look = out[0].transform_vector3(Vec3::Z);
        let up = out[0].transform_vector3(Vec3::NEG_Y);
        let right = out[0].transform_vector3(Vec3::X);
        assert!(look.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(up.abs_diff_eq(Vec3::Y, 1e-6));
        assert!(right.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_world_to_camera_inverted() {
        let convention = CameraConvention {
            format: PoseFormat::WorldToCamera,
            ..CameraConvention::OPENCV
        };
        let w2c = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let out = convention.to_opencv(&[w2c]).unwrap();
        assert!(approx_eq(out[0], Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0))));
    }

    #[test]
    fn test_singular_world_to_camera() {
        let convention = CameraConvention {
            format: PoseFormat::WorldToCamera,
            ..CameraConvention::OPENCV
        };
        let err = convention
            .to_opencv(&[Mat4::IDENTITY, Mat4::ZERO])
            .unwrap_err();
        assert_eq!(
            err,
            ConventionError::Geometry(GeometryError::SingularMatrix { index: 1 })
        );
    }

    #[test]
    fn test_convert_dataset_keeps_intrinsics() {
        let dataset = CameraDataset {
            extrinsics: vec![Mat4::IDENTITY; 2],
            intrinsics: vec![Mat3::IDENTITY; 2],
            images: Vec::new(),
        };
        let converted = convert_dataset(&dataset, &CameraConvention::OPENGL).unwrap();
        assert_eq!(converted.camera_count(), 2);
        assert_eq!(converted.intrinsics, dataset.intrinsics);
        assert_eq!(converted.extrinsics[0], CameraConvention::OPENGL.basis());
    }
}
