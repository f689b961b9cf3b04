//! Symmetric eye extrinsics model.
//!
//! A single 6-parameter pose `[tx, ty, tz, roll, pitch, yaw]` describes both
//! eye cameras. The right eye is built directly from the parameters; the left
//! eye is built from the mirrored parameters, where `tx` and `yaw` change
//! sign. Translation is in meters, rotation in radians.

use crate::{iso3_from_xyz_rpy, Iso3, Mat4, Real, Vec3, Vec6};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of parameters describing both eye extrinsics.
pub const EYE_POSE_DIM: usize = 6;

/// Errors reported by the eye geometry model.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The pose vector has fewer than [`EYE_POSE_DIM`] components.
    #[error("pose vector needs at least {EYE_POSE_DIM} components, got {len}")]
    PoseTooShort { len: usize },
}

/// 6-parameter pose shared by both eyes: `[tx, ty, tz, roll, pitch, yaw]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Real; 6]", into = "[Real; 6]")]
pub struct EyePose(pub Vec6);

impl EyePose {
    pub fn new(tx: Real, ty: Real, tz: Real, roll: Real, pitch: Real, yaw: Real) -> Self {
        Self(Vec6::new(tx, ty, tz, roll, pitch, yaw))
    }

    /// Build a pose from the first six values of a slice.
    pub fn from_slice(values: &[Real]) -> Result<Self, GeometryError> {
        if values.len() < EYE_POSE_DIM {
            return Err(GeometryError::PoseTooShort { len: values.len() });
        }
        Ok(Self(Vec6::from_column_slice(&values[..EYE_POSE_DIM])))
    }

    pub fn translation(&self) -> Vec3 {
        self.0.fixed_rows::<3>(0).into_owned()
    }

    pub fn rpy(&self) -> Vec3 {
        self.0.fixed_rows::<3>(3).into_owned()
    }

    /// Pose with `tx` and `yaw` negated.
    pub fn mirrored(&self) -> Self {
        let mut y = self.0;
        y[0] = -y[0];
        y[5] = -y[5];
        Self(y)
    }

    /// Left and right eye extrinsics implied by this pose.
    pub fn extrinsics(&self) -> EyeExtrinsics {
        let mirrored = self.mirrored();
        EyeExtrinsics {
            left: iso3_from_xyz_rpy(&mirrored.translation(), &mirrored.rpy()),
            right: iso3_from_xyz_rpy(&self.translation(), &self.rpy()),
        }
    }

    pub fn to_array(&self) -> [Real; 6] {
        self.into()
    }
}

impl From<[Real; 6]> for EyePose {
    fn from(v: [Real; 6]) -> Self {
        Self(Vec6::from(v))
    }
}

impl From<EyePose> for [Real; 6] {
    fn from(p: EyePose) -> Self {
        p.0.into()
    }
}

impl From<&EyePose> for [Real; 6] {
    fn from(p: &EyePose) -> Self {
        p.0.into()
    }
}

/// Extrinsics of both eye cameras.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeExtrinsics {
    pub left: Iso3,
    pub right: Iso3,
}

impl EyeExtrinsics {
    /// Left extrinsics as a homogeneous 4×4 matrix.
    pub fn left_matrix(&self) -> Mat4 {
        self.left.to_homogeneous()
    }

    /// Right extrinsics as a homogeneous 4×4 matrix.
    pub fn right_matrix(&self) -> Mat4 {
        self.right.to_homogeneous()
    }
}

/// Compute the left/right eye extrinsics from a pose vector.
///
/// Only the first six values are used.
///
/// # Errors
///
/// [`GeometryError::PoseTooShort`] if `pose` has fewer than six values.
pub fn eye_extrinsics(pose: &[Real]) -> Result<EyeExtrinsics, GeometryError> {
    Ok(EyePose::from_slice(pose)?.extrinsics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iso3_rpy;

    fn assert_iso_close(a: &Iso3, b: &Iso3, tol: Real) {
        let diff = (a.to_homogeneous() - b.to_homogeneous()).norm();
        assert!(diff < tol, "transforms differ by {diff}");
    }

    #[test]
    fn right_eye_uses_parameters_directly() {
        let pose = EyePose::new(0.03, -0.01, 0.02, 0.1, -0.2, 0.3);
        let ext = pose.extrinsics();
        assert_eq!(ext.right.translation.vector, Vec3::new(0.03, -0.01, 0.02));
        assert!((iso3_rpy(&ext.right) - Vec3::new(0.1, -0.2, 0.3)).norm() < 1e-12);
    }

    #[test]
    fn left_eye_mirrors_tx_and_yaw() {
        let pose = EyePose::new(0.03, -0.01, 0.02, 0.1, -0.2, 0.3);
        let ext = pose.extrinsics();
        assert_eq!(ext.left.translation.vector, Vec3::new(-0.03, -0.01, 0.02));
        assert!((iso3_rpy(&ext.left) - Vec3::new(0.1, -0.2, -0.3)).norm() < 1e-12);
    }

    #[test]
    fn mirrored_pose_swaps_eyes() {
        let pose = EyePose::new(0.05, 0.02, -0.04, -0.7, 0.4, 1.1);
        let ext = pose.extrinsics();
        let swapped = pose.mirrored().extrinsics();
        assert_iso_close(&swapped.left, &ext.right, 1e-12);
        assert_iso_close(&swapped.right, &ext.left, 1e-12);
    }

    #[test]
    fn short_pose_is_rejected() {
        for len in 0..EYE_POSE_DIM {
            let v = vec![0.0; len];
            assert_eq!(
                eye_extrinsics(&v).unwrap_err(),
                GeometryError::PoseTooShort { len }
            );
        }
    }

    #[test]
    fn longer_pose_uses_first_six_values() {
        let v = [0.01, 0.02, 0.03, 0.1, 0.2, 0.3, 99.0];
        let ext = eye_extrinsics(&v).unwrap();
        let expected = EyePose::new(0.01, 0.02, 0.03, 0.1, 0.2, 0.3).extrinsics();
        assert_eq!(ext, expected);
    }

    #[test]
    fn pose_serializes_as_plain_array() {
        let pose = EyePose::new(0.0, 0.5, 1.0, 1.5, 0.25, -2.0);
        let json = serde_json::to_string(&pose).unwrap();
        assert_eq!(json, "[0.0,0.5,1.0,1.5,0.25,-2.0]");
        let restored: EyePose = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, pose);
    }
}
