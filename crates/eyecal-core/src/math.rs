//! Mathematical utilities and type definitions.
//!
//! Fixed-size geometric primitives used throughout the workspace, plus the
//! roll-pitch-yaw conversions and rigid-transform helpers the eye geometry
//! model and the calibration cost are built from.

use nalgebra::{Isometry3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3, Vector6};

pub type Real = f64;

pub type Vec3 = Vector3<Real>;
pub type Vec6 = Vector6<Real>;
pub type Mat4 = Matrix4<Real>;
pub type Iso3 = Isometry3<Real>;

/// Degrees to radians.
pub const DEG2RAD: Real = std::f64::consts::PI / 180.0;

/// Rotation matrix from roll-pitch-yaw angles.
///
/// Uses the fixed-axis convention `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn rpy_to_rotation(rpy: &Vec3) -> Rotation3<Real> {
    Rotation3::from_euler_angles(rpy.x, rpy.y, rpy.z)
}

/// Roll-pitch-yaw decomposition of a rotation matrix.
///
/// Inverse of [`rpy_to_rotation`]; pitch is returned in `[-pi/2, pi/2]`.
pub fn rotation_to_rpy(rot: &Rotation3<Real>) -> Vec3 {
    let (roll, pitch, yaw) = rot.euler_angles();
    Vec3::new(roll, pitch, yaw)
}

/// Roll-pitch-yaw decomposition of the rotation part of a rigid transform.
pub fn iso3_rpy(pose: &Iso3) -> Vec3 {
    rotation_to_rpy(&pose.rotation.to_rotation_matrix())
}

/// Build a rigid transform from a translation and roll-pitch-yaw angles.
pub fn iso3_from_xyz_rpy(xyz: &Vec3, rpy: &Vec3) -> Iso3 {
    let rot = UnitQuaternion::from_rotation_matrix(&rpy_to_rotation(rpy));
    Iso3::from_parts(Translation3::from(*xyz), rot)
}
