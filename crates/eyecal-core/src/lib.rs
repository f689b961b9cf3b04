//! Core math and geometry primitives for `eyecal`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Mat4`, `Iso3`, ...) and
//!   roll-pitch-yaw / rigid-transform helpers,
//! - the symmetric eye extrinsics model ([`EyePose`], [`eye_extrinsics`]),
//! - calibration observation types ([`CalibrationObservation`], [`CalibrationDataset`]),
//! - deterministic synthetic data generation ([`synthetic`]).
//!
//! Transform conventions:
//! `eye_in_ref = eye_kin * extrinsics`, and the fundamental pose is the left
//! eye expressed in the right eye frame, `inv(right_in_ref) * left_in_ref`.

/// Symmetric eye extrinsics model.
pub mod extrinsics;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Synthetic calibration data.
pub mod synthetic;
/// Calibration data types.
pub mod types;

pub use extrinsics::*;
pub use math::*;
pub use types::*;
