//! Calibration problems built on the particle swarm.

pub mod eyes_extrinsics;
