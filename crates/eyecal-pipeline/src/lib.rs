//! High-level eye calibration pipeline.
//!
//! Wraps the particle swarm from `eyecal-optim` behind a small stateful front
//! end: collect observations, configure, run, read a serializable report.

pub mod eyes_calibration;

pub use eyes_calibration::{
    EyesCalibration, EyesCalibrationConfig, EyesCalibrationReport, DEFAULT_MAX_ITERS,
};
