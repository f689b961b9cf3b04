//! Calibration data types.

pub mod observation;

pub use observation::{CalibrationDataset, CalibrationObservation};
