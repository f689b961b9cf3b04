//! Eye extrinsics calibration front end.
//!
//! # Example
//!
//! ```no_run
//! use eyecal_pipeline::eyes_calibration::{EyesCalibration, EyesCalibrationConfig};
//! # fn main() -> anyhow::Result<()> {
//! # let observations: Vec<eyecal_core::CalibrationObservation> = vec![];
//! let mut calib = EyesCalibration::with_config(EyesCalibrationConfig::default());
//! for obs in observations {
//!     calib.add_data(obs)?;
//! }
//! let report = calib.run_calibration()?;
//! if report.degenerate {
//!     eprintln!("not enough data to calibrate");
//! }
//! println!("pose {:?}, cost {}", report.pose, report.cost);
//! # Ok(())
//! # }
//! ```
//!
//! # Conventions
//!
//! - pose = `[tx, ty, tz, roll, pitch, yaw]`, meters and radians
//! - `extrinsics_right` is built from the pose, `extrinsics_left` from the
//!   pose with `tx` and `yaw` negated
//! - default configuration caps the run at [`DEFAULT_MAX_ITERS`] iterations

mod calibration;
mod config;

pub use calibration::{EyesCalibration, EyesCalibrationReport};
pub use config::{EyesCalibrationConfig, DEFAULT_MAX_ITERS};
