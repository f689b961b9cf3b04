//! High-level entry crate for the eye calibration toolbox.
//!
//! Given observations pairing the kinematic poses of both eyes with the
//! measured relative pose between them, find the 6-parameter pose
//! `[tx, ty, tz, roll, pitch, yaw]` that describes both eye extrinsics under a
//! bilateral symmetry assumption.
//!
//! ## Pipeline API
//!
//! ```no_run
//! use eyecal::pipeline::{EyesCalibration, EyesCalibrationConfig};
//! use eyecal::core::{synthetic::eyes, EyePose};
//!
//! # fn main() -> anyhow::Result<()> {
//! let truth = EyePose::new(0.03, 0.0, 0.0, 0.0, 0.05, 0.1);
//! let mut calib = EyesCalibration::with_config(EyesCalibrationConfig::default());
//! for obs in eyes::observations_from_pose(&truth, 10, 0) {
//!     calib.add_data(obs)?;
//! }
//! let report = calib.run_calibration()?;
//! println!("pose {:?} cost {}", report.pose, report.cost);
//! # Ok(())
//! # }
//! ```
//!
//! ## Optimizer API
//!
//! The swarm is a general bounded minimizer over any [`optim::CostFunction`]:
//!
//! ```
//! use eyecal::optim::{minimize, FnCost, PsoOptions, SearchSpace, StdRandomSource};
//! use nalgebra::DVector;
//!
//! let cost = FnCost::new(2, |x: &DVector<f64>| (x[0] - 0.3).powi(2) + x[1].powi(2));
//! let space = SearchSpace::from_bounds(&[[-1.0, 1.0], [-1.0, 1.0]]).unwrap();
//! let options = PsoOptions { max_iters: Some(50), ..PsoOptions::default() };
//! let best = minimize(cost, space, options, StdRandomSource::seeded(0)).unwrap();
//! assert_eq!(best.iterations, 50);
//! assert!(space_contains(&best.position));
//! # fn space_contains(x: &DVector<f64>) -> bool { x.iter().all(|v| v.abs() <= 1.0) }
//! ```
//!
//! ## Crates
//!
//! - [`core`]: math aliases, the eye geometry model, observations, synthetic data
//! - [`optim`]: random sources, particle swarm, eye extrinsics cost
//! - [`pipeline`]: configurable calibration front end with a JSON report

/// Math aliases, the eye geometry model, observations and synthetic data.
pub mod core {
    pub use eyecal_core::*;
}

/// Random sources, the particle swarm and the eye extrinsics cost.
pub mod optim {
    pub use eyecal_optim::*;
}

/// Calibration front end.
pub mod pipeline {
    pub use eyecal_pipeline::*;
}

/// Convenient re-exports for the common path.
pub mod prelude {
    pub use crate::core::{
        CalibrationDataset, CalibrationObservation, EyeExtrinsics, EyePose, Iso3, Real,
    };
    pub use crate::optim::{PsoOptions, SearchSpace, StdRandomSource};
    pub use crate::pipeline::{EyesCalibration, EyesCalibrationConfig, EyesCalibrationReport};
}
