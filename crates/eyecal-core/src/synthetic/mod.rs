//! Deterministic synthetic data generation helpers.
//!
//! Builds calibration observations from a known eye pose so tests, examples
//! and the CLI can exercise the calibration without a robot. Every generator
//! takes an explicit seed; the same seed always yields the same data.
//!
//! # Example
//!
//! ```
//! use eyecal_core::{synthetic::eyes, EyePose};
//!
//! let truth = EyePose::new(0.02, 0.0, 0.0, 0.05, -0.03, 0.04);
//! let observations = eyes::observations_from_pose(&truth, 8, 7);
//! assert_eq!(observations.len(), 8);
//! ```

pub mod eyes;
