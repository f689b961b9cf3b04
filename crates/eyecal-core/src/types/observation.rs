//! Observation types for eye calibration data.
//!
//! One observation pairs the kinematic extrinsics of both eyes, valid at the
//! time of capture, with the relative pose between the eyes measured by the
//! stereo pipeline (the "fundamental" pose).

use crate::{iso3_rpy, Iso3, Vec3};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// A single calibration sample.
///
/// # Fields
///
/// - `eye_kin_left`: left eye pose relative to the reference frame, from kinematics
/// - `eye_kin_right`: right eye pose relative to the reference frame, from kinematics
/// - `fundamental`: measured left eye pose expressed in the right eye frame
///
/// # Example
///
/// ```
/// use eyecal_core::{CalibrationObservation, Iso3};
///
/// let obs = CalibrationObservation::new(Iso3::identity(), Iso3::identity(), Iso3::identity());
/// assert!(obs.is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationObservation {
    pub eye_kin_left: Iso3,
    pub eye_kin_right: Iso3,
    pub fundamental: Iso3,
}

impl CalibrationObservation {
    pub fn new(eye_kin_left: Iso3, eye_kin_right: Iso3, fundamental: Iso3) -> Self {
        Self {
            eye_kin_left,
            eye_kin_right,
            fundamental,
        }
    }

    /// Whether every transform in the observation has finite entries.
    pub fn is_finite(&self) -> bool {
        [self.eye_kin_left, self.eye_kin_right, self.fundamental]
            .iter()
            .all(|iso| {
                iso.translation.vector.iter().all(|v| v.is_finite())
                    && iso.rotation.coords.iter().all(|v| v.is_finite())
            })
    }

    /// Roll-pitch-yaw of the measured relative rotation.
    pub fn fundamental_rpy(&self) -> Vec3 {
        iso3_rpy(&self.fundamental)
    }
}

/// Append-only collection of calibration observations.
///
/// Observations are immutable once added; the only way to drop them is
/// [`CalibrationDataset::clear`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationDataset {
    observations: Vec<CalibrationObservation>,
}

impl CalibrationDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from existing observations.
    ///
    /// # Errors
    ///
    /// Returns an error if any observation contains non-finite values.
    pub fn from_observations(observations: Vec<CalibrationObservation>) -> Result<Self> {
        let mut dataset = Self::new();
        for obs in observations {
            dataset.push(obs)?;
        }
        Ok(dataset)
    }

    /// Append an observation.
    ///
    /// # Errors
    ///
    /// Returns an error if the observation contains non-finite values.
    pub fn push(&mut self, obs: CalibrationObservation) -> Result<()> {
        ensure!(
            obs.is_finite(),
            "observation {} contains non-finite values",
            self.observations.len()
        );
        self.observations.push(obs);
        Ok(())
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Read-only view over the observations.
    pub fn observations(&self) -> &[CalibrationObservation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CalibrationObservation> {
        self.observations.iter()
    }

    /// Drop every observation.
    pub fn clear(&mut self) {
        self.observations.clear();
    }
}

impl<'a> IntoIterator for &'a CalibrationDataset {
    type Item = &'a CalibrationObservation;
    type IntoIter = std::slice::Iter<'a, CalibrationObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
