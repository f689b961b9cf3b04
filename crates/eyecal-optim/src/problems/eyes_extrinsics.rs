//! Eye extrinsics calibration.
//!
//! Finds the 6-parameter [`EyePose`] whose left/right extrinsics best explain
//! the measured relative pose between the eyes across all observations.
//!
//! Per observation the predicted relative pose is
//! `D = inv(kin_right * H_right) * (kin_left * H_left)` and the error is
//! `|t_fund - t_D| + |rpy_fund - rpy_D| + 0.1 |t_pose|`; the cost is the mean
//! over observations, and exactly 0 for an empty dataset.

use anyhow::{ensure, Result};
use eyecal_core::{
    iso3_rpy, CalibrationObservation, EyeExtrinsics, EyePose, Real, Vec3, DEG2RAD, EYE_POSE_DIM,
};
use log::warn;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::pso::{ParticleSwarm, PsoError, PsoOptions, SearchSpace};
use crate::{CostFunction, RandomSource};

/// Default `[min, max]` limits: ±0.1 m translation, ±π roll/yaw, ±π/2 pitch.
pub const EYE_DEFAULT_BOUNDS: [[Real; 2]; EYE_POSE_DIM] = [
    [-0.1, 0.1],
    [-0.1, 0.1],
    [-0.1, 0.1],
    [-std::f64::consts::PI, std::f64::consts::PI],
    [-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2],
    [-std::f64::consts::PI, std::f64::consts::PI],
];

/// Initial velocity half-ranges: 1e-4 m for translation, 1 deg for rotation.
const EYE_INITIAL_VELOCITY: [Real; EYE_POSE_DIM] = [1e-4, 1e-4, 1e-4, DEG2RAD, DEG2RAD, DEG2RAD];

impl SearchSpace {
    /// Eye pose search space with the default bounds.
    pub fn eye_default() -> Self {
        Self {
            lower: DVector::from_iterator(EYE_POSE_DIM, EYE_DEFAULT_BOUNDS.iter().map(|b| b[0])),
            upper: DVector::from_iterator(EYE_POSE_DIM, EYE_DEFAULT_BOUNDS.iter().map(|b| b[1])),
            velocity: DVector::from_row_slice(&EYE_INITIAL_VELOCITY),
        }
    }

    /// Eye pose search space with custom bounds and the standard initial velocities.
    pub fn eye(bounds: &[[Real; 2]]) -> Result<Self, PsoError> {
        if bounds.len() != EYE_POSE_DIM {
            return Err(PsoError::DimensionMismatch {
                what: "eye bounds",
                expected: EYE_POSE_DIM,
                got: bounds.len(),
            });
        }
        Self::new(bounds, &EYE_INITIAL_VELOCITY)
    }
}

/// Per-observation discrepancy between measured and predicted relative pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationError {
    /// Translation distance, meters.
    pub translation: Real,
    /// Distance between roll-pitch-yaw triplets, radians.
    pub rotation: Real,
}

/// Eye calibration cost over a borrowed set of observations.
pub struct EyesCost<'a> {
    observations: &'a [CalibrationObservation],
    fundamental_rpy: Vec<Vec3>,
}

impl<'a> EyesCost<'a> {
    /// Weight of the translation-norm regularization.
    pub const REGULARIZATION: Real = 0.1;

    pub fn new(observations: &'a [CalibrationObservation]) -> Self {
        let fundamental_rpy = observations.iter().map(|o| o.fundamental_rpy()).collect();
        Self {
            observations,
            fundamental_rpy,
        }
    }

    pub fn num_observations(&self) -> usize {
        self.observations.len()
    }

    fn error_at(&self, i: usize, ext: &EyeExtrinsics) -> ObservationError {
        let obs = &self.observations[i];
        let hl = obs.eye_kin_left * ext.left;
        let hr = obs.eye_kin_right * ext.right;
        let d = hr.inverse() * hl;
        ObservationError {
            translation: (obs.fundamental.translation.vector - d.translation.vector).norm(),
            rotation: (self.fundamental_rpy[i] - iso3_rpy(&d)).norm(),
        }
    }

    /// Per-observation errors for a pose.
    pub fn observation_errors(&self, pose: &EyePose) -> Vec<ObservationError> {
        let ext = pose.extrinsics();
        (0..self.observations.len())
            .map(|i| self.error_at(i, &ext))
            .collect()
    }

    /// Mean cost of a pose; 0 when there are no observations.
    pub fn pose_cost(&self, pose: &EyePose) -> Real {
        if self.observations.is_empty() {
            return 0.0;
        }
        let regularization = Self::REGULARIZATION * pose.translation().norm();
        let ext = pose.extrinsics();
        let sum: Real = (0..self.observations.len())
            .map(|i| {
                let e = self.error_at(i, &ext);
                e.translation + e.rotation + regularization
            })
            .sum();
        sum / self.observations.len() as Real
    }
}

impl CostFunction for EyesCost<'_> {
    fn dim(&self) -> usize {
        EYE_POSE_DIM
    }

    fn evaluate(&self, x: &DVector<Real>) -> Real {
        match EyePose::from_slice(x.as_slice()) {
            Ok(pose) => self.pose_cost(&pose),
            Err(_) => Real::INFINITY,
        }
    }
}

/// Result of eye extrinsics calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyesExtrinsicsResult {
    pub pose: EyePose,
    pub extrinsics: EyeExtrinsics,
    pub cost: Real,
    pub iterations: usize,
    pub elapsed_s: Real,
    pub restarts: usize,
    /// No observations: every pose has zero cost and the result is meaningless.
    pub degenerate: bool,
}

/// Calibrate the eye extrinsics with a particle swarm.
///
/// `on_step` is invoked after every swarm iteration that wants to continue,
/// with the iteration count; returning `false` stops the run early and the
/// best pose found so far is returned.
///
/// # Errors
///
/// - search space is not 6-dimensional
/// - options carry neither a cap nor a positive cost threshold (the run would never end)
/// - invalid [`PsoOptions`]
pub fn optimize_eye_extrinsics<R, F>(
    observations: &[CalibrationObservation],
    space: SearchSpace,
    options: PsoOptions,
    rng: R,
    mut on_step: F,
) -> Result<EyesExtrinsicsResult>
where
    R: RandomSource,
    F: FnMut(usize) -> bool,
{
    ensure!(
        space.dim() == EYE_POSE_DIM,
        "eye search space needs {} dimensions, got {}",
        EYE_POSE_DIM,
        space.dim()
    );
    ensure!(
        options.max_iters.is_some() || options.max_time_s.is_some() || options.cost_threshold > 0.0,
        "eye calibration needs an iteration cap, a time cap or a positive cost threshold"
    );
    let degenerate = observations.is_empty();
    if degenerate {
        warn!("no calibration observations: every pose has zero cost, result is meaningless");
    }

    let mut swarm = ParticleSwarm::new(EyesCost::new(observations), space, options, rng)?;
    swarm.init();
    while swarm.step()? {
        if !on_step(swarm.iteration()) {
            break;
        }
    }
    let solution = swarm.finalize()?;

    let pose = EyePose::from_slice(solution.position.as_slice())?;
    Ok(EyesExtrinsicsResult {
        pose,
        extrinsics: pose.extrinsics(),
        cost: solution.cost,
        iterations: solution.iterations,
        elapsed_s: solution.elapsed_s,
        restarts: solution.restarts,
        degenerate,
    })
}
