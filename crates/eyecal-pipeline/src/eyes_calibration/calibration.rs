use std::time::Instant;

use anyhow::{Context, Result};
use eyecal_core::{CalibrationDataset, CalibrationObservation, Mat4, Real};
use eyecal_optim::{optimize_eye_extrinsics, EyesCost};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::EyesCalibrationConfig;

/// Outcome of [`EyesCalibration::run_calibration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyesCalibrationReport {
    /// Best pose `[tx, ty, tz, roll, pitch, yaw]`.
    pub pose: [Real; 6],
    /// Mean cost of `pose` over the dataset.
    pub cost: Real,
    /// Homogeneous left eye extrinsics.
    pub extrinsics_left: Mat4,
    /// Homogeneous right eye extrinsics.
    pub extrinsics_right: Mat4,
    pub iterations: usize,
    /// Wall time of the whole run, seconds.
    pub elapsed_s: Real,
    pub restarts: usize,
    pub num_observations: usize,
    /// Mean translation discrepancy of the solution, meters.
    pub mean_translation_error: Real,
    /// Mean roll-pitch-yaw discrepancy of the solution, radians.
    pub mean_rotation_error: Real,
    /// Set when the dataset was empty and the pose carries no information.
    pub degenerate: bool,
    pub warnings: Vec<String>,
}

/// Eye extrinsics calibration front end.
///
/// Collects observations, then runs the particle swarm over them with the
/// configured bounds and hyperparameters. The observation store is
/// append-only between calls to [`EyesCalibration::clear_data`].
#[derive(Debug, Clone, Default)]
pub struct EyesCalibration {
    data: CalibrationDataset,
    config: EyesCalibrationConfig,
}

impl EyesCalibration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EyesCalibrationConfig) -> Self {
        Self {
            data: CalibrationDataset::new(),
            config,
        }
    }

    /// Append one observation; non-finite transforms are rejected.
    pub fn add_data(&mut self, obs: CalibrationObservation) -> Result<()> {
        self.data.push(obs)
    }

    pub fn num_data(&self) -> usize {
        self.data.len()
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    pub fn observations(&self) -> &[CalibrationObservation] {
        self.data.observations()
    }

    pub fn config(&self) -> &EyesCalibrationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EyesCalibrationConfig) {
        self.config = config;
    }

    /// Run the swarm to completion over the stored observations.
    ///
    /// The thread yields every `yield_every` iterations so a co-located
    /// real-time loop is not starved.
    pub fn run_calibration(&self) -> Result<EyesCalibrationReport> {
        self.run_calibration_with(|_| true)
    }

    /// Like [`run_calibration`](Self::run_calibration), but `keep_going` is
    /// asked after every iteration; returning `false` stops early and the best
    /// pose found so far is reported.
    pub fn run_calibration_with<F>(&self, mut keep_going: F) -> Result<EyesCalibrationReport>
    where
        F: FnMut(usize) -> bool,
    {
        self.config.validate()?;
        let space = self.config.search_space()?;
        let options = self.config.effective_pso();
        let (max_iters, cost_threshold) = (options.max_iters, options.cost_threshold);
        let yield_every = self.config.yield_every;
        let observations = self.data.observations();

        let t0 = Instant::now();
        let mut since_yield = 0;
        let result = optimize_eye_extrinsics(
            observations,
            space,
            options,
            self.config.random_source(),
            |iter| {
                if yield_every > 0 {
                    since_yield += 1;
                    if since_yield >= yield_every {
                        std::thread::yield_now();
                        since_yield = 0;
                    }
                }
                keep_going(iter)
            },
        )
        .context("eye extrinsics optimization failed")?;
        let elapsed_s = t0.elapsed().as_secs_f64();

        info!(
            "solution: {:.5?} found in {:.3} [s]",
            result.pose.to_array(),
            elapsed_s
        );

        let errors = EyesCost::new(observations).observation_errors(&result.pose);
        let n = errors.len().max(1) as Real;
        let mean_translation_error = errors.iter().map(|e| e.translation).sum::<Real>() / n;
        let mean_rotation_error = errors.iter().map(|e| e.rotation).sum::<Real>() / n;

        let mut warnings = Vec::new();
        if result.degenerate {
            warnings.push(
                "no observations: every pose has zero cost, the result is meaningless".to_string(),
            );
        }
        if let Some(max_iters) = max_iters {
            if result.iterations >= max_iters && result.cost > cost_threshold {
                let msg = format!(
                    "iteration cap {max_iters} reached with cost {:.6}",
                    result.cost
                );
                warn!("{msg}");
                warnings.push(msg);
            }
        }

        Ok(EyesCalibrationReport {
            pose: result.pose.to_array(),
            cost: result.cost,
            extrinsics_left: result.extrinsics.left_matrix(),
            extrinsics_right: result.extrinsics.right_matrix(),
            iterations: result.iterations,
            elapsed_s,
            restarts: result.restarts,
            num_observations: observations.len(),
            mean_translation_error,
            mean_rotation_error,
            degenerate: result.degenerate,
            warnings,
        })
    }
}
