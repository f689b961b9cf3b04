use anyhow::{ensure, Context, Result};
use eyecal_core::{Real, EYE_POSE_DIM};
use eyecal_optim::{PsoOptions, RandomSource, SearchSpace, StdRandomSource};
use log::warn;
use serde::{Deserialize, Serialize};

/// Iteration cap used when the configuration sets no stopping criterion.
///
/// This is a safety stop, not a convergence budget. With the default
/// [`PsoOptions`] hyperparameters and this cap the rotation is usually
/// recovered but the translation can still be off by several centimeters
/// (cost a few times the noise-free floor). Calibrations that need the
/// translation should tune `omega`/`phi_*` or raise `max_iters`, and check
/// the report's warnings and mean errors.
pub const DEFAULT_MAX_ITERS: usize = 2000;

/// Configuration for eye extrinsics calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyesCalibrationConfig {
    /// Swarm hyperparameters and stopping criteria.
    pub pso: PsoOptions,

    /// Per-parameter `[min, max]` limits for `[tx, ty, tz, roll, pitch, yaw]`.
    /// `None` uses ±0.1 m translation, ±π roll/yaw and ±π/2 pitch.
    pub bounds: Option<Vec<[Real; 2]>>,

    /// Seed for the random source (`None` = seeded from the OS).
    pub seed: Option<u64>,

    /// Yield the thread every `yield_every` swarm iterations (0 never yields).
    pub yield_every: usize,
}

impl Default for EyesCalibrationConfig {
    fn default() -> Self {
        Self {
            pso: PsoOptions {
                max_iters: Some(DEFAULT_MAX_ITERS),
                ..PsoOptions::default()
            },
            bounds: None,
            seed: None,
            yield_every: 10,
        }
    }
}

impl EyesCalibrationConfig {
    /// Check bounds and hyperparameters before a run.
    pub fn validate(&self) -> Result<()> {
        self.pso.validate().context("invalid swarm options")?;
        if let Some(bounds) = &self.bounds {
            ensure!(
                bounds.len() == EYE_POSE_DIM,
                "bounds need {} rows, got {}",
                EYE_POSE_DIM,
                bounds.len()
            );
            for (i, [min, max]) in bounds.iter().enumerate() {
                ensure!(min <= max, "bounds row {i}: min {min} > max {max}");
            }
        }
        Ok(())
    }

    /// Search space described by `bounds`.
    pub fn search_space(&self) -> Result<SearchSpace> {
        match &self.bounds {
            Some(bounds) => SearchSpace::eye(bounds).context("invalid calibration bounds"),
            None => Ok(SearchSpace::eye_default()),
        }
    }

    /// Swarm options for a run; an uncapped configuration gets [`DEFAULT_MAX_ITERS`].
    pub fn effective_pso(&self) -> PsoOptions {
        let mut options = self.pso.clone();
        if options.max_iters.is_none()
            && options.max_time_s.is_none()
            && options.cost_threshold <= 0.0
        {
            warn!("no stopping criterion configured, capping at {DEFAULT_MAX_ITERS} iterations");
            options.max_iters = Some(DEFAULT_MAX_ITERS);
        }
        options
    }

    pub(crate) fn random_source(&self) -> impl RandomSource {
        match self.seed {
            Some(seed) => StdRandomSource::seeded(seed),
            None => StdRandomSource::from_entropy(),
        }
    }
}
