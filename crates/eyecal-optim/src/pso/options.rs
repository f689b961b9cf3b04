//! Search space and hyperparameters for the particle swarm.

use eyecal_core::Real;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::PsoError;

/// Swarm hyperparameters.
///
/// All values are fixed for the duration of a run; change them before
/// calling [`ParticleSwarm::init`](super::ParticleSwarm::init).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsoOptions {
    /// Number of particles in the swarm.
    pub num_particles: usize,
    /// Iteration cap (`None` = unbounded).
    pub max_iters: Option<usize>,
    /// Wall-clock cap in seconds (`None` = unbounded).
    pub max_time_s: Option<Real>,
    /// Inertia weight applied to the previous velocity.
    pub omega: Real,
    /// Attraction towards the particle's personal best.
    pub phi_p: Real,
    /// Attraction towards the swarm's global best.
    pub phi_g: Real,
    /// Stop once the global-best cost drops to or below this value.
    pub cost_threshold: Real,
    /// Iterations between two stagnation checks.
    pub stagnation_interval: usize,
    /// Mean particle distance to the global best below which the swarm is re-scattered.
    pub stagnation_threshold: Real,
    /// Emit a progress line every `log_every` iterations (0 disables).
    pub log_every: usize,
}

impl Default for PsoOptions {
    fn default() -> Self {
        Self {
            num_particles: 20,
            max_iters: None,
            max_time_s: None,
            omega: 0.8,
            phi_p: 0.1,
            phi_g: 0.1,
            cost_threshold: 0.0,
            stagnation_interval: 100,
            stagnation_threshold: 0.005,
            log_every: 10,
        }
    }
}

impl PsoOptions {
    /// Check that the options describe a runnable swarm.
    pub fn validate(&self) -> Result<(), PsoError> {
        if self.num_particles == 0 {
            return Err(PsoError::InvalidOption(
                "num_particles must be positive".to_string(),
            ));
        }
        if self.stagnation_interval == 0 {
            return Err(PsoError::InvalidOption(
                "stagnation_interval must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("omega", self.omega),
            ("phi_p", self.phi_p),
            ("phi_g", self.phi_g),
            ("stagnation_threshold", self.stagnation_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PsoError::InvalidOption(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.cost_threshold.is_nan() {
            return Err(PsoError::InvalidOption(
                "cost_threshold must not be NaN".to_string(),
            ));
        }
        if let Some(t) = self.max_time_s {
            if t.is_nan() || t < 0.0 {
                return Err(PsoError::InvalidOption(format!(
                    "max_time_s must be non-negative, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// Bounded search space: per-dimension `[min, max]` limits plus the half-range
/// of the random velocities particles start with.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    pub(crate) lower: DVector<Real>,
    pub(crate) upper: DVector<Real>,
    pub(crate) velocity: DVector<Real>,
}

impl SearchSpace {
    /// Build a search space from `[min, max]` pairs and initial velocity half-ranges.
    ///
    /// # Errors
    ///
    /// - [`PsoError::InvalidBounds`] if a limit is not finite or `min > max`
    /// - [`PsoError::DimensionMismatch`] if the velocity length differs from the bounds
    pub fn new(bounds: &[[Real; 2]], initial_velocity: &[Real]) -> Result<Self, PsoError> {
        if bounds.is_empty() {
            return Err(PsoError::InvalidOption(
                "search space needs at least one dimension".to_string(),
            ));
        }
        if initial_velocity.len() != bounds.len() {
            return Err(PsoError::DimensionMismatch {
                what: "initial velocity",
                expected: bounds.len(),
                got: initial_velocity.len(),
            });
        }
        for (dim, &[min, max]) in bounds.iter().enumerate() {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(PsoError::InvalidBounds { dim, min, max });
            }
        }
        if let Some(v) = initial_velocity.iter().find(|v| !v.is_finite()) {
            return Err(PsoError::InvalidOption(format!(
                "initial velocity must be finite, got {v}"
            )));
        }

        Ok(Self {
            lower: DVector::from_iterator(bounds.len(), bounds.iter().map(|b| b[0])),
            upper: DVector::from_iterator(bounds.len(), bounds.iter().map(|b| b[1])),
            velocity: DVector::from_iterator(
                initial_velocity.len(),
                initial_velocity.iter().map(|v| v.abs()),
            ),
        })
    }

    /// Search space whose initial velocity half-range is 0.1% of each bound's width.
    pub fn from_bounds(bounds: &[[Real; 2]]) -> Result<Self, PsoError> {
        let velocity: Vec<Real> = bounds.iter().map(|b| 1e-3 * (b[1] - b[0])).collect();
        Self::new(bounds, &velocity)
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &DVector<Real> {
        &self.lower
    }

    pub fn upper(&self) -> &DVector<Real> {
        &self.upper
    }

    /// Half-range of the initial particle velocities.
    pub fn initial_velocity(&self) -> &DVector<Real> {
        &self.velocity
    }

    /// Bounds as `[min, max]` pairs.
    pub fn bounds(&self) -> Vec<[Real; 2]> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(&lo, &hi)| [lo, hi])
            .collect()
    }

    /// Midpoint of the bounds.
    pub fn center(&self) -> DVector<Real> {
        (&self.lower + &self.upper) * 0.5
    }

    /// Clamp every component of `x` into its bound.
    pub fn clamp(&self, x: &mut DVector<Real>) {
        for (j, v) in x.iter_mut().enumerate() {
            *v = v.max(self.lower[j]).min(self.upper[j]);
        }
    }

    /// Whether every component of `x` lies within its bound.
    pub fn contains(&self, x: &DVector<Real>) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .enumerate()
                .all(|(j, &v)| v >= self.lower[j] && v <= self.upper[j])
    }
}
