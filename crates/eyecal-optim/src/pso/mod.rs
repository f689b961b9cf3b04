//! Bounded-parameter particle swarm optimization.
//!
//! To use this module, implement [`CostFunction`](crate::CostFunction) for
//! your objective, describe the bounds with a [`SearchSpace`], and either
//! drive a [`ParticleSwarm`] by hand (`init`, repeated `step`, `finalize`) or
//! call [`minimize`].
//!
//! The run never fails for numerical reasons: when the caps are hit before the
//! cost threshold is reached, `finalize` still returns the best candidate seen.

mod options;
mod swarm;

pub use options::{PsoOptions, SearchSpace};
pub use swarm::{minimize, Particle, ParticleSwarm, PsoSolution, SwarmProgress, SwarmState};

use eyecal_core::Real;
use thiserror::Error;

/// Errors reported by the particle swarm.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PsoError {
    /// Two sizes that must agree do not.
    #[error("{what} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A bound is not finite or has `min > max`.
    #[error("invalid bounds for dimension {dim}: [{min}, {max}]")]
    InvalidBounds { dim: usize, min: Real, max: Real },
    /// A hyperparameter is out of range.
    #[error("invalid option: {0}")]
    InvalidOption(String),
    /// `step` or `finalize` was called before `init`.
    #[error("swarm is not initialized")]
    NotInitialized,
    /// `step` was called after the stopping criteria were met.
    #[error("swarm has already terminated")]
    Terminated,
}
