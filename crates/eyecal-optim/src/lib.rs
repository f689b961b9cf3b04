//! Global optimization utilities and the eye extrinsics calibration problem.
//!
//! The particle swarm in [`pso`] is a general bounded-parameter minimizer: it
//! only sees a [`CostFunction`] and a [`RandomSource`]. The eye calibration
//! cost and its problem builder live in [`problems`].

pub mod problems;
pub mod pso;
pub mod random;
mod traits;

pub use crate::problems::eyes_extrinsics::{
    optimize_eye_extrinsics, EyesCost, EyesExtrinsicsResult, ObservationError,
    EYE_DEFAULT_BOUNDS,
};
pub use crate::pso::{
    minimize, Particle, ParticleSwarm, PsoError, PsoOptions, PsoSolution, SearchSpace,
    SwarmProgress, SwarmState,
};
pub use crate::random::{RandomSource, StdRandomSource};
pub use crate::traits::{CostFunction, FnCost};
