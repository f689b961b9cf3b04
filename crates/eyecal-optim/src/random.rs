//! Injectable sources of uniform random numbers.
//!
//! The swarm draws every random value through [`RandomSource`], so tests can
//! plug in seeded or scripted generators instead of process-wide state.

use eyecal_core::Real;
use nalgebra::DVector;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform random scalars and vectors.
pub trait RandomSource {
    /// Uniform sample in `[min, max]`. Returns `min` when `min >= max`.
    fn scalar(&mut self, min: Real, max: Real) -> Real;

    /// Component-wise uniform sample in `[min[i], max[i]]`.
    fn vector(&mut self, min: &DVector<Real>, max: &DVector<Real>) -> DVector<Real> {
        debug_assert_eq!(min.len(), max.len());
        DVector::from_iterator(
            min.len(),
            min.iter().zip(max.iter()).map(|(&lo, &hi)| self.scalar(lo, hi)),
        )
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn scalar(&mut self, min: Real, max: Real) -> Real {
        (**self).scalar(min, max)
    }

    fn vector(&mut self, min: &DVector<Real>, max: &DVector<Real>) -> DVector<Real> {
        (**self).vector(min, max)
    }
}

/// [`RandomSource`] backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    /// Deterministic source; the same seed reproduces the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for StdRandomSource {
    fn scalar(&mut self, min: Real, max: Real) -> Real {
        if min < max {
            self.rng.random_range(min..=max)
        } else {
            min
        }
    }
}
