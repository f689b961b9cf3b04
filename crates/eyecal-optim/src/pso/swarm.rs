use std::time::{Duration, Instant};

use eyecal_core::Real;
use log::{debug, info};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::{PsoError, PsoOptions, SearchSpace};
use crate::{CostFunction, RandomSource};

/// One swarm member: position, velocity and the cost at `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: DVector<Real>,
    pub velocity: DVector<Real>,
    /// `+inf` until evaluated.
    pub cost: Real,
}

impl Particle {
    fn unevaluated(position: DVector<Real>) -> Self {
        let dim = position.len();
        Self {
            position,
            velocity: DVector::zeros(dim),
            cost: Real::INFINITY,
        }
    }
}

/// Lifecycle of a [`ParticleSwarm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwarmState {
    Uninitialized,
    Initialized,
    Running,
    Terminated,
}

/// Snapshot of the run for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwarmProgress {
    pub iteration: usize,
    pub elapsed_s: Real,
    pub best_cost: Real,
    pub cost_threshold: Real,
    pub restarts: usize,
}

/// Best candidate of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsoSolution {
    pub position: DVector<Real>,
    pub cost: Real,
    pub iterations: usize,
    pub elapsed_s: Real,
    /// Number of stagnation re-scatters during the run.
    pub restarts: usize,
}

/// Particle swarm minimizer over a bounded search space.
///
/// The global best is updated as soon as a particle improves on it, so later
/// particles in the same sweep are already attracted to the new best.
pub struct ParticleSwarm<C, R> {
    cost: C,
    space: SearchSpace,
    options: PsoOptions,
    rng: R,
    state: SwarmState,
    /// Current particles.
    x: Vec<Particle>,
    /// Personal bests, index-aligned with `x`.
    p: Vec<Particle>,
    /// Global best.
    g: Particle,
    iter: usize,
    restarts: usize,
    t0: Instant,
    elapsed: Duration,
}

impl<C: CostFunction, R: RandomSource> ParticleSwarm<C, R> {
    /// Create an uninitialized swarm.
    ///
    /// # Errors
    ///
    /// - invalid [`PsoOptions`]
    /// - cost dimension differs from the search space dimension
    pub fn new(cost: C, space: SearchSpace, options: PsoOptions, rng: R) -> Result<Self, PsoError> {
        options.validate()?;
        if cost.dim() != space.dim() {
            return Err(PsoError::DimensionMismatch {
                what: "cost function",
                expected: space.dim(),
                got: cost.dim(),
            });
        }
        let g = Particle::unevaluated(space.center());
        Ok(Self {
            cost,
            space,
            options,
            rng,
            state: SwarmState::Uninitialized,
            x: Vec::new(),
            p: Vec::new(),
            g,
            iter: 0,
            restarts: 0,
            t0: Instant::now(),
            elapsed: Duration::ZERO,
        })
    }

    pub fn options(&self) -> &PsoOptions {
        &self.options
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn state(&self) -> SwarmState {
        self.state
    }

    /// Completed iterations since `init`.
    pub fn iteration(&self) -> usize {
        self.iter
    }

    /// Wall time between `init` and the end of the last `step`.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of stagnation re-scatters so far.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn particles(&self) -> &[Particle] {
        &self.x
    }

    pub fn personal_bests(&self) -> &[Particle] {
        &self.p
    }

    pub fn global_best(&self) -> &Particle {
        &self.g
    }

    /// Mean distance from the current particle positions to the global best.
    pub fn spread(&self) -> Real {
        if self.x.is_empty() {
            return 0.0;
        }
        let sum: Real = self
            .x
            .iter()
            .map(|particle| (&self.g.position - &particle.position).norm())
            .sum();
        sum / self.x.len() as Real
    }

    pub fn progress(&self) -> SwarmProgress {
        SwarmProgress {
            iteration: self.iter,
            elapsed_s: self.elapsed.as_secs_f64(),
            best_cost: self.g.cost,
            cost_threshold: self.options.cost_threshold,
            restarts: self.restarts,
        }
    }

    /// Draw fresh positions inside the bounds and fresh small velocities.
    fn randomize(&mut self) {
        let lower = self.space.lower();
        let upper = self.space.upper();
        let vmax = self.space.initial_velocity();
        for particle in &mut self.x {
            for j in 0..particle.position.len() {
                particle.position[j] = self.rng.scalar(lower[j], upper[j]);
            }
            for j in 0..particle.velocity.len() {
                particle.velocity[j] = self.rng.scalar(-vmax[j], vmax[j]);
            }
        }
    }

    /// Create the population, evaluate it and pick the initial global best.
    ///
    /// Calling `init` again discards the previous run.
    pub fn init(&mut self) {
        self.x = vec![Particle::unevaluated(self.space.center()); self.options.num_particles];
        self.randomize();
        self.p = self.x.clone();

        self.g = Particle::unevaluated(self.space.center());
        for particle in &mut self.p {
            particle.cost = self.cost.evaluate(&particle.position);
            if particle.cost < self.g.cost {
                self.g = particle.clone();
            }
        }

        self.iter = 0;
        self.restarts = 0;
        self.t0 = Instant::now();
        self.elapsed = Duration::ZERO;
        self.state = SwarmState::Initialized;
    }

    /// Run one swarm update.
    ///
    /// Returns `Ok(true)` while the run should continue, `Ok(false)` once the
    /// iteration cap, the time cap or the cost threshold is reached.
    ///
    /// # Errors
    ///
    /// - [`PsoError::NotInitialized`] before `init`
    /// - [`PsoError::Terminated`] after a previous call returned `Ok(false)`
    pub fn step(&mut self) -> Result<bool, PsoError> {
        match self.state {
            SwarmState::Uninitialized => return Err(PsoError::NotInitialized),
            SwarmState::Terminated => return Err(PsoError::Terminated),
            SwarmState::Initialized | SwarmState::Running => {}
        }
        self.state = SwarmState::Running;
        self.iter += 1;

        let dim = self.space.dim();
        let rand_min = DVector::zeros(dim);
        let rand_max = DVector::from_element(dim, 1.0);
        let PsoOptions {
            omega,
            phi_p,
            phi_g,
            ..
        } = self.options;

        for i in 0..self.x.len() {
            let r1 = self.rng.vector(&rand_min, &rand_max);
            let r2 = self.rng.vector(&rand_min, &rand_max);

            let xi = &mut self.x[i];
            let to_personal = &self.p[i].position - &xi.position;
            let to_global = &self.g.position - &xi.position;
            xi.velocity = &xi.velocity * omega
                + r1.component_mul(&to_personal) * phi_p
                + r2.component_mul(&to_global) * phi_g;

            xi.position += &xi.velocity;
            self.space.clamp(&mut xi.position);

            let f = self.cost.evaluate(&xi.position);
            xi.cost = f;
            if f < self.p[i].cost {
                self.p[i] = xi.clone();
                if f < self.g.cost {
                    self.g = self.p[i].clone();
                }
            }
        }

        let mut scattered = false;
        if self.iter % self.options.stagnation_interval == 0
            && self.spread() < self.options.stagnation_threshold
        {
            self.randomize();
            self.restarts += 1;
            scattered = true;
        }

        self.elapsed = self.t0.elapsed();
        let keep_going = self.options.max_iters.map_or(true, |m| self.iter < m)
            && self.g.cost > self.options.cost_threshold
            && self
                .options
                .max_time_s
                .map_or(true, |t| self.elapsed.as_secs_f64() < t);

        if self.options.log_every > 0 && self.iter % self.options.log_every == 0 {
            self.log_progress(scattered);
        }

        if !keep_going {
            self.state = SwarmState::Terminated;
        }
        Ok(keep_going)
    }

    fn log_progress(&self, scattered: bool) {
        let progress = self.progress();
        if scattered {
            debug!(
                "iter #{} t={:.3} [s]: cost={} ({}); particles scattered away",
                progress.iteration, progress.elapsed_s, progress.best_cost, progress.cost_threshold
            );
        } else {
            debug!(
                "iter #{} t={:.3} [s]: cost={} ({})",
                progress.iteration, progress.elapsed_s, progress.best_cost, progress.cost_threshold
            );
        }
    }

    /// Best candidate found so far.
    ///
    /// Valid at any point after `init`; stopping early and finalizing yields
    /// a well-defined partial result.
    pub fn finalize(&self) -> Result<PsoSolution, PsoError> {
        if self.state == SwarmState::Uninitialized {
            return Err(PsoError::NotInitialized);
        }
        let solution = PsoSolution {
            position: self.g.position.clone(),
            cost: self.g.cost,
            iterations: self.iter,
            elapsed_s: self.elapsed.as_secs_f64(),
            restarts: self.restarts,
        };
        info!(
            "swarm finished after {} iterations ({:.3} s, {} restarts): cost={}",
            solution.iterations, solution.elapsed_s, solution.restarts, solution.cost
        );
        Ok(solution)
    }
}

/// Run a complete swarm: `init`, `step` until it signals termination, `finalize`.
///
/// Make sure `options` carry at least one cap (`max_iters`, `max_time_s`) or a
/// reachable `cost_threshold`; otherwise the loop never ends.
pub fn minimize<C: CostFunction, R: RandomSource>(
    cost: C,
    space: SearchSpace,
    options: PsoOptions,
    rng: R,
) -> Result<PsoSolution, PsoError> {
    let mut swarm = ParticleSwarm::new(cost, space, options, rng)?;
    swarm.init();
    while swarm.step()? {}
    swarm.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnCost, RandomSource, StdRandomSource};
    use std::collections::VecDeque;

    /// Replays fixed draws in order, ignoring the requested range.
    struct Replay(VecDeque<Real>);

    impl RandomSource for Replay {
        fn scalar(&mut self, _min: Real, _max: Real) -> Real {
            self.0.pop_front().expect("replay exhausted")
        }
    }

    fn sphere(dim: usize) -> FnCost<impl Fn(&DVector<Real>) -> Real> {
        FnCost::new(dim, |x: &DVector<Real>| x.norm_squared())
    }

    fn unit_box(dim: usize) -> SearchSpace {
        SearchSpace::from_bounds(&vec![[-1.0, 1.0]; dim]).unwrap()
    }

    #[test]
    fn step_before_init_fails() {
        let mut swarm = ParticleSwarm::new(
            sphere(2),
            unit_box(2),
            PsoOptions::default(),
            StdRandomSource::seeded(0),
        )
        .unwrap();
        assert_eq!(swarm.state(), SwarmState::Uninitialized);
        assert_eq!(swarm.step(), Err(PsoError::NotInitialized));
        assert_eq!(swarm.finalize(), Err(PsoError::NotInitialized));
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let err = ParticleSwarm::new(
            sphere(3),
            unit_box(2),
            PsoOptions::default(),
            StdRandomSource::seeded(0),
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            PsoError::DimensionMismatch {
                what: "cost function",
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn init_evaluates_personal_bests_and_picks_minimum() {
        let mut swarm = ParticleSwarm::new(
            sphere(3),
            unit_box(3),
            PsoOptions::default(),
            StdRandomSource::seeded(4),
        )
        .unwrap();
        swarm.init();
        assert_eq!(swarm.state(), SwarmState::Initialized);
        assert_eq!(swarm.particles().len(), 20);
        assert_eq!(swarm.iteration(), 0);

        let min_cost = swarm
            .personal_bests()
            .iter()
            .map(|p| p.cost)
            .fold(Real::INFINITY, Real::min);
        assert!(min_cost.is_finite());
        assert_eq!(swarm.global_best().cost, min_cost);
        for (x, p) in swarm.particles().iter().zip(swarm.personal_bests()) {
            assert_eq!(x.position, p.position);
            assert!(swarm.space().contains(&x.position));
            assert!(x.velocity.amax() <= 2e-3);
        }
    }

    #[test]
    fn global_best_never_increases() {
        let mut swarm = ParticleSwarm::new(
            sphere(4),
            unit_box(4),
            PsoOptions {
                max_iters: Some(300),
                ..PsoOptions::default()
            },
            StdRandomSource::seeded(8),
        )
        .unwrap();
        swarm.init();
        let mut best = swarm.global_best().cost;
        while swarm.step().unwrap() {
            let now = swarm.global_best().cost;
            assert!(now <= best, "global best went up: {best} -> {now}");
            for (p, x) in swarm.personal_bests().iter().zip(swarm.particles()) {
                assert!(p.cost <= x.cost || x.cost.is_infinite());
                assert!(swarm.global_best().cost <= p.cost);
            }
            best = now;
        }
        assert_eq!(swarm.state(), SwarmState::Terminated);
        assert_eq!(swarm.step(), Err(PsoError::Terminated));
    }

    #[test]
    fn minimize_finds_sphere_minimum() {
        let solution = minimize(
            sphere(3),
            unit_box(3),
            PsoOptions {
                max_iters: Some(500),
                ..PsoOptions::default()
            },
            StdRandomSource::seeded(21),
        )
        .unwrap();
        assert_eq!(solution.iterations, 500);
        assert!(solution.cost < 1e-4, "cost too high: {}", solution.cost);
        assert!(solution.position.norm() < 1e-2);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut swarm = ParticleSwarm::new(
            sphere(2),
            unit_box(2),
            PsoOptions {
                max_iters: Some(20),
                ..PsoOptions::default()
            },
            StdRandomSource::seeded(2),
        )
        .unwrap();
        swarm.init();
        while swarm.step().unwrap() {}
        let a = swarm.finalize().unwrap();
        let b = swarm.finalize().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.position, swarm.global_best().position);
    }

    #[test]
    fn early_cancellation_yields_partial_result() {
        let mut swarm = ParticleSwarm::new(
            sphere(2),
            unit_box(2),
            PsoOptions::default(),
            StdRandomSource::seeded(6),
        )
        .unwrap();
        swarm.init();
        for _ in 0..5 {
            assert!(swarm.step().unwrap());
        }
        let partial = swarm.finalize().unwrap();
        assert_eq!(partial.iterations, 5);
        assert!(partial.cost.is_finite());
        assert_eq!(swarm.state(), SwarmState::Running);
    }

    #[test]
    fn ties_keep_the_first_found_best() {
        let flat = FnCost::new(2, |_: &DVector<Real>| 1.0);
        let mut swarm = ParticleSwarm::new(
            flat,
            unit_box(2),
            PsoOptions {
                num_particles: 5,
                cost_threshold: -1.0,
                ..PsoOptions::default()
            },
            StdRandomSource::seeded(12),
        )
        .unwrap();
        swarm.init();
        let first = swarm.personal_bests()[0].position.clone();
        assert_eq!(swarm.global_best().position, first);

        assert!(swarm.step().unwrap());
        assert_eq!(swarm.global_best().position, first);
        assert_eq!(swarm.personal_bests()[0].position, first);
        assert_eq!(swarm.global_best().cost, 1.0);
    }

    #[test]
    fn improvement_redirects_later_particles_in_the_same_sweep() {
        let abs = FnCost::new(1, |x: &DVector<Real>| x[0].abs());
        let space = SearchSpace::new(&[[-10.0, 10.0]], &[5.0]).unwrap();
        let draws = [
            // init: particle 0 at 4 moving by -3, particle 1 at 5 at rest
            4.0, -3.0, 5.0, 0.0,
            // step: particle 0 coasts (r1 = r2 = 0), particle 1 follows g only
            0.0, 0.0, 0.0, 1.0,
        ];
        let mut swarm = ParticleSwarm::new(
            abs,
            space,
            PsoOptions {
                num_particles: 2,
                omega: 0.8,
                phi_p: 0.1,
                phi_g: 0.5,
                cost_threshold: -1.0,
                ..PsoOptions::default()
            },
            Replay(draws.into_iter().collect()),
        )
        .unwrap();
        swarm.init();
        assert_eq!(swarm.global_best().position[0], 4.0);

        assert!(swarm.step().unwrap());
        let new_best = swarm.particles()[0].position[0];
        assert!((new_best - 1.6).abs() < 1e-12);
        assert_eq!(swarm.global_best().position[0], new_best);

        // Attracted to the best found earlier in this sweep, not the one at 4.
        let v1 = swarm.particles()[1].velocity[0];
        assert!((v1 - 0.5 * (new_best - 5.0)).abs() < 1e-12, "velocity {v1}");
        assert!((v1 - 0.5 * (4.0 - 5.0)).abs() > 0.5);
    }
}
