use eyecal_core::Real;
use eyecal_optim::{
    minimize, FnCost, ParticleSwarm, PsoOptions, RandomSource, SearchSpace, StdRandomSource,
    SwarmState,
};
use nalgebra::DVector;

fn sphere(dim: usize) -> FnCost<impl Fn(&DVector<Real>) -> Real> {
    FnCost::new(dim, |x: &DVector<Real>| x.norm_squared())
}

fn shifted_rosenbrock() -> FnCost<impl Fn(&DVector<Real>) -> Real> {
    FnCost::new(2, |x: &DVector<Real>| {
        let (a, b) = (x[0] - 0.5, x[1] - 0.25);
        (1.0 - a).powi(2) + 100.0 * (b - a * a).powi(2)
    })
}

/// Returns the interval midpoint for the first `scripted` draws, then delegates.
struct MidpointThenRandom {
    scripted: usize,
    inner: StdRandomSource,
}

impl RandomSource for MidpointThenRandom {
    fn scalar(&mut self, min: Real, max: Real) -> Real {
        if self.scripted > 0 {
            self.scripted -= 1;
            0.5 * (min + max)
        } else {
            self.inner.scalar(min, max)
        }
    }
}

#[test]
fn particles_never_leave_the_bounds() {
    let bounds = [[-0.5, 0.2], [0.0, 1.0], [-3.0, -2.0]];
    let space = SearchSpace::new(&bounds, &[0.5, 0.5, 0.5]).unwrap();
    let cost = FnCost::new(3, |x: &DVector<Real>| (x[0] - 5.0).powi(2) + x[1] + x[2].abs());
    let options = PsoOptions {
        max_iters: Some(300),
        omega: 0.9,
        phi_p: 1.5,
        phi_g: 1.5,
        ..PsoOptions::default()
    };
    let mut swarm = ParticleSwarm::new(cost, space.clone(), options, StdRandomSource::seeded(5))
        .unwrap();
    swarm.init();
    loop {
        for particle in swarm.particles() {
            assert!(space.contains(&particle.position), "{:?}", particle.position);
        }
        assert!(space.contains(&swarm.global_best().position));
        if !swarm.step().unwrap() {
            break;
        }
    }
    // The minimum sits on the boundary.
    assert!((swarm.global_best().position[0] - 0.2).abs() < 1e-3);
}

#[test]
fn iteration_cap_stops_exactly() {
    let mut swarm = ParticleSwarm::new(
        sphere(2),
        SearchSpace::from_bounds(&[[-1.0, 1.0]; 2]).unwrap(),
        PsoOptions {
            max_iters: Some(5),
            cost_threshold: -1.0,
            ..PsoOptions::default()
        },
        StdRandomSource::seeded(1),
    )
    .unwrap();
    swarm.init();
    for _ in 0..4 {
        assert!(swarm.step().unwrap());
    }
    assert!(!swarm.step().unwrap());
    assert_eq!(swarm.state(), SwarmState::Terminated);
    assert_eq!(swarm.finalize().unwrap().iterations, 5);
}

#[test]
fn cost_threshold_stops_first_step() {
    let mut swarm = ParticleSwarm::new(
        sphere(2),
        SearchSpace::from_bounds(&[[-1.0, 1.0]; 2]).unwrap(),
        PsoOptions {
            cost_threshold: 1e6,
            ..PsoOptions::default()
        },
        StdRandomSource::seeded(1),
    )
    .unwrap();
    swarm.init();
    assert!(!swarm.step().unwrap());
    assert_eq!(swarm.iteration(), 1);
}

#[test]
fn time_cap_stops_first_step() {
    let mut swarm = ParticleSwarm::new(
        sphere(2),
        SearchSpace::from_bounds(&[[-1.0, 1.0]; 2]).unwrap(),
        PsoOptions {
            max_time_s: Some(0.0),
            cost_threshold: -1.0,
            ..PsoOptions::default()
        },
        StdRandomSource::seeded(1),
    )
    .unwrap();
    swarm.init();
    assert!(!swarm.step().unwrap());
}

#[test]
fn collapsed_swarm_is_rescattered_without_losing_the_best() {
    let num_particles = 8;
    let dim = 6;
    // Initialization draws one position and one velocity per coordinate.
    let rng = MidpointThenRandom {
        scripted: num_particles * 2 * dim,
        inner: StdRandomSource::seeded(17),
    };
    let mut swarm = ParticleSwarm::new(
        sphere(dim),
        SearchSpace::from_bounds(&[[-1.0, 1.0]; 6]).unwrap(),
        PsoOptions {
            num_particles,
            max_iters: Some(150),
            cost_threshold: -1.0,
            ..PsoOptions::default()
        },
        rng,
    )
    .unwrap();
    swarm.init();
    assert_eq!(swarm.global_best().cost, 0.0);

    for _ in 0..99 {
        assert!(swarm.step().unwrap());
        assert_eq!(swarm.spread(), 0.0);
        assert_eq!(swarm.restarts(), 0);
    }

    assert!(swarm.step().unwrap());
    assert_eq!(swarm.iteration(), 100);
    assert_eq!(swarm.restarts(), 1);
    assert!(swarm.spread() > 0.005, "spread {}", swarm.spread());
    assert_eq!(swarm.global_best().cost, 0.0);
    assert_eq!(swarm.global_best().position, DVector::zeros(dim));
    // Personal bests survive the re-scatter.
    for best in swarm.personal_bests() {
        assert_eq!(best.cost, 0.0);
    }
}

#[test]
fn global_best_is_monotone_on_rosenbrock() {
    let mut swarm = ParticleSwarm::new(
        shifted_rosenbrock(),
        SearchSpace::from_bounds(&[[-2.0, 2.0]; 2]).unwrap(),
        PsoOptions {
            num_particles: 30,
            max_iters: Some(400),
            omega: 0.72,
            phi_p: 1.49,
            phi_g: 1.49,
            ..PsoOptions::default()
        },
        StdRandomSource::seeded(3),
    )
    .unwrap();
    swarm.init();
    let mut last = swarm.global_best().cost;
    while swarm.step().unwrap() {
        let now = swarm.global_best().cost;
        assert!(now <= last);
        last = now;
    }
    let best = swarm.finalize().unwrap();
    assert!(best.cost < 1e-2, "cost {}", best.cost);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed| {
        minimize(
            sphere(4),
            SearchSpace::from_bounds(&[[-3.0, 3.0]; 4]).unwrap(),
            PsoOptions {
                max_iters: Some(200),
                ..PsoOptions::default()
            },
            StdRandomSource::seeded(seed),
        )
        .unwrap()
    };
    let a = run(99);
    let b = run(99);
    assert_eq!(a.position, b.position);
    assert_eq!(a.cost, b.cost);
    assert_eq!(a.iterations, 200);
}
