use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use odestep::{BatchIntegrator, Integrator, Method, OdeSystem, State};

/// Two-body problem (6-state)
struct TwoBody {
    mu: f64,
}

impl OdeSystem for TwoBody {
    fn rhs(&self, x: &State, _t: f64) -> State {
        let r = (x[0] * x[0] + x[1] * x[1] + x[2] * x[2]).sqrt();
        let r3 = r * r * r;
        let mu_r3 = self.mu / r3;

        State::from([
            x[3],
            x[4],
            x[5],
            -mu_r3 * x[0],
            -mu_r3 * x[1],
            -mu_r3 * x[2],
        ])
    }
}

/// Harmonic oscillator (2-state)
struct HarmonicOscillator {
    omega: f64,
}

impl OdeSystem for HarmonicOscillator {
    fn rhs(&self, x: &State, _t: f64) -> State {
        State::from([x[1], -self.omega * self.omega * x[0]])
    }
}

fn bench_circular_orbit_1period(c: &mut Criterion) {
    let mu: f64 = 398600.4418;
    let r0: f64 = 6878.0;
    let v0 = (mu / r0).sqrt();
    let x0 = State::from([r0, 0.0, 0.0, 0.0, v0, 0.0]);
    let period = 2.0 * std::f64::consts::PI * (r0.powi(3) / mu).sqrt();
    let sys = TwoBody { mu };

    let mut group = c.benchmark_group("circular_orbit_1period");
    for method in Method::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(method), &method, |b, &method| {
            b.iter(|| {
                let mut integrator = Integrator::new(method);
                integrator
                    .integrate(&sys, black_box(&x0), 0.0, period, 10.0)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_harmonic_oscillator_1period(c: &mut Criterion) {
    let x0 = State::from([1.0, 0.0]);
    let period = 2.0 * std::f64::consts::PI;
    let sys = HarmonicOscillator { omega: 1.0 };

    c.bench_function("harmonic_oscillator_1period_rk4", |b| {
        b.iter(|| {
            let mut integrator = Integrator::new(Method::Rk4);
            integrator
                .integrate(&sys, black_box(&x0), 0.0, period, 0.01)
                .unwrap()
        })
    });
}

fn bench_batch_sweep(c: &mut Criterion) {
    let sys = HarmonicOscillator { omega: 1.0 };
    let initial: Vec<State> = (0..256)
        .map(|i| State::from([1.0 + i as f64 * 0.01, 0.0]))
        .collect();
    let period = 2.0 * std::f64::consts::PI;
    let batch = BatchIntegrator::new(Method::Rk4);

    c.bench_function("harmonic_oscillator_batch_256", |b| {
        b.iter(|| batch.integrate(&sys, black_box(&initial), 0.0, period, 0.01))
    });
}

criterion_group!(
    benches,
    bench_circular_orbit_1period,
    bench_harmonic_oscillator_1period,
    bench_batch_sweep
);
criterion_main!(benches);
