//! Two-body Keplerian orbit: energy drift by method.
//!
//! Propagates a circular LEO orbit for one period with each fixed-step
//! method and reports how far the spacecraft ends from its starting point
//! and how much orbital energy drifted.
//!
//! Run with:
//!   cargo run --example two_body_orbit

use odestep::{Integrator, Method, OdeSystem, State};

/// Keplerian two-body problem: d²r/dt² = -μ r / |r|³
///
/// State vector: [x, y, z, vx, vy, vz]  (km, km/s)
struct TwoBody {
    mu: f64,
}

impl OdeSystem for TwoBody {
    fn rhs(&self, x: &State, _t: f64) -> State {
        let r2 = x[0] * x[0] + x[1] * x[1] + x[2] * x[2];
        let r = r2.sqrt();
        let mu_r3 = self.mu / (r2 * r);

        State::from([
            // dr/dt = v
            x[3],
            x[4],
            x[5],
            // dv/dt = -μ r / |r|³
            -mu_r3 * x[0],
            -mu_r3 * x[1],
            -mu_r3 * x[2],
        ])
    }
}

fn energy(mu: f64, x: &State) -> f64 {
    let r = (x[0] * x[0] + x[1] * x[1] + x[2] * x[2]).sqrt();
    let v2 = x[3] * x[3] + x[4] * x[4] + x[5] * x[5];
    0.5 * v2 - mu / r
}

fn main() {
    let mu = 398600.4418; // Earth μ (km³/s²)
    let sys = TwoBody { mu };

    // Circular orbit at 400 km altitude
    let earth_radius = 6378.137; // km
    let r0 = earth_radius + 400.0;
    let v0 = (mu / r0).sqrt(); // circular velocity

    let x0 = State::from([r0, 0.0, 0.0, 0.0, v0, 0.0]);

    // Orbital period: T = 2π √(a³/μ)
    let period = 2.0 * std::f64::consts::PI * (r0.powi(3) / mu).sqrt();
    let h = 10.0; // s

    println!("Two-Body Circular Orbit");
    println!("  Altitude:  400 km");
    println!("  Radius:    {r0:.3} km");
    println!("  Velocity:  {v0:.6} km/s");
    println!("  Period:    {:.1} s ({:.1} min)", period, period / 60.0);
    println!("  Step:      {h} s");
    println!();

    let e0 = energy(mu, &x0);
    for method in Method::ALL {
        let mut integrator = Integrator::new(method);
        let trajectory = match integrator.integrate(&sys, &x0, 0.0, period, h) {
            Ok(trajectory) => trajectory,
            Err(failure) => {
                println!("  {method}: {failure}");
                continue;
            }
        };
        let Some(xf) = trajectory.final_state() else {
            continue;
        };

        let ef = energy(mu, xf);
        let pos_err =
            ((xf[0] - x0[0]).powi(2) + (xf[1] - x0[1]).powi(2) + (xf[2] - x0[2]).powi(2)).sqrt();

        println!("  {method}:");
        println!("    Position error (return to start): {pos_err:.2e} km");
        println!("    Relative energy drift:            {:.2e}", ((ef - e0) / e0).abs());
        println!("    Function evals:                   {}", integrator.stats.fn_evals);
    }
}
