//! Harmonic oscillator with every fixed-step method.
//!
//! Integrates x'' + ω²x = 0 over one period with a step that does not divide
//! the period evenly, so the last step is clipped to land on T. Prints the
//! tail of the time grid and the error of each method against cos(ωt).
//!
//! Run with:
//!   cargo run --example harmonic_oscillator

use odestep::{Integrator, Method, OdeSystem, State};

/// x'' + ω²x = 0 as the first-order system [x, x']
struct HarmonicOscillator {
    omega: f64,
}

impl OdeSystem for HarmonicOscillator {
    fn rhs(&self, x: &State, _t: f64) -> State {
        State::from([x[1], -self.omega * self.omega * x[0]])
    }
}

fn main() {
    let omega = 2.0;
    let sys = HarmonicOscillator { omega };
    let period = std::f64::consts::TAU / omega;
    let h = 0.05;
    let x0 = State::from([1.0, 0.0]);

    println!("Harmonic oscillator, ω = {omega}, T = {period:.6}, h = {h}");

    let mut grid_shown = false;
    for method in Method::ALL {
        let mut integrator = Integrator::new(method);
        let trajectory = match integrator.integrate(&sys, &x0, 0.0, period, h) {
            Ok(trajectory) => trajectory,
            Err(failure) => {
                println!("  {method}: {failure}");
                continue;
            }
        };

        if !grid_shown {
            let times = trajectory.times();
            let n = times.len();
            println!("  {} samples; last three times:", n);
            for t in &times[n.saturating_sub(3)..] {
                println!("    {t:.15}");
            }
            if let [.., before, last] = times {
                println!("  clipped last step: {:.6} (h = {h})", last - before);
            }
            println!();
            grid_shown = true;
        }

        let Some((tf, xf)) = trajectory.last() else {
            continue;
        };
        let x_err = (xf[0] - (omega * tf).cos()).abs();
        let v_err = (xf[1] + omega * (omega * tf).sin()).abs();
        println!(
            "  {:<5} x error {:.2e}   x' error {:.2e}   {} evals",
            method.name(),
            x_err,
            v_err,
            integrator.stats.fn_evals
        );
    }
}
