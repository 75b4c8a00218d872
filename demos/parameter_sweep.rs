//! Parallel sweep over initial conditions.
//!
//! Propagates a grid of damped pendulum initial angles in parallel and
//! reports the angle each one settles to after 20 s.
//!
//! Run with:
//!   cargo run --example parameter_sweep

use odestep::{BatchIntegrator, Method, OdeSystem, State};

/// Damped pendulum: θ'' = -(g/L) sin θ - c θ'
///
/// State vector: [θ, θ']
struct DampedPendulum {
    g_over_l: f64,
    damping: f64,
}

impl OdeSystem for DampedPendulum {
    fn rhs(&self, x: &State, _t: f64) -> State {
        State::from([x[1], -self.g_over_l * x[0].sin() - self.damping * x[1]])
    }
}

fn main() {
    let sys = DampedPendulum {
        g_over_l: 9.81,
        damping: 0.5,
    };

    let initial: Vec<State> = (0..16)
        .map(|i| State::from([0.2 * i as f64, 0.0]))
        .collect();

    let batch = BatchIntegrator::new(Method::Rk4);
    let (results, stats) = batch.integrate(&sys, &initial, 0.0, 20.0, 0.005);

    println!("Damped pendulum sweep ({} trajectories)", initial.len());
    for (x0, result) in initial.iter().zip(&results) {
        match result {
            Ok(trajectory) => {
                if let Some(xf) = trajectory.final_state() {
                    println!("  θ0 = {:5.2} rad  ->  θ(20) = {:+.3e} rad", x0[0], xf[0]);
                }
            }
            Err(failure) => println!("  θ0 = {:5.2} rad  ->  {}", x0[0], failure),
        }
    }
    println!();
    println!("  Total steps:          {}", stats.steps);
    println!("  Total function evals: {}", stats.fn_evals);
}
