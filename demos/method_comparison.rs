//! Observed order of accuracy for Euler, RK2 and RK4.
//!
//! Integrates x' = -x, x(0) = 1 over [0, 1] at successively halved step sizes
//! and prints the global error and the ratio between consecutive errors
//! (expect ~2, ~4 and ~16).
//!
//! Run with:
//!   cargo run --example method_comparison

use odestep::{integrate, Method, State};

fn main() {
    let decay = |x: &State, _t: f64| State::from([-x[0]]);
    let exact = (-1.0_f64).exp();
    let step_sizes = [0.2, 0.1, 0.05, 0.025, 0.0125];

    for method in Method::ALL {
        println!("{method} (order {}, {} evals/step)", method.order(), method.stages());

        let mut previous: Option<f64> = None;
        for &h in &step_sizes {
            let trajectory = match integrate(&State::from([1.0]), 0.0, 1.0, h, &decay, method) {
                Ok(trajectory) => trajectory,
                Err(failure) => {
                    println!("  h = {h:<7} {failure}");
                    break;
                }
            };
            let Some(x) = trajectory.final_state() else {
                break;
            };
            let err = (x[0] - exact).abs();
            match previous {
                Some(prev) => println!("  h = {h:<7} err = {err:.3e}   ratio = {:.2}", prev / err),
                None => println!("  h = {h:<7} err = {err:.3e}"),
            }
            previous = Some(err);
        }
        println!();
    }
}
