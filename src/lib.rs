//! # odestep: Fixed-Step Runge-Kutta Integrators
//!
//! Euler, midpoint RK2 and classical RK4 integration of systems of ordinary
//! differential equations `dx/dt = f(x, t)` with vector-valued state.
//!
//! ## Features
//!
//! - Three explicit single-step rules behind one [`Method`] selector
//! - A fixed-step driver that records the full [`Trajectory`] and clips the
//!   last step so the final sample lands exactly on the requested end time
//! - Forward and backward integration, chosen by the sign of `h`
//! - Always-on checks: dimension agreement before every combination and
//!   finiteness of every derivative evaluation and produced state
//! - Partial trajectories are returned alongside the error when a run fails
//! - Parallel batch propagation over many initial states (`parallel` feature)
//!
//! ## Basic Usage
//!
//! ```rust
//! use odestep::{Integrator, Method, OdeSystem, State};
//!
//! // Define your ODE system
//! struct HarmonicOscillator { omega: f64 }
//!
//! impl OdeSystem for HarmonicOscillator {
//!     fn rhs(&self, x: &State, _t: f64) -> State {
//!         State::from([x[1], -self.omega * self.omega * x[0]])
//!     }
//! }
//!
//! // Set up and run the integrator
//! let sys = HarmonicOscillator { omega: 1.0 };
//! let mut integrator = Integrator::new(Method::Rk4);
//!
//! let x0 = State::from([1.0, 0.0]);  // Initial conditions
//! let trajectory = integrator.integrate(&sys, &x0, 0.0, 10.0, 0.01).unwrap();
//!
//! assert_eq!(trajectory.final_time(), Some(10.0));
//! assert!((trajectory.final_state().unwrap()[0] - 10.0_f64.cos()).abs() < 1e-8);
//! ```
//!
//! Closures work as systems too:
//!
//! ```rust
//! use odestep::{integrate, Method, State};
//!
//! let f = |x: &State, t: f64| State::from([x[0] + t]);
//! let trajectory = integrate(&State::from([0.0]), 0.0, 1.0, 0.3, &f, Method::Rk2).unwrap();
//! assert_eq!(trajectory.len(), 5);
//! ```
//!
//! ## Failures
//!
//! A failing step stops the run. The [`IntegrationFailure`] holds the
//! [`OdeError`] and every sample computed before the failing step:
//!
//! ```rust
//! use odestep::{integrate, Method, OdeError, State};
//!
//! let f = |_x: &State, t: f64| State::from([if t < 0.5 { 1.0 } else { f64::INFINITY }]);
//! let failure = integrate(&State::from([0.0]), 0.0, 1.0, 0.25, &f, Method::Euler).unwrap_err();
//!
//! assert!(matches!(failure.error, OdeError::NumericDomain { .. }));
//! assert_eq!(failure.trajectory.final_time(), Some(0.5));
//! ```
//!
//! ## Choosing a Method
//!
//! | Method          | Evaluations/step | Global order | Error ratio when halving `h` |
//! |-----------------|------------------|--------------|------------------------------|
//! | [`Method::Euler`] | 1              | 1            | ~2                           |
//! | [`Method::Rk2`]   | 2              | 2            | ~4                           |
//! | [`Method::Rk4`]   | 4              | 4            | ~16                          |
//!
//! ## Cargo features
//!
//! | Feature    | Default | Description |
//! |------------|---------|-------------|
//! | `parallel` | yes     | [`BatchIntegrator`] via `rayon` |
//! | `serde`    | no      | `Serialize`/`Deserialize` for [`State`], [`Trajectory`], [`Method`], [`Settings`] |
//!
//! ## Logging
//!
//! Integration start, finish and failures are reported through the `log`
//! facade at `debug` and `warn` level. Install any `log` backend to see them.

#![deny(missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "parallel")]
pub mod batch;
pub mod coefficients;
pub mod error;
pub mod integrator;
pub mod policy;
pub mod state;
pub mod stepper;
pub mod system;
pub mod trajectory;

#[cfg(feature = "parallel")]
pub use batch::{BatchIntegrator, BatchResult};
pub use error::{IntegrationFailure, OdeError, Stage};
pub use integrator::{integrate, Integrator, Settings, Stats};
pub use state::{add, add_scaled, scale, State};
pub use stepper::{euler_step, rk2_step, rk4_step, Method, ParseMethodError};
pub use system::OdeSystem;
pub use trajectory::Trajectory;
