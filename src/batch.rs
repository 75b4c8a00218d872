//! Parallel batch integration over many initial states.
//!
//! Each initial state gets its own [`Integrator`] and trajectory; nothing
//! mutable is shared between runs, so the sweep parallelizes with no
//! coordination beyond rayon's work stealing. Use this for parameter sweeps
//! and Monte Carlo ensembles where every member shares one derivative
//! function.
//!
//! Enabled by the `parallel` feature (on by default).

use log::debug;
use rayon::prelude::*;

use crate::error::IntegrationFailure;
use crate::integrator::{Integrator, Settings, Stats};
use crate::state::State;
use crate::stepper::Method;
use crate::system::OdeSystem;
use crate::trajectory::Trajectory;

/// Outcome of one member of a batch
pub type BatchResult = Result<Trajectory, IntegrationFailure>;

/// Propagates a batch of initial states across the same interval.
///
/// # Example
/// ```
/// use odestep::{BatchIntegrator, Method, State};
///
/// let decay = |x: &State, _t: f64| State::from([-x[0]]);
/// let batch = BatchIntegrator::new(Method::Rk4);
///
/// let initial: Vec<State> = (1..=4).map(|i| State::scalar(i as f64)).collect();
/// let (results, stats) = batch.integrate(&decay, &initial, 0.0, 1.0, 0.1);
///
/// assert_eq!(results.len(), 4);
/// assert!(results.iter().all(|r| r.is_ok()));
/// assert_eq!(stats.steps, 40);
/// ```
#[derive(Debug, Clone)]
pub struct BatchIntegrator {
    method: Method,
    settings: Settings,
}

impl BatchIntegrator {
    /// Create a batch integrator with default settings
    pub fn new(method: Method) -> Self {
        Self::with_settings(method, Settings::default())
    }

    /// Create a batch integrator with explicit settings
    pub fn with_settings(method: Method, settings: Settings) -> Self {
        Self { method, settings }
    }

    /// Integrate every initial state from `t0` to `t_end` with step size `h`.
    ///
    /// # Returns
    /// `(results, stats)`: one result per initial state, in input order, and
    /// the statistics summed over the whole batch
    pub fn integrate<S>(
        &self,
        sys: &S,
        initial_states: &[State],
        t0: f64,
        t_end: f64,
        h: f64,
    ) -> (Vec<BatchResult>, Stats)
    where
        S: OdeSystem + Sync + ?Sized,
    {
        debug!(
            "batch of {} trajectories with {} on {} threads",
            initial_states.len(),
            self.method,
            rayon::current_num_threads()
        );

        let runs: Vec<(BatchResult, Stats)> = initial_states
            .par_iter()
            .map(|x0| {
                let mut integrator = Integrator::with_settings(self.method, self.settings.clone());
                let result = integrator.integrate(sys, x0, t0, t_end, h);
                (result, integrator.stats)
            })
            .collect();

        let mut total = Stats::default();
        let results = runs
            .into_iter()
            .map(|(result, stats)| {
                total.fn_evals += stats.fn_evals;
                total.steps += stats.steps;
                result
            })
            .collect();
        (results, total)
    }
}
