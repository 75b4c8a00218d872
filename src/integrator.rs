//! Fixed-step integration driver
//!
//! Repeatedly applies one of the steppers across `[t0, t_end]`, recording
//! every sample in a [`Trajectory`]. The final step is clipped so the last
//! sample lands exactly on `t_end`.

use std::cell::Cell;

use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{IntegrationFailure, OdeError};
use crate::state::State;
use crate::stepper::Method;
use crate::system::OdeSystem;
use crate::trajectory::Trajectory;

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total number of derivative evaluations
    pub fn_evals: u64,
    /// Number of completed steps
    pub steps: u64,
}

/// Driver configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Settings {
    /// Maximum number of steps a single integration may take
    pub max_steps: u64,
    /// Relative tolerance for treating `|t_end - t0| / |h|` as a whole number
    /// of steps. Sized for rounding in the ratio only; a span that genuinely
    /// overshoots a multiple of `h` still gets its short last step.
    pub snap_tolerance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_steps: 10_000_000,
            snap_tolerance: 1e-12,
        }
    }
}

impl Settings {
    fn validate(&self) -> Result<(), OdeError> {
        if self.max_steps == 0 {
            return Err(OdeError::invalid_input("max_steps must be positive"));
        }
        if !self.snap_tolerance.is_finite() || !(0.0..0.5).contains(&self.snap_tolerance) {
            return Err(OdeError::invalid_input(
                "snap_tolerance must be finite and in [0, 0.5)",
            ));
        }
        Ok(())
    }
}

/// Fixed-step ODE integrator
///
/// # Example
/// ```
/// use odestep::{Integrator, Method, State};
///
/// // dx/dt = -x, x(0) = 1
/// let decay = |x: &State, _t: f64| State::from([-x[0]]);
/// let mut integrator = Integrator::new(Method::Rk4);
///
/// let trajectory = integrator
///     .integrate(&decay, &State::from([1.0]), 0.0, 1.0, 0.3)
///     .unwrap();
///
/// assert_eq!(trajectory.len(), 5);
/// assert_eq!(trajectory.final_time(), Some(1.0));
/// assert!((trajectory.final_state().unwrap()[0] - (-1.0_f64).exp()).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct Integrator {
    method: Method,
    settings: Settings,
    /// Integration statistics, accumulated until [`reset_stats`](Self::reset_stats)
    pub stats: Stats,
}

impl Integrator {
    /// Create an integrator with default settings
    pub fn new(method: Method) -> Self {
        Self::with_settings(method, Settings::default())
    }

    /// Create an integrator with explicit settings
    pub fn with_settings(method: Method, settings: Settings) -> Self {
        Self {
            method,
            settings,
            stats: Stats::default(),
        }
    }

    /// Stepping method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Driver configuration
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    /// Integrate from `t0` to `t_end` with step size `h`
    ///
    /// # Arguments
    /// * `sys` - The ODE system to integrate
    /// * `x0` - Initial state
    /// * `t0` - Initial time
    /// * `t_end` - Final time
    /// * `h` - Step size; its sign must match `t_end - t0`
    ///
    /// # Returns
    /// * `Ok(trajectory)` with `ceil(|t_end - t0| / |h|) + 1` samples, the
    ///   last at exactly `t_end`
    /// * `Err(IntegrationFailure)` carrying the first error and the samples
    ///   computed before it
    pub fn integrate<S>(
        &mut self,
        sys: &S,
        x0: &State,
        t0: f64,
        t_end: f64,
        h: f64,
    ) -> Result<Trajectory, IntegrationFailure>
    where
        S: OdeSystem + ?Sized,
    {
        let reject = |error: OdeError| IntegrationFailure::new(error, Trajectory::new(x0.dim()));

        self.validate_inputs(x0, t0, t_end, h).map_err(reject)?;
        let steps = if t_end == t0 {
            0
        } else {
            self.step_count(t0, t_end, h).map_err(reject)?
        };

        debug!(
            "integrating {} steps with {} from t = {} to t = {} (h = {}, n = {})",
            steps,
            self.method,
            t0,
            t_end,
            h,
            x0.dim()
        );

        let mut trajectory = Trajectory::with_capacity(x0.dim(), steps as usize + 1);
        if let Err(error) = trajectory.push(t0, x0.clone()) {
            return Err(IntegrationFailure::new(error, trajectory));
        }

        let counted = Counted::new(sys);
        let result = self.run(&counted, x0, &mut trajectory, t0, t_end, h, steps);
        self.stats.fn_evals += counted.evals();

        match result {
            Ok(()) => {
                debug!(
                    "integration finished at t = {} after {} evaluations",
                    t_end,
                    counted.evals()
                );
                Ok(trajectory)
            }
            Err(error) => {
                warn!(
                    "integration stopped after {} of {} steps: {}",
                    trajectory.len() - 1,
                    steps,
                    error
                );
                Err(IntegrationFailure::new(error, trajectory))
            }
        }
    }

    /// Integrate from `t0` to `t_end` in `steps` equal steps.
    ///
    /// The step size is `(t_end - t0) / steps`; the trajectory holds
    /// `steps + 1` samples.
    pub fn integrate_steps<S>(
        &mut self,
        sys: &S,
        x0: &State,
        t0: f64,
        t_end: f64,
        steps: u64,
    ) -> Result<Trajectory, IntegrationFailure>
    where
        S: OdeSystem + ?Sized,
    {
        if steps == 0 {
            return Err(IntegrationFailure::new(
                OdeError::invalid_input("step count must be positive"),
                Trajectory::new(x0.dim()),
            ));
        }
        let h = if t_end == t0 {
            1.0
        } else {
            (t_end - t0) / steps as f64
        };
        self.integrate(sys, x0, t0, t_end, h)
    }

    #[allow(clippy::too_many_arguments)]
    fn run<S>(
        &mut self,
        sys: &S,
        x0: &State,
        trajectory: &mut Trajectory,
        t0: f64,
        t_end: f64,
        h: f64,
        steps: u64,
    ) -> Result<(), OdeError>
    where
        S: OdeSystem + ?Sized,
    {
        let mut t = t0;
        let mut x = x0.clone();

        for k in 1..=steps {
            // Interior samples sit on the grid t0 + k*h; the last one is
            // clipped onto t_end
            let (t_next, h_k) = if k == steps {
                (t_end, t_end - t)
            } else {
                (t0 + k as f64 * h, h)
            };

            x = self.method.step(sys, &x, t, h_k)?;
            trajectory.push(t_next, x.clone())?;
            t = t_next;
            self.stats.steps += 1;
        }
        Ok(())
    }

    /// Number of steps needed to cover `[t0, t_end]` with step size `h`
    fn step_count(&self, t0: f64, t_end: f64, h: f64) -> Result<u64, OdeError> {
        let ratio = (t_end - t0) / h;
        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() <= self.settings.snap_tolerance * nearest.max(1.0) {
            nearest.max(1.0)
        } else {
            ratio.ceil()
        };

        if !steps.is_finite() || steps > self.settings.max_steps as f64 {
            return Err(OdeError::MaxStepsExceeded {
                required: if steps.is_finite() { steps as u64 } else { u64::MAX },
                limit: self.settings.max_steps,
            });
        }

        // The last interior grid time must fall strictly before t_end
        let mut steps = steps as u64;
        while steps > 1 && (t_end - (t0 + (steps - 1) as f64 * h)) * h.signum() <= 0.0 {
            steps -= 1;
        }
        Ok(steps)
    }

    /// Validate integration inputs
    fn validate_inputs(&self, x0: &State, t0: f64, t_end: f64, h: f64) -> Result<(), OdeError> {
        self.settings.validate()?;
        if !t0.is_finite() || !t_end.is_finite() || !h.is_finite() {
            return Err(OdeError::invalid_input("t0, t_end, and h must be finite"));
        }
        if x0.dim() == 0 {
            return Err(OdeError::invalid_input(
                "initial state must have at least one component",
            ));
        }
        if let Some(i) = x0.first_non_finite() {
            return Err(OdeError::invalid_input(format!("x0[{}] is not finite", i)));
        }
        let span = t_end - t0;
        if h == 0.0 || (span != 0.0 && h.signum() != span.signum()) {
            return Err(OdeError::InvalidDirection { h, span });
        }
        Ok(())
    }
}

/// Integrate `f` from `t0` to `t_end` with step size `h` using `method`.
///
/// Shorthand for [`Integrator::integrate`] with default settings.
///
/// ```
/// use odestep::{integrate, Method, State};
///
/// let f = |_x: &State, _t: f64| State::from([2.0]);
/// let trajectory = integrate(&State::from([1.0]), 0.0, 1.0, 0.25, &f, Method::Euler).unwrap();
/// assert_eq!(trajectory.final_state(), Some(&State::from([3.0])));
/// ```
pub fn integrate<S>(
    x0: &State,
    t0: f64,
    t_end: f64,
    h: f64,
    sys: &S,
    method: Method,
) -> Result<Trajectory, IntegrationFailure>
where
    S: OdeSystem + ?Sized,
{
    Integrator::new(method).integrate(sys, x0, t0, t_end, h)
}

/// Wraps a system and counts derivative evaluations
struct Counted<'a, S: ?Sized> {
    inner: &'a S,
    evals: Cell<u64>,
}

impl<'a, S: OdeSystem + ?Sized> Counted<'a, S> {
    fn new(inner: &'a S) -> Self {
        Self {
            inner,
            evals: Cell::new(0),
        }
    }

    fn evals(&self) -> u64 {
        self.evals.get()
    }
}

impl<S: OdeSystem + ?Sized> OdeSystem for Counted<'_, S> {
    fn rhs(&self, x: &State, t: f64) -> State {
        self.evals.set(self.evals.get() + 1);
        self.inner.rhs(x, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::state::scale;
    use approx::assert_relative_eq;

    /// Harmonic oscillator: x'' + ω²x = 0
    /// State: [x, x']
    struct HarmonicOscillator {
        omega: f64,
    }

    impl OdeSystem for HarmonicOscillator {
        fn rhs(&self, x: &State, _t: f64) -> State {
            State::from([x[1], -self.omega * self.omega * x[0]])
        }
    }

    fn decay(x: &State, _t: f64) -> State {
        scale(x, -1.0)
    }

    #[test]
    fn test_harmonic_oscillator() {
        let sys = HarmonicOscillator { omega: 1.0 };
        let tf = 2.0 * std::f64::consts::PI;

        let mut integrator = Integrator::new(Method::Rk4);
        let traj = integrator
            .integrate(&sys, &State::from([1.0, 0.0]), 0.0, tf, 0.001)
            .unwrap();

        let (t_final, x_final) = traj.last().unwrap();
        assert_eq!(t_final, tf);
        assert!((x_final[0] - 1.0).abs() < 1e-10, "x(2π) = {}", x_final[0]);
        assert!(x_final[1].abs() < 1e-10, "x'(2π) = {}", x_final[1]);
    }

    #[test]
    fn test_clipped_final_step() {
        let traj = integrate(&State::scalar(1.0), 0.0, 1.0, 0.3, &decay, Method::Rk4).unwrap();

        assert_eq!(traj.len(), 5);
        assert_eq!(traj.final_time(), Some(1.0));
        assert_relative_eq!(traj.times()[1], 0.3);
        assert_relative_eq!(traj.times()[3], 0.9, max_relative = 1e-15);
    }

    #[test]
    fn test_sample_count_formula() {
        for &(t_end, h) in &[(1.0, 0.1), (1.0, 0.3), (2.5, 0.5), (1.0, 0.07), (10.0, 1.0)] {
            let traj = integrate(&State::scalar(1.0), 0.0, t_end, h, &decay, Method::Euler).unwrap();
            let expected = (t_end / h - 1e-12_f64).ceil() as usize + 1;
            assert_eq!(traj.len(), expected, "t_end = {}, h = {}", t_end, h);
            assert_eq!(traj.final_time(), Some(t_end));
        }
    }

    #[test]
    fn test_span_just_past_grid_gets_short_last_step() {
        let f = |_x: &State, _t: f64| State::scalar(1.0);
        let traj = integrate(&State::scalar(0.0), 0.0, 1000.0000001, 0.5, &f, Method::Euler).unwrap();

        assert_eq!(traj.len(), 2002);
        assert_eq!(traj.times()[2000], 1000.0);
        assert_eq!(traj.final_time(), Some(1000.0000001));

        let last_step = traj.times()[2001] - traj.times()[2000];
        assert!(last_step > 0.0 && last_step < 1e-6, "last step {}", last_step);
        for w in traj.times().windows(2) {
            assert!(w[1] - w[0] <= 0.5);
        }
    }

    #[test]
    fn test_ratio_rounding_is_snapped() {
        // 0.3 / 0.1 evaluates to 2.9999999999999996
        let traj = integrate(&State::scalar(0.0), 0.0, 0.3, 0.1, &decay, Method::Euler).unwrap();
        assert_eq!(traj.len(), 4);
        assert_eq!(traj.final_time(), Some(0.3));
    }

    #[test]
    fn test_grid_does_not_drift() {
        // 0.1 is inexact in binary; accumulating it would drift off the grid
        let traj = integrate(&State::scalar(0.0), 0.0, 100.0, 0.1, &decay, Method::Euler).unwrap();
        assert_eq!(traj.len(), 1001);
        assert_eq!(traj.times()[500], 50.0);
    }

    #[test]
    fn test_backward_integration() {
        let sys = HarmonicOscillator { omega: 1.0 };
        let tf = 2.0 * std::f64::consts::PI;

        let traj = integrate(&State::from([1.0, 0.0]), tf, 0.0, -0.01, &sys, Method::Rk4).unwrap();

        assert_eq!(traj.final_time(), Some(0.0));
        assert_eq!(traj.direction(), Some(-1.0));
        let x = traj.final_state().unwrap();
        assert!((x[0] - 1.0).abs() < 1e-8, "x(0) = {}", x[0]);
        assert!(x[1].abs() < 1e-8, "x'(0) = {}", x[1]);
    }

    #[test]
    fn test_wrong_direction_rejected() {
        let err = integrate(&State::scalar(1.0), 1.0, 0.0, 0.1, &decay, Method::Rk4).unwrap_err();
        assert_eq!(err.error, OdeError::InvalidDirection { h: 0.1, span: -1.0 });
        assert!(err.trajectory.is_empty());
    }

    #[test]
    fn test_zero_step_rejected() {
        let err = integrate(&State::scalar(1.0), 0.0, 1.0, 0.0, &decay, Method::Euler).unwrap_err();
        assert!(matches!(err.error, OdeError::InvalidDirection { .. }));
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let x0 = State::scalar(1.0);
        for (t0, t_end, h) in [(f64::NAN, 1.0, 0.1), (0.0, f64::INFINITY, 0.1), (0.0, 1.0, f64::NAN)] {
            let err = integrate(&x0, t0, t_end, h, &decay, Method::Rk4).unwrap_err();
            assert!(matches!(err.error, OdeError::InvalidInput { .. }));
        }
        let err = integrate(&State::from([f64::NAN]), 0.0, 1.0, 0.1, &decay, Method::Rk4)
            .unwrap_err();
        assert!(matches!(err.error, OdeError::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_state_rejected() {
        let f = |x: &State, _t: f64| x.clone();
        let err = integrate(&State::zeros(0), 0.0, 1.0, 0.1, &f, Method::Rk4).unwrap_err();
        assert!(matches!(err.error, OdeError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_length_integration() {
        let mut integrator = Integrator::new(Method::Rk4);
        let traj = integrator
            .integrate(&decay, &State::scalar(42.0), 5.0, 5.0, 0.1)
            .unwrap();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.last(), Some((5.0, &State::scalar(42.0))));
        assert_eq!(integrator.stats, Stats::default());
    }

    #[test]
    fn test_dimension_mismatch_keeps_partial_trajectory() {
        // Correct dimension until t reaches 0.5, then the wrong one
        let f = |x: &State, t: f64| {
            if t < 0.45 {
                scale(x, -1.0)
            } else {
                State::from([0.0, 0.0])
            }
        };
        let err = integrate(&State::scalar(1.0), 0.0, 1.0, 0.1, &f, Method::Euler).unwrap_err();

        assert_eq!(
            err.error,
            OdeError::DimensionMismatch {
                expected: 1,
                found: 2
            }
        );
        // Samples at t = 0.0 ... 0.5; the step starting at 0.5 failed
        assert_eq!(err.trajectory.len(), 6);
        assert_relative_eq!(err.trajectory.final_time().unwrap(), 0.5);
    }

    #[test]
    fn test_infinite_derivative_stops_integration() {
        let f = |_x: &State, t: f64| {
            if t > 0.25 {
                State::scalar(f64::INFINITY)
            } else {
                State::scalar(1.0)
            }
        };
        let err = integrate(&State::scalar(0.0), 0.0, 1.0, 0.25, &f, Method::Rk2).unwrap_err();
        assert!(matches!(
            err.error,
            OdeError::NumericDomain {
                stage: Stage::K2,
                ..
            }
        ));
        assert_eq!(err.trajectory.len(), 2);
        assert_eq!(err.trajectory.final_state(), Some(&State::scalar(0.25)));
    }

    #[test]
    fn test_max_steps_exceeded() {
        let settings = Settings {
            max_steps: 100,
            ..Settings::default()
        };
        let mut integrator = Integrator::with_settings(Method::Euler, settings);
        let err = integrator
            .integrate(&decay, &State::scalar(1.0), 0.0, 1.0, 0.001)
            .unwrap_err();
        assert_eq!(
            err.error,
            OdeError::MaxStepsExceeded {
                required: 1000,
                limit: 100
            }
        );
        assert_eq!(integrator.stats.fn_evals, 0);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            snap_tolerance: f64::NAN,
            ..Settings::default()
        };
        let mut integrator = Integrator::with_settings(Method::Euler, settings);
        let err = integrator
            .integrate(&decay, &State::scalar(1.0), 0.0, 1.0, 0.1)
            .unwrap_err();
        assert!(matches!(err.error, OdeError::InvalidInput { .. }));
    }

    #[test]
    fn test_stats_accumulate() {
        let mut integrator = Integrator::new(Method::Rk4);
        integrator
            .integrate(&decay, &State::scalar(1.0), 0.0, 1.0, 0.25)
            .unwrap();
        assert_eq!(integrator.stats.steps, 4);
        assert_eq!(integrator.stats.fn_evals, 16);

        integrator
            .integrate(&decay, &State::scalar(1.0), 0.0, 0.5, 0.25)
            .unwrap();
        assert_eq!(integrator.stats.steps, 6);
        assert_eq!(integrator.stats.fn_evals, 24);

        integrator.reset_stats();
        assert_eq!(integrator.stats, Stats::default());
    }

    #[test]
    fn test_integrate_steps() {
        let mut integrator = Integrator::new(Method::Rk2);
        let traj = integrator
            .integrate_steps(&decay, &State::scalar(1.0), 0.0, 10.0, 7)
            .unwrap();
        assert_eq!(traj.len(), 8);
        assert_eq!(traj.final_time(), Some(10.0));
        assert_relative_eq!(traj.times()[1], 10.0 / 7.0);

        assert!(integrator
            .integrate_steps(&decay, &State::scalar(1.0), 0.0, 1.0, 0)
            .is_err());

        let traj = integrator
            .integrate_steps(&decay, &State::scalar(1.0), 2.0, 2.0, 3)
            .unwrap();
        assert_eq!(traj.len(), 1);
    }

    #[test]
    fn test_x_plus_t_matches_closed_form() {
        // dx/dt = x + t, x(0) = 0, exact x = e^t - t - 1
        let f = |x: &State, t: f64| State::scalar(x[0] + t);
        let traj = integrate(&State::scalar(0.0), 0.0, 1.0, 0.01, &f, Method::Rk4).unwrap();
        let exact = 1.0_f64.exp() - 2.0;
        assert_relative_eq!(traj.final_state().unwrap()[0], exact, max_relative = 1e-8);
    }
}
