//! The derivative function `dx/dt = f(x, t)`.

use crate::state::State;

/// System of ordinary differential equations: dx/dt = f(x, t)
///
/// Implementations must be pure: the steppers call `rhs` up to four times
/// per step, with the current state and with perturbed intermediate states.
///
/// Any `Fn(&State, f64) -> State` closure is an `OdeSystem`.
///
/// # Example
/// ```
/// use odestep::{OdeSystem, State};
///
/// struct HarmonicOscillator { omega: f64 }
///
/// impl OdeSystem for HarmonicOscillator {
///     fn rhs(&self, x: &State, _t: f64) -> State {
///         State::from([x[1], -self.omega * self.omega * x[0]])
///     }
/// }
///
/// let sys = HarmonicOscillator { omega: 2.0 };
/// let dxdt = sys.rhs(&State::from([1.0, 0.0]), 0.0);
/// assert_eq!(dxdt, State::from([0.0, -4.0]));
/// ```
pub trait OdeSystem {
    /// Evaluate the right-hand side of the ODE system
    ///
    /// # Arguments
    /// * `x` - Current state vector
    /// * `t` - Current time
    ///
    /// # Returns
    /// The derivative dx/dt, with the same dimension as `x`
    fn rhs(&self, x: &State, t: f64) -> State;
}

impl<F> OdeSystem for F
where
    F: Fn(&State, f64) -> State,
{
    fn rhs(&self, x: &State, t: f64) -> State {
        self(x, t)
    }
}
