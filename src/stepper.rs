//! Fixed-step update rules: Euler, RK2 (midpoint) and classical RK4.
//!
//! Each rule advances a state from `t` to `t + h`. The stage values
//! `k1..k4` follow the `k = h * f(..)` convention and live only for the
//! duration of one call. Stages are evaluated strictly in order since each
//! one's input depends on the previous stage.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coefficients::{
    EULER_ORDER, EULER_STAGES, RK2_A, RK2_B, RK2_C, RK2_ORDER, RK2_STAGES, RK4_A, RK4_B,
    RK4_B_DENOM, RK4_C, RK4_ORDER, RK4_STAGES,
};
use crate::error::{OdeError, Stage};
use crate::policy::{check_finite, evaluate};
use crate::state::{add, add_scaled, scale, weighted_sum, State};
use crate::system::OdeSystem;

/// Single forward Euler step: `x + h * f(x, t)`
///
/// # Example
/// ```
/// use odestep::{euler_step, State};
///
/// let f = |x: &State, _t: f64| State::from([-x[0]]);
/// let x1 = euler_step(&f, &State::from([1.0]), 0.0, 0.1).unwrap();
/// assert!((x1[0] - 0.9).abs() < 1e-15);
/// ```
pub fn euler_step<S>(sys: &S, x: &State, t: f64, h: f64) -> Result<State, OdeError>
where
    S: OdeSystem + ?Sized,
{
    let k1 = scale(&evaluate(sys, x, t, Stage::K1)?, h);
    finish(add(x, &k1)?, t + h)
}

/// Single RK2 step, midpoint form
///
/// ```text
/// k1 = h * f(x, t)
/// k2 = h * f(x + k1/2, t + h/2)
/// x_next = x + k2
/// ```
pub fn rk2_step<S>(sys: &S, x: &State, t: f64, h: f64) -> Result<State, OdeError>
where
    S: OdeSystem + ?Sized,
{
    let k1 = scale(&evaluate(sys, x, t, Stage::K1)?, h);

    let x2 = add_scaled(x, RK2_A[0], &k1)?;
    let k2 = scale(&evaluate(sys, &x2, t + RK2_C[1] * h, Stage::K2)?, h);

    let increment = weighted_sum(&RK2_B, &[&k1, &k2])?;
    finish(add(x, &increment)?, t + h)
}

/// Single step of the classical 4th-order Runge-Kutta method
///
/// ```text
/// k1 = h * f(x, t)
/// k2 = h * f(x + k1/2, t + h/2)
/// k3 = h * f(x + k2/2, t + h/2)
/// k4 = h * f(x + k3,   t + h)
/// x_next = x + (k1 + 2*k2 + 2*k3 + k4) / 6
/// ```
///
/// # Example
/// ```
/// use odestep::{rk4_step, State};
///
/// // dx/dt = -x (exponential decay)
/// let f = |x: &State, _t: f64| State::from([-x[0]]);
/// let x1 = rk4_step(&f, &State::from([1.0]), 0.0, 0.01).unwrap();
/// assert!((x1[0] - (-0.01_f64).exp()).abs() < 1e-10);
/// ```
pub fn rk4_step<S>(sys: &S, x: &State, t: f64, h: f64) -> Result<State, OdeError>
where
    S: OdeSystem + ?Sized,
{
    let k1 = scale(&evaluate(sys, x, t, Stage::K1)?, h);

    let x2 = add_scaled(x, RK4_A[0], &k1)?;
    let k2 = scale(&evaluate(sys, &x2, t + RK4_C[1] * h, Stage::K2)?, h);

    let x3 = add_scaled(x, RK4_A[1], &k2)?;
    let k3 = scale(&evaluate(sys, &x3, t + RK4_C[2] * h, Stage::K3)?, h);

    let x4 = add_scaled(x, RK4_A[2], &k3)?;
    let k4 = scale(&evaluate(sys, &x4, t + RK4_C[3] * h, Stage::K4)?, h);

    let increment = weighted_sum(&RK4_B, &[&k1, &k2, &k3, &k4])?;
    finish(add_scaled(x, 1.0 / RK4_B_DENOM, &increment)?, t + h)
}

fn finish(x_next: State, t_next: f64) -> Result<State, OdeError> {
    check_finite(&x_next, t_next, Stage::Update)?;
    Ok(x_next)
}

/// Fixed-step integration method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Method {
    /// Forward Euler, first order
    Euler,
    /// Midpoint Runge-Kutta, second order
    Rk2,
    /// Classical Runge-Kutta, fourth order
    #[default]
    Rk4,
}

impl Method {
    /// All methods, lowest order first
    pub const ALL: [Method; 3] = [Method::Euler, Method::Rk2, Method::Rk4];

    /// Advance `x` from `t` to `t + h` with this method
    pub fn step<S>(&self, sys: &S, x: &State, t: f64, h: f64) -> Result<State, OdeError>
    where
        S: OdeSystem + ?Sized,
    {
        match self {
            Method::Euler => euler_step(sys, x, t, h),
            Method::Rk2 => rk2_step(sys, x, t, h),
            Method::Rk4 => rk4_step(sys, x, t, h),
        }
    }

    /// Derivative evaluations per step
    pub fn stages(&self) -> usize {
        match self {
            Method::Euler => EULER_STAGES,
            Method::Rk2 => RK2_STAGES,
            Method::Rk4 => RK4_STAGES,
        }
    }

    /// Global order of accuracy
    pub fn order(&self) -> u8 {
        match self {
            Method::Euler => EULER_ORDER,
            Method::Rk2 => RK2_ORDER,
            Method::Rk4 => RK4_ORDER,
        }
    }

    /// Lowercase selector name: `euler`, `rk2` or `rk4`
    pub fn name(&self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::Rk2 => "rk2",
            Method::Rk4 => "rk4",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized method name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown integration method '{0}' (expected euler, rk2 or rk4)")]
pub struct ParseMethodError(pub String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMethodError(s.to_string()))
    }
}
