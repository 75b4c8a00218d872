//! Validation shared by every stepper.
//!
//! Both checks always run: a NaN that slipped through one RK4 stage would
//! contaminate every later stage and step without any signal.

use crate::error::{OdeError, Stage};
use crate::state::{ensure_same_dim, State};
use crate::system::OdeSystem;

/// Fail with `NumericDomain` if any component of `x` is NaN or infinite
pub fn check_finite(x: &State, t: f64, stage: Stage) -> Result<(), OdeError> {
    match x.first_non_finite() {
        Some(index) => Err(OdeError::NumericDomain { t, stage, index }),
        None => Ok(()),
    }
}

/// Evaluate `f(x, t)` and check the result before it is used.
///
/// The derivative must have the dimension of `x` and be finite.
pub fn evaluate<S>(sys: &S, x: &State, t: f64, stage: Stage) -> Result<State, OdeError>
where
    S: OdeSystem + ?Sized,
{
    let dxdt = sys.rhs(x, t);
    ensure_same_dim(x, &dxdt)?;
    check_finite(&dxdt, t, stage)?;
    Ok(dxdt)
}
