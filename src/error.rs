//! Error types for stepping and integration.

use std::fmt;

use thiserror::Error;

use crate::trajectory::Trajectory;

/// Point inside a single step at which a value was produced.
///
/// Used to localize a non-finite value to the sub-step that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First derivative evaluation, `f(x, t)`
    K1,
    /// Second derivative evaluation
    K2,
    /// Third derivative evaluation (RK4 only)
    K3,
    /// Fourth derivative evaluation (RK4 only)
    K4,
    /// Final combination into the next state
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::K1 => "k1",
            Stage::K2 => "k2",
            Stage::K3 => "k3",
            Stage::K4 => "k4",
            Stage::Update => "update",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while stepping or integrating
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OdeError {
    /// Two state vectors that must agree in length do not
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension fixed by the state being advanced
        expected: usize,
        /// Dimension of the offending operand
        found: usize,
    },

    /// A computed component is NaN or infinite
    #[error("non-finite component {index} at t = {t} (stage {stage})")]
    NumericDomain {
        /// Time at which the offending value was evaluated
        t: f64,
        /// Sub-step that produced the value
        stage: Stage,
        /// Index of the first non-finite component
        index: usize,
    },

    /// Step size is zero or points away from the end time
    #[error("step size {h} cannot reach the end time (span {span})")]
    InvalidDirection {
        /// Requested step size
        h: f64,
        /// `t_end - t0`
        span: f64,
    },

    /// Integration would need more steps than the configured limit
    #[error("{required} steps required, limit is {limit}")]
    MaxStepsExceeded {
        /// Number of steps the interval needs at the given step size
        required: u64,
        /// Configured limit
        limit: u64,
    },

    /// Invalid input parameters
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },
}

impl OdeError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        OdeError::InvalidInput {
            message: message.into(),
        }
    }
}

/// An integration that stopped early.
///
/// Carries the first error together with every sample computed before the
/// failing step, so callers can inspect progress up to the failure point.
#[derive(Debug, Clone, Error)]
#[error("integration stopped after {} samples: {error}", .trajectory.len())]
pub struct IntegrationFailure {
    /// The error that stopped the integration
    #[source]
    pub error: OdeError,
    /// Samples computed before the failure (empty if rejected up front)
    pub trajectory: Trajectory,
}

impl IntegrationFailure {
    pub(crate) fn new(error: OdeError, trajectory: Trajectory) -> Self {
        Self { error, trajectory }
    }

    /// Split into the error and the partial trajectory
    pub fn into_parts(self) -> (OdeError, Trajectory) {
        (self.error, self.trajectory)
    }
}
