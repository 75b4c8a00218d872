//! Time-ordered samples produced by an integration run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::OdeError;
use crate::state::State;

/// Ordered `(t, x)` samples; index 0 is the initial condition.
///
/// Every state has the dimension fixed when the trajectory was created, and
/// times are strictly monotone in the direction of integration. Only the
/// integrator appends samples.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawTrajectory")
)]
pub struct Trajectory {
    dim: usize,
    times: Vec<f64>,
    states: Vec<State>,
}

/// Unchecked wire form; every sample is replayed through [`Trajectory::push`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawTrajectory {
    dim: usize,
    times: Vec<f64>,
    states: Vec<State>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTrajectory> for Trajectory {
    type Error = OdeError;

    fn try_from(raw: RawTrajectory) -> Result<Self, Self::Error> {
        if raw.times.len() != raw.states.len() {
            return Err(OdeError::invalid_input(format!(
                "{} sample times but {} states",
                raw.times.len(),
                raw.states.len()
            )));
        }
        let mut trajectory = Trajectory::with_capacity(raw.dim, raw.times.len());
        for (t, x) in raw.times.into_iter().zip(raw.states) {
            trajectory.push(t, x)?;
        }
        Ok(trajectory)
    }
}

impl Trajectory {
    /// Create an empty trajectory for states of dimension `dim`
    pub fn new(dim: usize) -> Self {
        Self::with_capacity(dim, 0)
    }

    /// Create an empty trajectory with room for `capacity` samples
    pub fn with_capacity(dim: usize, capacity: usize) -> Self {
        Self {
            dim,
            times: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample.
    ///
    /// Rejects states of the wrong dimension and times that do not continue
    /// the direction set by the first two samples.
    pub(crate) fn push(&mut self, t: f64, x: State) -> Result<(), OdeError> {
        if x.dim() != self.dim {
            return Err(OdeError::DimensionMismatch {
                expected: self.dim,
                found: x.dim(),
            });
        }
        if let Some(&last) = self.times.last() {
            let ordered = match self.direction() {
                Some(dir) => (t - last) * dir > 0.0,
                None => t != last,
            };
            if !ordered {
                return Err(OdeError::invalid_input(format!(
                    "sample time {} does not follow {}",
                    t, last
                )));
            }
        }
        self.times.push(t);
        self.states.push(x);
        Ok(())
    }

    /// Dimension of every state in the trajectory
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when there are no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// +1.0 for forward integration, -1.0 for backward, `None` with fewer
    /// than two samples
    pub fn direction(&self) -> Option<f64> {
        match self.times.as_slice() {
            [t0, t1, ..] => Some((t1 - t0).signum()),
            _ => None,
        }
    }

    /// Sample times
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sample states
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Sample at index `i`
    pub fn get(&self, i: usize) -> Option<(f64, &State)> {
        Some((*self.times.get(i)?, self.states.get(i)?))
    }

    /// Initial sample
    pub fn first(&self) -> Option<(f64, &State)> {
        self.get(0)
    }

    /// Most recent sample
    pub fn last(&self) -> Option<(f64, &State)> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Time of the most recent sample
    pub fn final_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// State of the most recent sample
    pub fn final_state(&self) -> Option<&State> {
        self.states.last()
    }

    /// Iterate over `(t, x)` samples in order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &State)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }

    /// Time series of component `i` across all samples
    pub fn component(&self, i: usize) -> Result<Vec<f64>, OdeError> {
        if i >= self.dim {
            return Err(OdeError::invalid_input(format!(
                "component {} out of range for dimension {}",
                i, self.dim
            )));
        }
        Ok(self.states.iter().map(|x| x[i]).collect())
    }

    /// Consume into the times and states
    pub fn into_parts(self) -> (Vec<f64>, Vec<State>) {
        (self.times, self.states)
    }
}
