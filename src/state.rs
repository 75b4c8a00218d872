//! State vectors and the arithmetic the steppers need.
//!
//! Arithmetic is provided as free functions rather than operator overloads.
//! Every binary operation checks that both operands have the same dimension
//! before touching any component.

use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::OdeError;

/// Dependent variables `x(t)` of an ODE system.
///
/// A fixed-length sequence of `f64`. Operations return new states; a state
/// is never modified once it has been produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct State {
    components: Vec<f64>,
}

impl State {
    /// Create a state from its components
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    /// Create a one-dimensional state
    pub fn scalar(value: f64) -> Self {
        Self {
            components: vec![value],
        }
    }

    /// Create a state of dimension `n` with all components zero
    pub fn zeros(n: usize) -> Self {
        Self {
            components: vec![0.0; n],
        }
    }

    /// Number of components
    pub fn dim(&self) -> usize {
        self.components.len()
    }

    /// Components as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.components
    }

    /// Iterate over the components
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.components.iter()
    }

    /// Index of the first NaN or infinite component, if any
    pub fn first_non_finite(&self) -> Option<usize> {
        self.components.iter().position(|v| !v.is_finite())
    }

    /// True when every component is finite
    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Consume the state and return its components
    pub fn into_vec(self) -> Vec<f64> {
        self.components
    }
}

impl Index<usize> for State {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.components[i]
    }
}

impl From<Vec<f64>> for State {
    fn from(components: Vec<f64>) -> Self {
        Self::new(components)
    }
}

impl<const N: usize> From<[f64; N]> for State {
    fn from(components: [f64; N]) -> Self {
        Self::new(components.to_vec())
    }
}

impl From<&[f64]> for State {
    fn from(components: &[f64]) -> Self {
        Self::new(components.to_vec())
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Fail with `DimensionMismatch` unless `b` has the same dimension as `a`
pub fn ensure_same_dim(a: &State, b: &State) -> Result<(), OdeError> {
    if a.dim() != b.dim() {
        return Err(OdeError::DimensionMismatch {
            expected: a.dim(),
            found: b.dim(),
        });
    }
    Ok(())
}

/// Elementwise `a + b`
pub fn add(a: &State, b: &State) -> Result<State, OdeError> {
    add_scaled(a, 1.0, b)
}

/// `s * a`
pub fn scale(a: &State, s: f64) -> State {
    State::new(a.iter().map(|v| s * v).collect())
}

/// `a + s * b`, the update used by every explicit stage
pub fn add_scaled(a: &State, s: f64, b: &State) -> Result<State, OdeError> {
    ensure_same_dim(a, b)?;
    Ok(State::new(
        a.iter().zip(b.iter()).map(|(x, y)| x + s * y).collect(),
    ))
}

/// `sum_i w_i * terms_i`, all terms of the same dimension as the first.
///
/// Returns an empty state when `terms` is empty.
pub fn weighted_sum(weights: &[f64], terms: &[&State]) -> Result<State, OdeError> {
    let Some(first) = terms.first() else {
        return Ok(State::zeros(0));
    };
    let mut acc = vec![0.0; first.dim()];
    for (&w, term) in weights.iter().zip(terms) {
        ensure_same_dim(first, term)?;
        for (a, v) in acc.iter_mut().zip(term.iter()) {
            *a += w * v;
        }
    }
    Ok(State::new(acc))
}
