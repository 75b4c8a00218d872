//! Explicit Runge-Kutta Coefficients
//!
//! Butcher tableaus for the three fixed-step methods in this crate:
//!
//! ```text
//! Euler        Midpoint (RK2)       Classical RK4
//!
//!  0 |          0   |                 0   |
//! ---+---      1/2  | 1/2            1/2  | 1/2
//!    | 1       -----+---------       1/2  |  0   1/2
//!                   |  0    1         1   |  0    0    1
//!                                    -----+-------------------
//!                                         | 1/6  1/3  1/3  1/6
//! ```
//!
//! Every tableau here has a single nonzero coupling per row, sitting on the
//! subdiagonal, so each stage depends only on the one before it.

/// Number of stages in the forward Euler method
pub const EULER_STAGES: usize = 1;

/// Number of stages in the RK2 midpoint method
pub const RK2_STAGES: usize = 2;

/// Number of stages in the classical RK4 method
pub const RK4_STAGES: usize = 4;

/// Order of accuracy of the forward Euler method
pub const EULER_ORDER: u8 = 1;

/// Order of accuracy of the RK2 midpoint method
pub const RK2_ORDER: u8 = 2;

/// Order of accuracy of the classical RK4 method
pub const RK4_ORDER: u8 = 4;

/// RK2 node coefficients (c_i): stage i is evaluated at t + c[i]*h
pub const RK2_C: [f64; RK2_STAGES] = [0.0, 0.5];

/// RK2 subdiagonal coupling a_{i,i-1}, for i = 1
pub const RK2_A: [f64; RK2_STAGES - 1] = [0.5];

/// RK2 weights (b_i)
pub const RK2_B: [f64; RK2_STAGES] = [0.0, 1.0];

/// RK4 node coefficients (c_i)
pub const RK4_C: [f64; RK4_STAGES] = [0.0, 0.5, 0.5, 1.0];

/// RK4 subdiagonal coupling a_{i,i-1}, for i = 1..3
pub const RK4_A: [f64; RK4_STAGES - 1] = [0.5, 0.5, 1.0];

/// RK4 weight numerators; the weights are `RK4_B[i] / RK4_B_DENOM`
pub const RK4_B: [f64; RK4_STAGES] = [1.0, 2.0, 2.0, 1.0];

/// Common denominator of the RK4 weights
pub const RK4_B_DENOM: f64 = 6.0;
