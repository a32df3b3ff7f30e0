//! RMS dq model of a VSC-HVDC converter station as an index-1 DAE.
//!
//! The model is split into the differential part `x_dot = f(x, y)` and the
//! algebraic constraint `g(x, y) = 0`, plus their analytic Jacobians.
//!
//! # Validity
//!
//! The quasi-static phasor representation only holds near the nominal
//! operating point. Nothing here checks for that. The DC link equations
//! divide by `Vdc`; as `Vdc` approaches zero the residual blows up, which the
//! algebraic solver reports as a convergence failure.

pub mod dae;
pub mod jacobian;
pub mod params;

pub use dae::{ModelInputs, POWER_FACTOR, f, g};
pub use jacobian::{df_dx, dg_dx, dg_dy};
pub use params::ModelParams;
