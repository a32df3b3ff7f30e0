//! Newton-Raphson solver for the algebraic part of the DAE.
//!
//! The differential states are frozen while `g(x, y) = 0` is solved in `y`
//! using only `∂g/∂y`. The generic iteration lives in [`newton`]; [`algebraic`]
//! binds it to the converter model.

pub mod algebraic;
pub mod error;
pub mod jacobian;
pub mod newton;

pub use algebraic::{AlgebraicSolution, solve_algebraic};
pub use error::{SolverError, SolverResult};
pub use jacobian::{DifferenceScheme, numeric_jacobian};
pub use newton::{NewtonConfig, NewtonResult, ResidualNorm, newton_solve};
