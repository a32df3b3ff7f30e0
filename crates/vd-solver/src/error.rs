//! Error types for solver operations.

use thiserror::Error;
use vd_core::VdError;

/// Terminal failures of a Newton solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Iteration budget exhausted, or the residual became non-finite.
    #[error("Convergence failed after {iterations} iterations, residual = {residual_norm}")]
    ConvergenceFailed {
        iterations: usize,
        residual_norm: f64,
    },

    /// The linear solve `∂g/∂y · Δy = -r` could not be performed.
    #[error("Singular Jacobian at iteration {iteration}")]
    SingularJacobian { iteration: usize },

    #[error("Dimension mismatch: {what}")]
    Dimension { what: String },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<VdError> for SolverError {
    fn from(e: VdError) -> Self {
        SolverError::Dimension {
            what: e.to_string(),
        }
    }
}
