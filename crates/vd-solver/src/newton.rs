//! Plain Newton-Raphson iteration on dense vectors.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vd_core::{l2_norm, max_abs};

use crate::error::{SolverError, SolverResult};

/// Norm used for the convergence test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualNorm {
    /// Infinity norm.
    #[default]
    Max,
    /// Euclidean norm.
    L2,
}

impl ResidualNorm {
    pub fn measure(self, r: &DVector<f64>) -> f64 {
        match self {
            ResidualNorm::Max => max_abs(r.as_slice()),
            ResidualNorm::L2 => l2_norm(r.as_slice()),
        }
    }
}

/// Newton solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Maximum number of residual evaluations
    pub max_iterations: usize,
    /// Absolute tolerance on the residual norm
    pub tolerance: f64,
    pub norm: ResidualNorm,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: 1e-8,
            norm: ResidualNorm::Max,
        }
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_iterations must be at least 1",
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidConfig {
                what: "tolerance must be finite and positive",
            });
        }
        Ok(())
    }
}

/// Converged Newton iterate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonResult {
    pub y: DVector<f64>,
    pub residual_norm: f64,
    /// Residual evaluations performed, including the converged one.
    pub iterations: usize,
}

/// Newton solve without line search or damping.
///
/// Each pass evaluates the residual once. The first residual whose norm is
/// below `config.tolerance` ends the solve, so an exact starting root reports
/// one iteration. A non-finite residual fails immediately.
pub fn newton_solve<F, J>(
    y0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> DMatrix<f64>,
{
    config.validate()?;
    let mut y = y0;

    for iteration in 1..=config.max_iterations {
        let r = residual_fn(&y);
        if r.len() != y.len() {
            return Err(SolverError::Dimension {
                what: format!("residual has {} rows, unknowns {}", r.len(), y.len()),
            });
        }
        let r_norm = config.norm.measure(&r);
        debug!(iteration, residual_norm = r_norm, "newton iteration");

        if !r_norm.is_finite() {
            return Err(SolverError::ConvergenceFailed {
                iterations: iteration,
                residual_norm: r_norm,
            });
        }
        if r_norm < config.tolerance {
            return Ok(NewtonResult {
                y,
                residual_norm: r_norm,
                iterations: iteration,
            });
        }
        if iteration == config.max_iterations {
            return Err(SolverError::ConvergenceFailed {
                iterations: iteration,
                residual_norm: r_norm,
            });
        }

        let jac = jacobian_fn(&y);
        if jac.shape() != (y.len(), y.len()) {
            return Err(SolverError::Dimension {
                what: format!("jacobian is {:?}, expected square {}", jac.shape(), y.len()),
            });
        }
        let dy = jac
            .lu()
            .solve(&(-r))
            .ok_or(SolverError::SingularJacobian { iteration })?;
        y += dy;
    }

    // `validate` guarantees at least one pass, and the last pass always returns.
    Err(SolverError::ConvergenceFailed {
        iterations: config.max_iterations,
        residual_norm: f64::NAN,
    })
}
