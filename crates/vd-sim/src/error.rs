//! Error types for simulation operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vd_solver::SolverError;

use crate::history::TimeHistory;

/// Errors that stop a simulation run. None of them is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(
        "Algebraic solve failed at step {step} (t = {time}) after {iterations} iterations, residual = {residual_norm}"
    )]
    AlgebraicConvergence {
        step: usize,
        time: f64,
        iterations: usize,
        residual_norm: f64,
    },

    #[error("Singular algebraic Jacobian at step {step} (t = {time}), iteration {iteration}")]
    SingularJacobian {
        step: usize,
        time: f64,
        iteration: usize,
    },

    #[error("Missing variable '{name}' at step {step}")]
    MissingVariable { step: usize, name: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Attach step and time to a solver failure.
    pub fn from_solver(e: SolverError, step: usize, time: f64) -> Self {
        match e {
            SolverError::ConvergenceFailed {
                iterations,
                residual_norm,
            } => SimError::AlgebraicConvergence {
                step,
                time,
                iterations,
                residual_norm,
            },
            SolverError::SingularJacobian { iteration } => SimError::SingularJacobian {
                step,
                time,
                iteration,
            },
            other => SimError::Backend {
                message: other.to_string(),
            },
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            SimError::InvalidArg { .. } => FailureKind::InvalidArgument,
            SimError::AlgebraicConvergence { .. } => FailureKind::AlgebraicConvergence,
            SimError::SingularJacobian { .. } => FailureKind::SingularJacobian,
            SimError::MissingVariable { .. } => FailureKind::MissingVariable,
            SimError::Backend { .. } => FailureKind::Backend,
        }
    }

    /// Step index the failure is attributed to, if any.
    pub fn step(&self) -> Option<usize> {
        match self {
            SimError::AlgebraicConvergence { step, .. }
            | SimError::SingularJacobian { step, .. }
            | SimError::MissingVariable { step, .. } => Some(*step),
            SimError::InvalidArg { .. } | SimError::Backend { .. } => None,
        }
    }
}

/// Stable tag for a [`SimError`], suitable for manifests and exit messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidArgument,
    AlgebraicConvergence,
    SingularJacobian,
    MissingVariable,
    Backend,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::InvalidArgument => "invalid_argument",
            FailureKind::AlgebraicConvergence => "algebraic_convergence",
            FailureKind::SingularJacobian => "singular_jacobian",
            FailureKind::MissingVariable => "missing_variable",
            FailureKind::Backend => "backend",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed run: the error plus every record accepted before it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("simulation failed after {} records: {error}", .history.len())]
pub struct SimFailure {
    #[source]
    pub error: SimError,
    pub history: TimeHistory,
}

impl SimFailure {
    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}
