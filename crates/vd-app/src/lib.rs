//! Shared application service layer for vscdyn.
//!
//! Loads and validates inputs, runs the simulation, converts and caches
//! results. The CLI is a thin shell over this crate.

pub mod batch;
pub mod error;
pub mod run_service;

pub use batch::{BatchCase, CaseOutcome, run_batch};
pub use error::{AppError, AppResult};
pub use run_service::{
    FailureSummary, PreparedRun, REFERENCE_DT, RunOptions, RunOverrides, RunRequest, RunResponse,
    execute, execute_prepared, prepare, step_size_warning,
};
