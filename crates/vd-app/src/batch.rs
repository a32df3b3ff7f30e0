//! Independent runs, optionally in parallel.

use rayon::prelude::*;
use tracing::info;
use vd_results::history_digest;
use vd_sim::{SimFailure, TimeHistory};

use crate::error::AppResult;
use crate::run_service::PreparedRun;

/// A labelled in-memory run.
#[derive(Debug, Clone)]
pub struct BatchCase {
    pub label: String,
    pub run: PreparedRun,
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub label: String,
    pub result: AppResult<Result<TimeHistory, SimFailure>>,
}

impl CaseOutcome {
    /// Digest of the completed trajectory, if the case completed.
    pub fn digest(&self) -> Option<String> {
        match &self.result {
            Ok(Ok(history)) => Some(history_digest(history)),
            _ => None,
        }
    }
}

fn run_case(case: &BatchCase) -> CaseOutcome {
    CaseOutcome {
        label: case.label.clone(),
        result: case.run.simulate(),
    }
}

/// Run every case. Outcomes keep the input order; a failing case does not
/// affect the others.
pub fn run_batch(cases: &[BatchCase], parallel: bool) -> Vec<CaseOutcome> {
    info!(cases = cases.len(), parallel, "running batch");
    if parallel {
        cases.par_iter().map(run_case).collect()
    } else {
        cases.iter().map(run_case).collect()
    }
}
