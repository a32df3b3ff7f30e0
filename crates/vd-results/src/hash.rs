//! Content-based hashing for run IDs and trajectories.

use serde::Serialize;
use sha2::{Digest, Sha256};
use vd_controls::Scenario;
use vd_model::ModelParams;
use vd_sim::{InitialConditions, SimOptions, TimeHistory};

#[derive(Serialize)]
struct RunInputs<'a> {
    params: &'a ModelParams,
    scenario: &'a Scenario,
    initial_conditions: &'a InitialConditions,
    options: &'a SimOptions,
}

/// SHA-256 over every input that determines a run.
pub fn compute_run_id(
    params: &ModelParams,
    scenario: &Scenario,
    initial_conditions: &InitialConditions,
    options: &SimOptions,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let inputs = RunInputs {
        params,
        scenario,
        initial_conditions,
        options,
    };
    let inputs_json = serde_json::to_string(&inputs).unwrap_or_default();
    hasher.update(inputs_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// SHA-256 over the exact bit patterns of a trajectory.
///
/// Two histories have the same digest only if every time, state and algebraic
/// value is bit-identical.
pub fn history_digest(history: &TimeHistory) -> String {
    let mut hasher = Sha256::new();
    for record in history {
        hasher.update((record.step as u64).to_le_bytes());
        hasher.update(record.time.to_bits().to_le_bytes());
        for v in record.x.as_slice().iter().chain(record.y.as_slice()) {
            hasher.update(v.to_bits().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}
