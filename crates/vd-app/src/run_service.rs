//! Run execution and caching service.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use vd_model::ModelParams;
use vd_project::{ScenarioFile, prepare_initial_conditions};
use vd_results::{
    RunManifest, RunStatus, RunStore, TimeseriesRecord, compute_run_id, records_from_history,
};
use vd_sim::{
    FailureKind, InitialConditions, IntegratorKind, SimFailure, SimOptions, Simulation,
    TimeHistory,
};
use vd_solver::ResidualNorm;

use crate::error::{AppError, AppResult};

/// Step size the model's stability was characterised at.
pub const REFERENCE_DT: f64 = 5e-4;

/// Warning text when `dt` exceeds twice [`REFERENCE_DT`]. Never fatal.
pub fn step_size_warning(dt: f64) -> Option<String> {
    (dt > 2.0 * REFERENCE_DT).then(|| {
        format!(
            "dt = {dt} exceeds twice the reference step {REFERENCE_DT}; \
             forward Euler may diverge"
        )
    })
}

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
    /// Run store directory. Nothing is persisted when `None`.
    pub store_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
            store_dir: None,
        }
    }
}

/// Command-line level overrides, applied over the scenario's solver block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunOverrides {
    pub dt: Option<f64>,
    pub t_end: Option<f64>,
    pub integrator: Option<IntegratorKind>,
    pub nr_tolerance: Option<f64>,
    pub nr_max_iterations: Option<usize>,
    pub nr_norm: Option<ResidualNorm>,
}

impl RunOverrides {
    pub fn apply(&self, base: SimOptions) -> SimOptions {
        let mut opts = base;
        if let Some(dt) = self.dt {
            opts.dt = dt;
        }
        if let Some(t_end) = self.t_end {
            opts.t_end = t_end;
        }
        if let Some(integrator) = self.integrator {
            opts.integrator = integrator;
        }
        if let Some(tol) = self.nr_tolerance {
            opts.newton.tolerance = tol;
        }
        if let Some(max) = self.nr_max_iterations {
            opts.newton.max_iterations = max;
        }
        if let Some(norm) = self.nr_norm {
            opts.newton.norm = norm;
        }
        opts
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub params_path: &'a Path,
    pub scenario_path: &'a Path,
    pub overrides: RunOverrides,
    pub options: RunOptions,
}

/// Validated inputs, ready to simulate.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub params: ModelParams,
    pub scenario: ScenarioFile,
    pub initial_conditions: InitialConditions,
    pub sim_options: SimOptions,
}

impl PreparedRun {
    /// Validate options and fill missing algebraic initial values.
    pub fn new(
        params: ModelParams,
        scenario: ScenarioFile,
        overrides: &RunOverrides,
    ) -> AppResult<Self> {
        let sim_options = overrides.apply(scenario.sim_options(SimOptions::default()));
        sim_options
            .validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        let initial_conditions = prepare_initial_conditions(&scenario.initial_conditions);
        Ok(Self {
            params,
            scenario,
            initial_conditions,
            sim_options,
        })
    }

    pub fn run_id(&self, solver_version: &str) -> String {
        compute_run_id(
            &self.params,
            &self.scenario.scenario,
            &self.initial_conditions,
            &self.sim_options,
            solver_version,
        )
    }

    pub fn simulate(&self) -> AppResult<Result<TimeHistory, SimFailure>> {
        let sim = Simulation::new(
            self.params,
            self.scenario.scenario.control.clone(),
            self.sim_options,
        )?;
        Ok(sim.run(&self.initial_conditions))
    }
}

/// Load and validate the request's input files.
pub fn prepare(request: &RunRequest) -> AppResult<PreparedRun> {
    let params = vd_project::load_params(request.params_path)?;
    let scenario = vd_project::load_scenario(request.scenario_path)?;
    PreparedRun::new(params, scenario, &request.overrides)
}

/// Why a run stopped early.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureSummary {
    pub kind: FailureKind,
    pub step: Option<usize>,
    pub message: String,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    /// Accepted records; a prefix of the trajectory when the run failed.
    pub records: Vec<TimeseriesRecord>,
    pub failure: Option<FailureSummary>,
    pub loaded_from_cache: bool,
}

fn failure_of(status: &RunStatus) -> Option<FailureSummary> {
    match status {
        RunStatus::Completed { .. } => None,
        RunStatus::Failed {
            kind,
            step,
            message,
            ..
        } => Some(FailureSummary {
            kind: *kind,
            step: *step,
            message: message.clone(),
        }),
    }
}

/// Execute a run, or load it from the store when cached.
pub fn execute(request: &RunRequest) -> AppResult<RunResponse> {
    let prepared = prepare(request)?;
    execute_prepared(&prepared, &request.options)
}

pub fn execute_prepared(prepared: &PreparedRun, options: &RunOptions) -> AppResult<RunResponse> {
    if let Some(message) = step_size_warning(prepared.sim_options.dt) {
        warn!("{message}");
    }

    let run_id = prepared.run_id(&options.solver_version);
    let store = options
        .store_dir
        .as_ref()
        .map(|dir| RunStore::new(dir.clone()))
        .transpose()?;

    if let Some(store) = store.as_ref().filter(|s| options.use_cache && s.has_run(&run_id)) {
        info!(%run_id, "loading cached run");
        let manifest = store.load_manifest(&run_id)?;
        let records = store.load_timeseries(&run_id)?;
        return Ok(RunResponse {
            run_id,
            failure: failure_of(&manifest.status),
            manifest,
            records,
            loaded_from_cache: true,
        });
    }

    let (records, status) = match prepared.simulate()? {
        Ok(history) => {
            let records = records_from_history(&history);
            let status = RunStatus::Completed {
                records: records.len(),
            };
            (records, status)
        }
        Err(failure) => (
            records_from_history(&failure.history),
            RunStatus::from_failure(&failure),
        ),
    };

    let manifest = RunManifest {
        run_id: run_id.clone(),
        scenario_name: prepared.scenario.scenario.name.clone(),
        control_mode: prepared.scenario.scenario.control.label().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        options: prepared.sim_options,
        solver_version: options.solver_version.clone(),
        status,
    };

    if let Some(store) = &store {
        store.save_run(&manifest, &records)?;
    }

    Ok(RunResponse {
        run_id,
        failure: failure_of(&manifest.status),
        manifest,
        records,
        loaded_from_cache: false,
    })
}
