//! Scenario file schema.

use serde::{Deserialize, Serialize};
use vd_controls::Scenario;
use vd_sim::{InitialConditions, IntegratorKind, SimOptions};
use vd_solver::NewtonConfig;

/// Contents of a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioFile {
    #[serde(flatten)]
    pub scenario: Scenario,
    pub initial_conditions: InitialConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverSettings>,
}

impl ScenarioFile {
    /// Options from the file's solver block layered over `base`.
    pub fn sim_options(&self, base: SimOptions) -> SimOptions {
        match &self.solver {
            Some(settings) => settings.apply(base),
            None => base,
        }
    }
}

/// Optional solver overrides stored with a scenario.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrator: Option<IntegratorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newton: Option<NewtonConfig>,
}

impl SolverSettings {
    pub fn apply(&self, base: SimOptions) -> SimOptions {
        SimOptions {
            dt: self.dt.unwrap_or(base.dt),
            t_end: self.t_end.unwrap_or(base.t_end),
            integrator: self.integrator.unwrap_or(base.integrator),
            newton: self.newton.unwrap_or(base.newton),
        }
    }
}
