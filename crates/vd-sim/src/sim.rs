//! Simulation driver and the per-step sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vd_controls::{
    ControlMode, ControllerState, CurrentController, ProportionalCurrentController, saturate,
};
use vd_core::{AlgebraicVector, StateVector, VdError};
use vd_model::{ModelInputs, ModelParams, f};
use vd_solver::{NewtonConfig, solve_algebraic};

use crate::error::{SimError, SimFailure, SimResult};
use crate::history::{ControlSnapshot, StepRecord, TimeHistory};
use crate::integrator::{Integrator, IntegratorKind};

/// Largest accepted `floor(t_end / dt)`.
pub const MAX_STEPS: usize = u32::MAX as usize;

// Records reserved up front; longer runs grow the history as they go.
const RESERVED_RECORDS: usize = 1 << 16;

/// Options for simulation runs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    pub integrator: IntegratorKind,
    pub newton: NewtonConfig,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 5e-4,
            t_end: 1.0,
            integrator: IntegratorKind::default(),
            newton: NewtonConfig::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be finite and positive",
            });
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(SimError::InvalidArg {
                what: "t_end must be finite and non-negative",
            });
        }
        if (self.t_end / self.dt).floor() > MAX_STEPS as f64 {
            return Err(SimError::InvalidArg {
                what: "t_end / dt exceeds the maximum step count",
            });
        }
        self.newton
            .validate()
            .map_err(|_| SimError::InvalidArg {
                what: "newton settings need max_iterations >= 1 and a positive tolerance",
            })
    }

    /// Number of steps, `floor(t_end / dt)`.
    pub fn n_steps(&self) -> usize {
        (self.t_end / self.dt).floor() as usize
    }

    /// Time at the start of step `k`.
    pub fn time_of(&self, k: usize) -> f64 {
        k as f64 * self.dt
    }
}

/// Named initial values for `x` and `y`.
///
/// Every state and every algebraic variable must be present when a run
/// starts; nothing is defaulted here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub x: BTreeMap<String, f64>,
    #[serde(default)]
    pub y: BTreeMap<String, f64>,
}

impl InitialConditions {
    pub fn to_vectors(&self) -> SimResult<(StateVector, AlgebraicVector)> {
        let x = StateVector::from_map(&self.x).map_err(initial_error)?;
        let y = AlgebraicVector::from_map(&self.y).map_err(initial_error)?;
        Ok((x, y))
    }
}

fn initial_error(e: VdError) -> SimError {
    match e {
        VdError::MissingVariable { name } => SimError::MissingVariable { step: 0, name },
        other => SimError::Backend {
            message: other.to_string(),
        },
    }
}

/// Result of one accepted step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub x_next: StateVector,
    /// Algebraic vector solved at the start-of-step state.
    pub y: AlgebraicVector,
    pub controls: ControlSnapshot,
    pub nr_iterations: usize,
}

/// A configured simulation. Running it does not mutate it.
#[derive(Clone, Debug)]
pub struct Simulation<C = ProportionalCurrentController> {
    params: ModelParams,
    mode: ControlMode,
    controller: C,
    options: SimOptions,
}

impl Simulation<ProportionalCurrentController> {
    /// Simulation with the proportional controller built from `params`.
    pub fn new(params: ModelParams, mode: ControlMode, options: SimOptions) -> SimResult<Self> {
        let controller =
            ProportionalCurrentController::from_params(&params).map_err(|e| SimError::Backend {
                message: e.to_string(),
            })?;
        Self::with_controller(params, mode, controller, options)
    }
}

impl<C: CurrentController> Simulation<C> {
    pub fn with_controller(
        params: ModelParams,
        mode: ControlMode,
        controller: C,
        options: SimOptions,
    ) -> SimResult<Self> {
        options.validate()?;
        Ok(Self {
            params,
            mode,
            controller,
            options,
        })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Step `k` from `x`, using `y_guess` as the Newton starting point.
    pub fn step(
        &self,
        k: usize,
        x: &StateVector,
        y_guess: &AlgebraicVector,
        state: &mut ControllerState,
    ) -> SimResult<StepOutcome> {
        let t = self.options.time_of(k);
        let params = &self.params;

        let refs = self.mode.current_references(t, params);
        let raw = self.controller.voltage_command(&refs, x, state);
        let applied = saturate(raw, params.v_max);
        let inputs = ModelInputs::from_command(applied.command.vd, applied.command.vq, params);

        let solution = solve_algebraic(x, y_guess, params, &inputs, &self.options.newton)
            .map_err(|e| SimError::from_solver(e, k, t))?;
        let y = solution.y;

        let x_dot = f(x, &y, params, &inputs);
        let rhs = |xs: &StateVector| f(xs, &y, params, &inputs);
        let x_next = self.options.integrator.step(x, &x_dot, self.options.dt, &rhs);

        Ok(StepOutcome {
            x_next,
            y,
            controls: ControlSnapshot {
                id_ref: refs.id_ref,
                iq_ref: refs.iq_ref,
                vdc_ref: self.mode.vdc_reference(t),
                v_conv_d: applied.command.vd,
                v_conv_q: applied.command.vq,
                saturated: applied.clipped,
            },
            nr_iterations: solution.iterations,
        })
    }

    /// Run from `ic` to `t_end`.
    ///
    /// On failure the returned [`SimFailure`] carries every record accepted
    /// before the failing step.
    pub fn run(&self, ic: &InitialConditions) -> Result<TimeHistory, SimFailure> {
        let n_steps = self.options.n_steps();
        let mut history =
            TimeHistory::with_capacity(n_steps.saturating_add(1).min(RESERVED_RECORDS));

        let (mut x, mut y) = match ic.to_vectors() {
            Ok(v) => v,
            Err(error) => {
                warn!(%error, "initial conditions rejected");
                return Err(SimFailure { error, history });
            }
        };

        info!(
            mode = self.mode.label(),
            n_steps,
            dt = self.options.dt,
            integrator = self.options.integrator.as_str(),
            "simulation started"
        );

        history.push(StepRecord {
            step: 0,
            time: 0.0,
            x,
            y,
            controls: None,
            nr_iterations: 0,
        });

        let mut state = ControllerState::default();
        let mut saturated_steps = 0usize;
        for k in 0..n_steps {
            let outcome = match self.step(k, &x, &y, &mut state) {
                Ok(o) => o,
                Err(error) => {
                    warn!(step = k, %error, "simulation halted");
                    return Err(SimFailure { error, history });
                }
            };
            if outcome.controls.saturated {
                saturated_steps += 1;
            }
            x = outcome.x_next;
            y = outcome.y;
            history.push(StepRecord {
                step: k + 1,
                time: self.options.time_of(k + 1),
                x,
                y,
                controls: Some(outcome.controls),
                nr_iterations: outcome.nr_iterations,
            });
        }

        debug!(saturated_steps, "saturation summary");
        info!(records = history.len(), "simulation finished");
        Ok(history)
    }
}
