//! Fixed-step RMS simulation of the converter DAE.
//!
//! Provides:
//! - the six-stage step sequence (references, proportional command,
//!   saturation, algebraic solve, derivative, integration)
//! - forward Euler plus fixed-step RK2 and RK4 integrators
//! - time history recording with failure reporting that keeps the accepted
//!   prefix of the run

pub mod error;
pub mod history;
pub mod integrator;
pub mod sim;

pub use error::{FailureKind, SimError, SimFailure, SimResult};
pub use history::{ControlSnapshot, StepRecord, TimeHistory};
pub use integrator::{ForwardEuler, Integrator, IntegratorKind, MidpointRk2, RK4, integrate};
pub use sim::{InitialConditions, MAX_STEPS, SimOptions, Simulation, StepOutcome};
