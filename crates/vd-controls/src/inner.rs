//! Inner current controller.

use serde::{Deserialize, Serialize};
use vd_core::{StateVar, StateVector};
use vd_model::ModelParams;

use crate::error::{ControlError, ControlResult};
use crate::signal::{CurrentReferences, VoltageCommand};

/// Integrator slots for current controllers with integral action.
///
/// The proportional controller never writes them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    pub integral_d: f64,
    pub integral_q: f64,
}

/// Maps current references and the measured state to a raw voltage command.
pub trait CurrentController {
    fn voltage_command(
        &self,
        refs: &CurrentReferences,
        x: &StateVector,
        state: &mut ControllerState,
    ) -> VoltageCommand;
}

/// `v* = Kp (i_ref - i)` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionalCurrentController {
    pub kp_d: f64,
    pub kp_q: f64,
}

impl ProportionalCurrentController {
    pub fn new(kp_d: f64, kp_q: f64) -> ControlResult<Self> {
        if !(kp_d.is_finite() && kp_q.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "gains must be finite",
            });
        }
        if kp_d < 0.0 || kp_q < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "gains must be non-negative",
            });
        }
        Ok(Self { kp_d, kp_q })
    }

    /// Controller using `Kp_id` and `Kp_iq` from the model parameters.
    pub fn from_params(params: &ModelParams) -> ControlResult<Self> {
        Self::new(params.kp_id, params.kp_iq)
    }
}

impl CurrentController for ProportionalCurrentController {
    fn voltage_command(
        &self,
        refs: &CurrentReferences,
        x: &StateVector,
        _state: &mut ControllerState,
    ) -> VoltageCommand {
        VoltageCommand {
            vd: self.kp_d * (refs.id_ref - x[StateVar::Id]),
            vq: self.kp_q * (refs.iq_ref - x[StateVar::Iq]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_law() {
        let c = ProportionalCurrentController::new(2.0, 3.0).unwrap();
        let refs = CurrentReferences {
            id_ref: 0.5,
            iq_ref: -0.25,
        };
        let x = StateVector::from_array([0.25, 0.0, 1.0]);
        let mut state = ControllerState::default();
        let cmd = c.voltage_command(&refs, &x, &mut state);
        assert_eq!(cmd, VoltageCommand::new(0.5, -0.75));
        assert_eq!(state, ControllerState::default());
    }

    #[test]
    fn zero_error_gives_zero_command() {
        let c = ProportionalCurrentController::new(5.0, 5.0).unwrap();
        let refs = CurrentReferences {
            id_ref: 0.3,
            iq_ref: 0.1,
        };
        let x = StateVector::from_array([0.3, 0.1, 2.0]);
        let cmd = c.voltage_command(&refs, &x, &mut ControllerState::default());
        assert_eq!(cmd.magnitude(), 0.0);
    }

    #[test]
    fn rejects_bad_gains() {
        assert!(ProportionalCurrentController::new(-1.0, 1.0).is_err());
        assert!(ProportionalCurrentController::new(1.0, f64::INFINITY).is_err());
    }
}
