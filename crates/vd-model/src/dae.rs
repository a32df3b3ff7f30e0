//! Differential and algebraic equations.
//!
//! ```text
//! L   did/dt  = v_conv_d - R id + omega L iq - v_pcc_d
//! L   diq/dt  = v_conv_q - R iq - omega L id - v_pcc_q
//! Cdc dVdc/dt = Idc
//!
//! g_Idc = Idc  - P_ac / Vdc
//! g_P   = P_ac - 1.5 (v_pcc_d id + v_pcc_q iq)
//! g_Q   = Q_ac - 1.5 (v_pcc_q id - v_pcc_d iq)
//! ```

use vd_core::{AlgebraicVar, AlgebraicVector, Real, StateVar, StateVector};

use crate::params::ModelParams;

/// dq power-invariance factor used in the PCC power equations.
pub const POWER_FACTOR: Real = 1.5;

/// Voltages that enter the model but are not part of x or y.
///
/// The converter voltage is the saturated command; it is held constant while
/// the algebraic system is solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInputs {
    pub v_conv_d: Real,
    pub v_conv_q: Real,
    pub v_pcc_d: Real,
    pub v_pcc_q: Real,
}

impl ModelInputs {
    /// Inputs for a converter command, with the PCC voltage taken from `params`.
    pub fn from_command(v_conv_d: Real, v_conv_q: Real, params: &ModelParams) -> Self {
        Self {
            v_conv_d,
            v_conv_q,
            v_pcc_d: params.v_pcc_d,
            v_pcc_q: params.v_pcc_q,
        }
    }
}

/// State derivative `x_dot = f(x, y)`.
pub fn f(
    x: &StateVector,
    y: &AlgebraicVector,
    params: &ModelParams,
    inputs: &ModelInputs,
) -> StateVector {
    let id = x[StateVar::Id];
    let iq = x[StateVar::Iq];
    let idc = y[AlgebraicVar::Idc];
    let ModelParams { l, r, cdc, omega, .. } = *params;

    let did = (inputs.v_conv_d - r * id + omega * l * iq - inputs.v_pcc_d) / l;
    let diq = (inputs.v_conv_q - r * iq - omega * l * id - inputs.v_pcc_q) / l;
    let dvdc = idc / cdc;

    StateVector::from_array([did, diq, dvdc])
}

/// Algebraic residual `g(x, y)`, rows in canonical algebraic order.
///
/// `params` is not used by the current equations; it is kept so `f` and `g`
/// share one signature.
pub fn g(
    x: &StateVector,
    y: &AlgebraicVector,
    _params: &ModelParams,
    inputs: &ModelInputs,
) -> AlgebraicVector {
    let id = x[StateVar::Id];
    let iq = x[StateVar::Iq];
    let vdc = x[StateVar::Vdc];
    let idc = y[AlgebraicVar::Idc];
    let p_ac = y[AlgebraicVar::PAc];
    let q_ac = y[AlgebraicVar::QAc];

    let p_calc = POWER_FACTOR * (inputs.v_pcc_d * id + inputs.v_pcc_q * iq);
    let q_calc = POWER_FACTOR * (inputs.v_pcc_q * id - inputs.v_pcc_d * iq);

    let mut residual = AlgebraicVector::zeros();
    residual[AlgebraicVar::Idc] = idc - p_ac / vdc;
    residual[AlgebraicVar::PAc] = p_ac - p_calc;
    residual[AlgebraicVar::QAc] = q_ac - q_calc;
    residual
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ModelParams {
        ModelParams {
            l: 0.1,
            r: 0.01,
            cdc: 0.5,
            omega: 1.0,
            v_max: 1.2,
            kp_id: 2.0,
            kp_iq: 2.0,
            v_pcc_d: 1.0,
            v_pcc_q: 0.0,
        }
    }

    #[test]
    fn f_matches_hand_computation() {
        let p = params();
        let x = StateVector::from_array([0.2, -0.1, 1.0]);
        let y = AlgebraicVector::from_array([0.3, 0.3, 0.15]);
        let u = ModelInputs {
            v_conv_d: 1.05,
            v_conv_q: 0.02,
            v_pcc_d: 1.0,
            v_pcc_q: 0.0,
        };
        let xdot = f(&x, &y, &p, &u);

        let did = (1.05 - 0.01 * 0.2 + 1.0 * 0.1 * -0.1 - 1.0) / 0.1;
        let diq = (0.02 - 0.01 * -0.1 - 1.0 * 0.1 * 0.2 - 0.0) / 0.1;
        assert!((xdot[StateVar::Id] - did).abs() < 1e-12);
        assert!((xdot[StateVar::Iq] - diq).abs() < 1e-12);
        assert!((xdot[StateVar::Vdc] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn g_vanishes_at_consistent_point() {
        let p = params();
        let u = ModelInputs::from_command(0.0, 0.0, &p);
        let x = StateVector::from_array([0.4, 0.2, 2.0]);
        let p_ac = 1.5 * 0.4;
        let q_ac = 1.5 * -0.2;
        let y = AlgebraicVector::from_array([p_ac / 2.0, p_ac, q_ac]);
        let r = g(&x, &y, &p, &u);
        assert!(r.max_abs() < 1e-15);
    }

    #[test]
    fn g_is_non_finite_at_zero_dc_voltage() {
        let p = params();
        let u = ModelInputs::from_command(0.0, 0.0, &p);
        let x = StateVector::from_array([0.0, 0.0, 0.0]);
        let y = AlgebraicVector::zeros();
        let r = g(&x, &y, &p, &u);
        assert!(!r.is_finite());
    }
}
