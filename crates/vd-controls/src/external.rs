//! External (outer) controller: scenario to current references.

use vd_model::ModelParams;

use crate::scenario::ControlMode;
use crate::signal::CurrentReferences;

impl ControlMode {
    /// Current references at time `t`.
    ///
    /// In PQ mode the division by `v_pcc_d` is not guarded; a zero PCC
    /// voltage yields non-finite references that surface downstream.
    pub fn current_references(&self, t: f64, params: &ModelParams) -> CurrentReferences {
        match self {
            ControlMode::Pq { p_ref, q_ref } => CurrentReferences {
                id_ref: p_ref.value_at(t) / params.v_pcc_d,
                iq_ref: q_ref.value_at(t) / params.v_pcc_d,
            },
            ControlMode::VdcQ { id_ref, iq_ref, .. } => CurrentReferences {
                id_ref: id_ref.value_at(t),
                iq_ref: iq_ref.value_at(t),
            },
        }
    }

    /// DC voltage reference for reporting, if the mode carries one.
    pub fn vdc_reference(&self, t: f64) -> Option<f64> {
        match self {
            ControlMode::VdcQ {
                vdc_ref: Some(r), ..
            } => Some(r.value_at(t)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Reference, ReferenceStep};

    fn params(v_pcc_d: f64) -> ModelParams {
        ModelParams {
            l: 0.1,
            r: 0.01,
            cdc: 1.0,
            omega: 1.0,
            v_max: 1.2,
            kp_id: 2.0,
            kp_iq: 2.0,
            v_pcc_d,
            v_pcc_q: 0.0,
        }
    }

    #[test]
    fn pq_divides_by_pcc_voltage() {
        let mode = ControlMode::Pq {
            p_ref: 0.5.into(),
            q_ref: (-0.2).into(),
        };
        let refs = mode.current_references(0.0, &params(0.5));
        assert_eq!(refs.id_ref, 1.0);
        assert_eq!(refs.iq_ref, -0.4);
        assert_eq!(mode.vdc_reference(0.0), None);
    }

    #[test]
    fn pq_zero_pcc_voltage_is_not_guarded() {
        let mode = ControlMode::Pq {
            p_ref: 0.5.into(),
            q_ref: 0.0.into(),
        };
        let refs = mode.current_references(0.0, &params(0.0));
        assert!(!refs.id_ref.is_finite());
        assert!(!refs.iq_ref.is_finite());
    }

    #[test]
    fn vdc_q_passes_schedules_through() {
        let mode = ControlMode::VdcQ {
            id_ref: Reference::Stepped {
                initial: 0.1,
                steps: vec![ReferenceStep {
                    time: 0.05,
                    value: 0.3,
                }],
            },
            iq_ref: 0.0.into(),
            vdc_ref: Some(1.0.into()),
        };
        let p = params(2.0);
        assert_eq!(mode.current_references(0.0, &p).id_ref, 0.1);
        assert_eq!(mode.current_references(0.06, &p).id_ref, 0.3);
        assert_eq!(mode.vdc_reference(0.06), Some(1.0));
    }
}
