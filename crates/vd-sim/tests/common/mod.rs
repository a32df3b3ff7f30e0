#![allow(dead_code)]

use std::collections::BTreeMap;

use vd_controls::ControlMode;
use vd_model::ModelParams;
use vd_sim::InitialConditions;

pub fn nominal_params() -> ModelParams {
    ModelParams {
        l: 0.1,
        r: 0.01,
        cdc: 1.0,
        omega: 1.0,
        v_max: 1.2,
        kp_id: 2.2,
        kp_iq: 2.2,
        v_pcc_d: 1.0,
        v_pcc_q: 0.0,
    }
}

pub fn pq(p_ref: f64, q_ref: f64) -> ControlMode {
    ControlMode::Pq {
        p_ref: p_ref.into(),
        q_ref: q_ref.into(),
    }
}

pub fn initial(id: f64, iq: f64, vdc: f64) -> InitialConditions {
    let map = |pairs: &[(&str, f64)]| -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    };
    InitialConditions {
        x: map(&[("id", id), ("iq", iq), ("Vdc", vdc)]),
        y: map(&[("Idc", 0.0), ("P_ac", 0.0), ("Q_ac", 0.0)]),
    }
}
