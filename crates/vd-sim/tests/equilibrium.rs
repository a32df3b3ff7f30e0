//! Closed-loop convergence to the fixed point of the proportional law.
//!
//! With `P_ref = v_pcc_d^2 / Kp_id` and `Q_ref = 0` the converter voltage
//! equals the PCC voltage at `id = iq = 0`, so both currents decay to zero
//! and the DC voltage settles.

mod common;

use common::{initial, nominal_params, pq};
use proptest::prelude::*;
use vd_core::StateVar;
use vd_model::ModelParams;
use vd_sim::{SimOptions, Simulation};

fn settle(params: ModelParams, t_end: f64, dt: f64) -> vd_sim::TimeHistory {
    let p_ref = params.v_pcc_d * params.v_pcc_d / params.kp_id;
    let opts = SimOptions {
        dt,
        t_end,
        ..SimOptions::default()
    };
    let sim = Simulation::new(params, pq(p_ref, 0.0), opts).unwrap();
    sim.run(&initial(0.1, -0.05, 1.0)).unwrap()
}

#[test]
fn currents_decay_to_fixed_point() {
    let params = ModelParams {
        kp_id: 2.0,
        kp_iq: 2.0,
        v_max: 10.0,
        ..nominal_params()
    };
    let history = settle(params, 1.0, 5e-4);
    let last = history.last().unwrap();
    assert!(last.x[StateVar::Id].abs() < 1e-6);
    assert!(last.x[StateVar::Iq].abs() < 1e-6);

    let vdc = history.state_series(StateVar::Vdc);
    let tail = &vdc[vdc.len() - 100..];
    let spread = tail.iter().cloned().fold(f64::MIN, f64::max)
        - tail.iter().cloned().fold(f64::MAX, f64::min);
    assert!(spread < 1e-6);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn fixed_point_is_reached_across_parameters(
        kp in 1.0f64..4.0,
        l in 0.05f64..0.2,
    ) {
        let params = ModelParams {
            l,
            kp_id: kp,
            kp_iq: kp,
            v_max: 10.0,
            ..nominal_params()
        };
        let history = settle(params, 4.0, 1e-3);
        let last = history.last().unwrap();
        prop_assert!(last.x[StateVar::Id].abs() < 1e-6);
        prop_assert!(last.x[StateVar::Iq].abs() < 1e-6);
        prop_assert!(history.iter().skip(1).all(|r| !r.controls.unwrap().saturated));
    }
}
