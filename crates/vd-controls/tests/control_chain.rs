//! References, proportional command and saturation chained as in a step.

use vd_controls::{
    ControlMode, ControllerState, CurrentController, ProportionalCurrentController, saturate,
};
use vd_core::StateVector;
use vd_model::ModelParams;

fn params() -> ModelParams {
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

#[test]
fn nominal_pq_command_stays_inside_limit() {
    let p = params();
    let mode = ControlMode::Pq {
        p_ref: 0.5.into(),
        q_ref: 0.0.into(),
    };
    let controller = ProportionalCurrentController::from_params(&p).unwrap();
    let x = StateVector::from_array([0.0, 0.0, 1.0]);

    let refs = mode.current_references(0.0, &p);
    let raw = controller.voltage_command(&refs, &x, &mut ControllerState::default());
    let out = saturate(raw, p.v_max);

    assert_eq!(refs.id_ref, 0.5);
    assert_eq!(refs.iq_ref, 0.0);
    assert!((raw.vd - 1.1).abs() < 1e-12);
    assert!(!out.clipped);
}

#[test]
fn large_error_is_clipped() {
    let p = params();
    let mode = ControlMode::VdcQ {
        id_ref: 2.0.into(),
        iq_ref: 1.0.into(),
        vdc_ref: None,
    };
    let controller = ProportionalCurrentController::from_params(&p).unwrap();
    let x = StateVector::from_array([0.0, 0.0, 1.0]);

    let refs = mode.current_references(0.0, &p);
    let out = saturate(
        controller.voltage_command(&refs, &x, &mut ControllerState::default()),
        p.v_max,
    );
    assert!(out.clipped);
    assert!((out.command.magnitude() - 1.2).abs() < 1e-12);
}
