//! References that change during a run.

mod common;

use common::{initial, nominal_params, pq};
use vd_controls::{ControlMode, Reference, ReferenceStep};
use vd_sim::{SimOptions, Simulation, StepRecord};

const DT: f64 = 5e-4;

fn options() -> SimOptions {
    SimOptions {
        dt: DT,
        t_end: 0.02,
        ..SimOptions::default()
    }
}

fn stepped(initial: f64, time: f64, value: f64) -> Reference {
    Reference::Stepped {
        initial,
        steps: vec![ReferenceStep { time, value }],
    }
}

// Controls of record k + 1 were computed at the start of step k.
fn control_time(record: &StepRecord) -> f64 {
    (record.step - 1) as f64 * DT
}

#[test]
fn pq_power_step_switches_current_reference() {
    let mode = ControlMode::Pq {
        p_ref: stepped(0.5, 0.01, 0.8),
        q_ref: 0.0.into(),
    };
    let sim = Simulation::new(nominal_params(), mode, options()).unwrap();
    let history = sim.run(&initial(0.0, 0.0, 1.0)).unwrap();

    let (mut before, mut after) = (0, 0);
    for record in history.iter().skip(1) {
        let c = record.controls.unwrap();
        let t = control_time(record);
        if t < 0.0095 {
            assert_eq!(c.id_ref, 0.5, "at t = {t}");
            before += 1;
        } else if t > 0.0105 {
            assert_eq!(c.id_ref, 0.8, "at t = {t}");
            after += 1;
        }
        assert_eq!(c.vdc_ref, None);
    }
    assert!(before > 0 && after > 0);
}

#[test]
fn vdc_q_reports_references_in_history() {
    let mode = ControlMode::VdcQ {
        id_ref: stepped(0.1, 0.01, 0.3),
        iq_ref: 0.05.into(),
        vdc_ref: Some(stepped(1.0, 0.015, 1.02)),
    };
    let sim = Simulation::new(nominal_params(), mode, options()).unwrap();
    let history = sim.run(&initial(0.1, 0.0, 1.0)).unwrap();
    assert_eq!(history.len(), sim.options().n_steps() + 1);

    for record in history.iter().skip(1) {
        let c = record.controls.unwrap();
        let t = control_time(record);
        assert_eq!(c.iq_ref, 0.05);
        if t < 0.0095 {
            assert_eq!(c.id_ref, 0.1);
            assert_eq!(c.vdc_ref, Some(1.0));
        } else if t > 0.0155 {
            assert_eq!(c.id_ref, 0.3);
            assert_eq!(c.vdc_ref, Some(1.02));
        }
    }
}

#[test]
fn vdc_q_without_voltage_reference_reports_none() {
    let mode = ControlMode::VdcQ {
        id_ref: 0.2.into(),
        iq_ref: 0.0.into(),
        vdc_ref: None,
    };
    let sim = Simulation::new(nominal_params(), mode, options()).unwrap();
    let history = sim.run(&initial(0.0, 0.0, 1.0)).unwrap();
    assert!(
        history
            .iter()
            .skip(1)
            .all(|r| r.controls.is_some_and(|c| c.vdc_ref.is_none() && c.id_ref == 0.2))
    );
}
