use std::path::{Path, PathBuf};

fn demos() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn demo_params_load_and_validate() {
    for name in ["nominal.yaml", "weak_damping.json"] {
        let path = demos().join("params").join(name);
        let params = vd_project::load_params(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        assert_eq!(params.v_pcc_q, 0.0);
    }
}

#[test]
fn demo_scenarios_load_and_validate() {
    let examples = [
        "pq_nominal.yaml",
        "pq_power_step.yaml",
        "vdcq_currents.json",
    ];
    for name in examples {
        let path = demos().join("scenarios").join(name);
        let file = vd_project::load_scenario(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        assert!(!file.scenario.name.is_empty());
        assert_eq!(file.initial_conditions.x.len(), 3);
    }
}

#[test]
fn solver_block_overrides_defaults() {
    let path = demos().join("scenarios/pq_power_step.yaml");
    let file = vd_project::load_scenario(&path).unwrap();
    let opts = file.sim_options(vd_sim::SimOptions::default());
    assert_eq!(opts.t_end, 0.8);
    assert_eq!(opts.dt, vd_sim::SimOptions::default().dt);
    assert_eq!(opts.newton.tolerance, 1e-10);
    assert_eq!(opts.newton.max_iterations, 20);
    assert_eq!(opts.newton.norm, vd_solver::ResidualNorm::L2);
}
