use std::path::{Path, PathBuf};

use vd_app::{
    BatchCase, PreparedRun, RunOptions, RunOverrides, RunRequest, execute, prepare, run_batch,
};
use vd_sim::FailureKind;

fn demos() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn short_run() -> RunOverrides {
    RunOverrides {
        t_end: Some(0.05),
        ..RunOverrides::default()
    }
}

#[test]
fn nominal_run_completes_and_is_cached() {
    let params = demos().join("params/nominal.yaml");
    let scenario = demos().join("scenarios/pq_nominal.yaml");
    let store = scratch("vd_app_cache");

    let request = RunRequest {
        params_path: &params,
        scenario_path: &scenario,
        overrides: short_run(),
        options: RunOptions {
            store_dir: Some(store.clone()),
            ..RunOptions::default()
        },
    };

    let first = execute(&request).unwrap();
    assert!(!first.loaded_from_cache);
    assert!(first.failure.is_none());
    assert_eq!(first.records.len(), 101);
    assert!(first.manifest.status.is_completed());

    let second = execute(&request).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.records.len(), first.records.len());

    let uncached = RunRequest {
        options: RunOptions {
            use_cache: false,
            store_dir: Some(store),
            ..RunOptions::default()
        },
        ..request
    };
    assert!(!execute(&uncached).unwrap().loaded_from_cache);
}

#[test]
fn failed_run_reports_kind_and_prefix() {
    let dir = scratch("vd_app_failure");
    let scenario = dir.join("dead_dc_link.yaml");
    std::fs::write(
        &scenario,
        "name: dead-dc-link\n\
         control: { mode: pq, p_ref: 0.5, q_ref: 0.0 }\n\
         initial_conditions:\n  x: { id: 0.0, iq: 0.0, Vdc: 0.0 }\n",
    )
    .unwrap();
    let params = demos().join("params/nominal.yaml");

    let response = execute(&RunRequest {
        params_path: &params,
        scenario_path: &scenario,
        overrides: short_run(),
        options: RunOptions::default(),
    })
    .unwrap();

    let failure = response.failure.unwrap();
    assert_eq!(failure.kind, FailureKind::AlgebraicConvergence);
    assert_eq!(failure.step, Some(0));
    assert_eq!(response.records.len(), 1);
}

#[test]
fn invalid_override_is_rejected() {
    let params = demos().join("params/nominal.yaml");
    let scenario = demos().join("scenarios/pq_nominal.yaml");
    let err = prepare(&RunRequest {
        params_path: &params,
        scenario_path: &scenario,
        overrides: RunOverrides {
            dt: Some(-1.0),
            ..RunOverrides::default()
        },
        options: RunOptions::default(),
    })
    .unwrap_err();
    assert!(matches!(err, vd_app::AppError::InvalidInput(_)));
}

#[test]
fn parallel_batch_matches_sequential() {
    let params = vd_project::load_params(&demos().join("params/nominal.yaml")).unwrap();
    let cases: Vec<BatchCase> = ["pq_nominal.yaml", "pq_power_step.yaml", "vdcq_currents.json"]
        .iter()
        .map(|name| {
            let scenario =
                vd_project::load_scenario(&demos().join("scenarios").join(name)).unwrap();
            BatchCase {
                label: name.to_string(),
                run: PreparedRun::new(params, scenario, &short_run()).unwrap(),
            }
        })
        .collect();

    let sequential = run_batch(&cases, false);
    let parallel = run_batch(&cases, true);

    assert_eq!(sequential.len(), 3);
    for (s, p) in sequential.iter().zip(&parallel) {
        assert_eq!(s.label, p.label);
        assert!(s.digest().is_some());
        assert_eq!(s.digest(), p.digest());
    }
}
