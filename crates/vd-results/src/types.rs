//! Result data types.

use serde::{Deserialize, Serialize};
use vd_sim::{FailureKind, SimFailure, SimOptions, StepRecord, TimeHistory};

pub type RunId = String;

/// Metadata stored next to a run's timeseries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    pub control_mode: String,
    pub timestamp: String,
    pub options: SimOptions,
    pub solver_version: String,
    pub status: RunStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunStatus {
    Completed {
        records: usize,
    },
    /// The stored timeseries holds the records accepted before the failure.
    Failed {
        kind: FailureKind,
        step: Option<usize>,
        message: String,
        records: usize,
    },
}

impl RunStatus {
    pub fn from_failure(failure: &SimFailure) -> Self {
        RunStatus::Failed {
            kind: failure.kind(),
            step: failure.error.step(),
            message: failure.error.to_string(),
            records: failure.history.len(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed { .. })
    }
}

/// One exported row. Column names follow the model's variable names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesRecord {
    pub step: usize,
    pub time: f64,
    pub id: f64,
    pub iq: f64,
    #[serde(rename = "Vdc")]
    pub vdc: f64,
    #[serde(rename = "Idc")]
    pub idc: f64,
    #[serde(rename = "P_ac")]
    pub p_ac: f64,
    #[serde(rename = "Q_ac")]
    pub q_ac: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<ControlValues>,
    pub nr_iterations: usize,
}

/// Control columns; absent on the initial-condition row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlValues {
    pub id_ref: f64,
    pub iq_ref: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdc_ref: Option<f64>,
    pub v_conv_d: f64,
    pub v_conv_q: f64,
    pub saturated: bool,
}

impl From<&StepRecord> for TimeseriesRecord {
    fn from(r: &StepRecord) -> Self {
        let [id, iq, vdc] = r.x.to_array();
        let [idc, p_ac, q_ac] = r.y.to_array();
        Self {
            step: r.step,
            time: r.time,
            id,
            iq,
            vdc,
            idc,
            p_ac,
            q_ac,
            controls: r.controls.map(|c| ControlValues {
                id_ref: c.id_ref,
                iq_ref: c.iq_ref,
                vdc_ref: c.vdc_ref,
                v_conv_d: c.v_conv_d,
                v_conv_q: c.v_conv_q,
                saturated: c.saturated,
            }),
            nr_iterations: r.nr_iterations,
        }
    }
}

pub fn records_from_history(history: &TimeHistory) -> Vec<TimeseriesRecord> {
    history.iter().map(TimeseriesRecord::from).collect()
}
