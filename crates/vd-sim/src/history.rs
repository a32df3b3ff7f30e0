//! Recorded trajectory of a run.

use serde::{Deserialize, Serialize};
use vd_core::{AlgebraicVector, StateVar, StateVector};

/// Control quantities of the step that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub id_ref: f64,
    pub iq_ref: f64,
    /// DC voltage reference, reported in VdcQ mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdc_ref: Option<f64>,
    /// Saturated converter voltage actually applied.
    pub v_conv_d: f64,
    pub v_conv_q: f64,
    pub saturated: bool,
}

/// One accepted point of the trajectory.
///
/// Record `k + 1` holds the state reached by step `k` together with the
/// algebraic vector solved during that step. Record 0 is the initial
/// condition and has no control snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub time: f64,
    pub x: StateVector,
    pub y: AlgebraicVector,
    pub controls: Option<ControlSnapshot>,
    pub nr_iterations: usize,
}

/// Append-only sequence of records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeHistory {
    records: Vec<StepRecord>,
}

impl TimeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            records: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.time).collect()
    }

    /// Time series of a single state.
    pub fn state_series(&self, var: StateVar) -> Vec<f64> {
        self.records.iter().map(|r| r.x[var]).collect()
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a TimeHistory {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
