//! Scenario description: control mode and reference trajectories.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// A step change of a reference at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStep {
    pub time: f64,
    pub value: f64,
}

/// Reference trajectory, either constant or piecewise constant.
///
/// In YAML a constant is a bare number; a schedule is a map with `initial`
/// and `steps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Constant(f64),
    Stepped {
        initial: f64,
        #[serde(default)]
        steps: Vec<ReferenceStep>,
    },
}

impl Reference {
    /// Value in effect at time `t`. A step applies from its own time onward.
    pub fn value_at(&self, t: f64) -> f64 {
        match self {
            Reference::Constant(v) => *v,
            Reference::Stepped { initial, steps } => steps
                .iter()
                .take_while(|s| s.time <= t)
                .last()
                .map_or(*initial, |s| s.value),
        }
    }

    /// Check values are finite and step times non-negative and non-decreasing.
    pub fn validate(&self, name: &str) -> ControlResult<()> {
        let invalid = |what: String| ControlError::InvalidReference {
            name: name.to_string(),
            what,
        };
        match self {
            Reference::Constant(v) => {
                if !v.is_finite() {
                    return Err(invalid(format!("value {v} is not finite")));
                }
            }
            Reference::Stepped { initial, steps } => {
                if !initial.is_finite() {
                    return Err(invalid(format!("initial value {initial} is not finite")));
                }
                let mut last = 0.0;
                for (i, step) in steps.iter().enumerate() {
                    if !step.value.is_finite() {
                        return Err(invalid(format!("step {i} value is not finite")));
                    }
                    if !step.time.is_finite() || step.time < last {
                        return Err(invalid(format!(
                            "step {i} time {} must be finite, non-negative and non-decreasing",
                            step.time
                        )));
                    }
                    last = step.time;
                }
            }
        }
        Ok(())
    }
}

impl From<f64> for Reference {
    fn from(v: f64) -> Self {
        Reference::Constant(v)
    }
}

/// Outer control mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ControlMode {
    /// Active and reactive power references at the PCC.
    Pq { p_ref: Reference, q_ref: Reference },
    /// Current references given directly. `vdc_ref` is informational.
    VdcQ {
        id_ref: Reference,
        iq_ref: Reference,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vdc_ref: Option<Reference>,
    },
}

impl ControlMode {
    pub fn label(&self) -> &'static str {
        match self {
            ControlMode::Pq { .. } => "pq",
            ControlMode::VdcQ { .. } => "vdc_q",
        }
    }

    /// Named references of this mode, for validation and reporting.
    pub fn references(&self) -> Vec<(&'static str, &Reference)> {
        match self {
            ControlMode::Pq { p_ref, q_ref } => vec![("P_ref", p_ref), ("Q_ref", q_ref)],
            ControlMode::VdcQ {
                id_ref,
                iq_ref,
                vdc_ref,
            } => {
                let mut refs = vec![("id_ref", id_ref), ("iq_ref", iq_ref)];
                if let Some(v) = vdc_ref {
                    refs.push(("Vdc_ref", v));
                }
                refs
            }
        }
    }

    pub fn validate(&self) -> ControlResult<()> {
        self.references()
            .into_iter()
            .try_for_each(|(name, r)| r.validate(name))
    }
}

/// A named control scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub control: ControlMode,
}
