//! Physical and control constants.

use serde::{Deserialize, Serialize};
use vd_core::Real;

/// Electrical and control parameters in per-unit.
///
/// Loaded once per run and shared read-only. Field names on disk follow the
/// usual symbols (`L`, `R`, `Cdc`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// AC filter inductance.
    #[serde(rename = "L")]
    pub l: Real,
    /// AC filter resistance.
    #[serde(rename = "R")]
    pub r: Real,
    /// DC link capacitance.
    #[serde(rename = "Cdc")]
    pub cdc: Real,
    /// Synchronous angular frequency.
    pub omega: Real,
    /// Converter voltage magnitude limit.
    #[serde(rename = "V_max")]
    pub v_max: Real,
    /// Proportional gain of the d-axis current loop.
    #[serde(rename = "Kp_id")]
    pub kp_id: Real,
    /// Proportional gain of the q-axis current loop.
    #[serde(rename = "Kp_iq")]
    pub kp_iq: Real,
    /// PCC voltage, d component.
    pub v_pcc_d: Real,
    /// PCC voltage, q component.
    #[serde(default)]
    pub v_pcc_q: Real,
}

impl ModelParams {
    /// Every named value, for validation and hashing.
    pub fn named_values(&self) -> [(&'static str, Real); 9] {
        [
            ("L", self.l),
            ("R", self.r),
            ("Cdc", self.cdc),
            ("omega", self.omega),
            ("V_max", self.v_max),
            ("Kp_id", self.kp_id),
            ("Kp_iq", self.kp_iq),
            ("v_pcc_d", self.v_pcc_d),
            ("v_pcc_q", self.v_pcc_q),
        ]
    }
}
