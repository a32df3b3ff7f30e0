//! Values passed between the control stages.

use serde::{Deserialize, Serialize};

/// dq current references produced by the external controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentReferences {
    pub id_ref: f64,
    pub iq_ref: f64,
}

/// dq converter voltage command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VoltageCommand {
    pub vd: f64,
    pub vq: f64,
}

impl VoltageCommand {
    pub fn new(vd: f64, vq: f64) -> Self {
        Self { vd, vq }
    }

    /// Euclidean magnitude `sqrt(vd^2 + vq^2)`.
    pub fn magnitude(&self) -> f64 {
        self.vd.hypot(self.vq)
    }
}
