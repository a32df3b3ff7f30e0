//! Circular voltage limit.

use tracing::debug;

use crate::signal::VoltageCommand;

/// Saturated command and whether the limit was active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationOutcome {
    pub command: VoltageCommand,
    pub clipped: bool,
}

/// Scale `cmd` onto the circle of radius `v_max` if it lies outside it.
///
/// Direction is preserved. Commands on or inside the circle pass through
/// bit-for-bit.
pub fn saturate(cmd: VoltageCommand, v_max: f64) -> SaturationOutcome {
    let magnitude = cmd.magnitude();
    if magnitude > v_max {
        let scale = v_max / magnitude;
        debug!(magnitude, v_max, "converter voltage clipped");
        SaturationOutcome {
            command: VoltageCommand::new(cmd.vd * scale, cmd.vq * scale),
            clipped: true,
        }
    } else {
        SaturationOutcome {
            command: cmd,
            clipped: false,
        }
    }
}
