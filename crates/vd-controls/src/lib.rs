//! Converter control chain.
//!
//! Each step the external controller turns the scenario into current
//! references, the proportional inner controller turns references into a raw
//! converter voltage command, and saturation clips that command to the
//! converter's voltage limit.

pub mod error;
pub mod external;
pub mod inner;
pub mod saturation;
pub mod scenario;
pub mod signal;

pub use error::{ControlError, ControlResult};
pub use inner::{ControllerState, CurrentController, ProportionalCurrentController};
pub use saturation::{SaturationOutcome, saturate};
pub use scenario::{ControlMode, Reference, ReferenceStep, Scenario};
pub use signal::{CurrentReferences, VoltageCommand};
