//! Initial-condition preparation.

use vd_core::{AlgebraicVar, Variable};
use vd_sim::InitialConditions;

/// Fill every missing algebraic entry with 0.0.
///
/// States are left untouched; a missing state is still reported by the
/// simulation when the run starts.
pub fn prepare_initial_conditions(ic: &InitialConditions) -> InitialConditions {
    let mut prepared = ic.clone();
    for var in AlgebraicVar::ALL {
        prepared.y.entry(var.name().to_string()).or_insert(0.0);
    }
    prepared
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_only_missing_algebraic_entries() {
        let mut ic = InitialConditions::default();
        ic.x.insert("id".to_string(), 0.1);
        ic.y.insert("P_ac".to_string(), 0.4);

        let prepared = prepare_initial_conditions(&ic);
        assert_eq!(prepared.x, ic.x);
        assert_eq!(prepared.y.len(), 3);
        assert_eq!(prepared.y["P_ac"], 0.4);
        assert_eq!(prepared.y["Idc"], 0.0);
        assert_eq!(prepared.y["Q_ac"], 0.0);
    }
}
