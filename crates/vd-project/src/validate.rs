//! Input validation.

use vd_controls::ControlError;
use vd_core::{AlgebraicVar, StateVar, Variable};
use vd_model::ModelParams;

use crate::schema::{ScenarioFile, SolverSettings};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid reference: {0}")]
    Reference(#[from] ControlError),

    #[error("Unknown variable '{name}' in {context}")]
    UnknownVariable { name: String, context: String },

    #[error("Missing variable '{name}' in {context}")]
    MissingVariable { name: String, context: String },
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Every value finite; `L`, `Cdc` and `V_max` strictly positive; `R` and the
/// gains non-negative.
pub fn validate_params(params: &ModelParams) -> Result<(), ValidationError> {
    for (name, value) in params.named_values() {
        if !value.is_finite() {
            return Err(invalid(name, value, "must be finite"));
        }
    }
    for (name, value) in [("L", params.l), ("Cdc", params.cdc), ("V_max", params.v_max)] {
        if value <= 0.0 {
            return Err(invalid(name, value, "must be positive"));
        }
    }
    for (name, value) in [
        ("R", params.r),
        ("Kp_id", params.kp_id),
        ("Kp_iq", params.kp_iq),
    ] {
        if value < 0.0 {
            return Err(invalid(name, value, "must be non-negative"));
        }
    }
    Ok(())
}

pub fn validate_settings(settings: &SolverSettings) -> Result<(), ValidationError> {
    if let Some(dt) = settings.dt.filter(|dt| !(dt.is_finite() && *dt > 0.0)) {
        return Err(invalid("solver.dt", dt, "must be finite and positive"));
    }
    if let Some(t_end) = settings.t_end.filter(|t| !(t.is_finite() && *t >= 0.0)) {
        return Err(invalid("solver.t_end", t_end, "must be finite and non-negative"));
    }
    if let Some(newton) = settings.newton {
        if newton.max_iterations == 0 {
            return Err(invalid(
                "solver.newton.max_iterations",
                0.0,
                "must be at least 1",
            ));
        }
        if !(newton.tolerance.is_finite() && newton.tolerance > 0.0) {
            return Err(invalid(
                "solver.newton.tolerance",
                newton.tolerance,
                "must be finite and positive",
            ));
        }
    }
    Ok(())
}

/// References well formed; initial conditions name only known variables and
/// give every state a finite value.
pub fn validate_scenario(file: &ScenarioFile) -> Result<(), ValidationError> {
    file.scenario.control.validate()?;

    let ic = &file.initial_conditions;
    for name in ic.x.keys() {
        if StateVar::from_name(name).is_none() {
            return Err(ValidationError::UnknownVariable {
                name: name.clone(),
                context: "initial_conditions.x".to_string(),
            });
        }
    }
    for name in ic.y.keys() {
        if AlgebraicVar::from_name(name).is_none() {
            return Err(ValidationError::UnknownVariable {
                name: name.clone(),
                context: "initial_conditions.y".to_string(),
            });
        }
    }
    for var in StateVar::ALL {
        if !ic.x.contains_key(var.name()) {
            return Err(ValidationError::MissingVariable {
                name: var.name().to_string(),
                context: "initial_conditions.x".to_string(),
            });
        }
    }
    for (name, value) in ic.x.iter().chain(ic.y.iter()) {
        if !value.is_finite() {
            return Err(invalid(name, *value, "initial value must be finite"));
        }
    }

    if let Some(settings) = &file.solver {
        validate_settings(settings)?;
    }
    Ok(())
}
