//! Solve `g(x, y) = 0` for `y` with `x` frozen.

use nalgebra::DVector;
use vd_core::{AlgebraicVector, N_ALGEBRAIC, StateVector};
use vd_model::{ModelInputs, ModelParams, dg_dy, g};

use crate::error::SolverResult;
use crate::newton::{NewtonConfig, newton_solve};

/// Converged algebraic vector together with its solve statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgebraicSolution {
    pub y: AlgebraicVector,
    pub iterations: usize,
    pub residual_norm: f64,
}

/// Newton solve of the algebraic subsystem starting from `y0`.
///
/// Only `∂g/∂y` is used; the saturated converter voltage in `inputs` is held
/// constant throughout.
pub fn solve_algebraic(
    x: &StateVector,
    y0: &AlgebraicVector,
    params: &ModelParams,
    inputs: &ModelInputs,
    config: &NewtonConfig,
) -> SolverResult<AlgebraicSolution> {
    let residual = |y: &DVector<f64>| {
        let y = to_algebraic(y);
        DVector::from_column_slice(g(x, &y, params, inputs).as_slice())
    };
    let jacobian = |y: &DVector<f64>| dg_dy(x, &to_algebraic(y), params, inputs);

    let result = newton_solve(
        DVector::from_column_slice(y0.as_slice()),
        residual,
        jacobian,
        config,
    )?;

    Ok(AlgebraicSolution {
        y: AlgebraicVector::from_slice(result.y.as_slice())?,
        iterations: result.iterations,
        residual_norm: result.residual_norm,
    })
}

// Newton iterates keep the length of the starting vector, which comes from a
// fixed-size `AlgebraicVector`.
fn to_algebraic(y: &DVector<f64>) -> AlgebraicVector {
    let mut values = [0.0; N_ALGEBRAIC];
    for (slot, value) in values.iter_mut().zip(y.iter()) {
        *slot = *value;
    }
    AlgebraicVector::from_array(values)
}
