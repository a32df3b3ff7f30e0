//! Analytic partial derivatives of `f` and `g`.
//!
//! Rows follow the equation order and columns the variable order of the
//! schema. Saturation is not differentiated: the converter voltage is an
//! input held constant while the algebraic system is solved.
//!
//! Only [`dg_dy`] is needed by the Newton solver. With `x` frozen the
//! algebraic subsystem is solved in `y` alone, which is what makes the model
//! index-1.

use nalgebra::DMatrix;
use vd_core::{
    AlgebraicVar, AlgebraicVector, N_ALGEBRAIC, N_STATES, Real, StateVar, StateVector, Variable,
};

use crate::dae::{ModelInputs, POWER_FACTOR};
use crate::params::ModelParams;

fn at<R: Variable, C: Variable>(m: &mut DMatrix<Real>, row: R, col: C) -> &mut Real {
    &mut m[(row.index(), col.index())]
}

/// `∂f/∂x`, `N_STATES x N_STATES`.
pub fn df_dx(
    _x: &StateVector,
    _y: &AlgebraicVector,
    params: &ModelParams,
    _inputs: &ModelInputs,
) -> DMatrix<Real> {
    let r_over_l = params.r / params.l;
    let omega = params.omega;

    let mut m = DMatrix::zeros(N_STATES, N_STATES);
    *at(&mut m, StateVar::Id, StateVar::Id) = -r_over_l;
    *at(&mut m, StateVar::Id, StateVar::Iq) = omega;
    *at(&mut m, StateVar::Iq, StateVar::Id) = -omega;
    *at(&mut m, StateVar::Iq, StateVar::Iq) = -r_over_l;
    // dVdc/dt depends on y only.
    m
}

/// `∂g/∂x`, `N_ALGEBRAIC x N_STATES`.
pub fn dg_dx(
    x: &StateVector,
    y: &AlgebraicVector,
    _params: &ModelParams,
    inputs: &ModelInputs,
) -> DMatrix<Real> {
    let vdc = x[StateVar::Vdc];
    let p_ac = y[AlgebraicVar::PAc];
    let (vd, vq) = (inputs.v_pcc_d, inputs.v_pcc_q);

    let mut m = DMatrix::zeros(N_ALGEBRAIC, N_STATES);
    *at(&mut m, AlgebraicVar::Idc, StateVar::Vdc) = p_ac / (vdc * vdc);
    *at(&mut m, AlgebraicVar::PAc, StateVar::Id) = -POWER_FACTOR * vd;
    *at(&mut m, AlgebraicVar::PAc, StateVar::Iq) = -POWER_FACTOR * vq;
    *at(&mut m, AlgebraicVar::QAc, StateVar::Id) = -POWER_FACTOR * vq;
    *at(&mut m, AlgebraicVar::QAc, StateVar::Iq) = POWER_FACTOR * vd;
    m
}

/// `∂g/∂y`, `N_ALGEBRAIC x N_ALGEBRAIC`.
///
/// Unit upper triangular for any finite nonzero `Vdc`.
pub fn dg_dy(
    x: &StateVector,
    _y: &AlgebraicVector,
    _params: &ModelParams,
    _inputs: &ModelInputs,
) -> DMatrix<Real> {
    let vdc = x[StateVar::Vdc];

    let mut m = DMatrix::identity(N_ALGEBRAIC, N_ALGEBRAIC);
    *at(&mut m, AlgebraicVar::Idc, AlgebraicVar::PAc) = -1.0 / vdc;
    m
}
