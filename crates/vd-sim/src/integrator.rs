//! Fixed-step explicit integrators.
//!
//! Every integrator receives the derivative already evaluated at `x` as its
//! first stage. Higher-order schemes call `rhs` for further stages with the
//! algebraic vector and converter voltage of the step frozen.

use serde::{Deserialize, Serialize};
use vd_core::StateVector;

/// Forward Euler update `x + dt * x_dot`. No checks are performed.
pub fn integrate(x: &StateVector, x_dot: &StateVector, dt: f64) -> StateVector {
    x.add_scaled(x_dot, dt)
}

/// Trait for time integrators.
pub trait Integrator {
    fn step(
        &self,
        x: &StateVector,
        x_dot: &StateVector,
        dt: f64,
        rhs: &dyn Fn(&StateVector) -> StateVector,
    ) -> StateVector;
}

/// Forward Euler (explicit, 1st order). Never calls `rhs`.
#[derive(Clone, Copy, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step(
        &self,
        x: &StateVector,
        x_dot: &StateVector,
        dt: f64,
        _rhs: &dyn Fn(&StateVector) -> StateVector,
    ) -> StateVector {
        integrate(x, x_dot, dt)
    }
}

/// Explicit midpoint rule.
#[derive(Clone, Copy, Debug)]
pub struct MidpointRk2;

impl Integrator for MidpointRk2 {
    fn step(
        &self,
        x: &StateVector,
        x_dot: &StateVector,
        dt: f64,
        rhs: &dyn Fn(&StateVector) -> StateVector,
    ) -> StateVector {
        let k2 = rhs(&x.add_scaled(x_dot, 0.5 * dt));
        x.add_scaled(&k2, dt)
    }
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Copy, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step(
        &self,
        x: &StateVector,
        x_dot: &StateVector,
        dt: f64,
        rhs: &dyn Fn(&StateVector) -> StateVector,
    ) -> StateVector {
        let k1 = *x_dot;
        let k2 = rhs(&x.add_scaled(&k1, 0.5 * dt));
        let k3 = rhs(&x.add_scaled(&k2, 0.5 * dt));
        let k4 = rhs(&x.add_scaled(&k3, dt));

        // x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = k1.add_scaled(&k2, 2.0).add_scaled(&k3, 2.0).add_scaled(&k4, 1.0);
        x.add_scaled(&k_sum, dt / 6.0)
    }
}

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Forward Euler (default, 1 derivative per step).
    #[default]
    Euler,
    /// Midpoint RK2 (2 derivatives per step).
    Rk2,
    /// Classical RK4 (4 derivatives per step).
    Rk4,
}

impl IntegratorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntegratorKind::Euler => "euler",
            IntegratorKind::Rk2 => "rk2",
            IntegratorKind::Rk4 => "rk4",
        }
    }
}

impl Integrator for IntegratorKind {
    fn step(
        &self,
        x: &StateVector,
        x_dot: &StateVector,
        dt: f64,
        rhs: &dyn Fn(&StateVector) -> StateVector,
    ) -> StateVector {
        match self {
            IntegratorKind::Euler => ForwardEuler.step(x, x_dot, dt, rhs),
            IntegratorKind::Rk2 => MidpointRk2.step(x, x_dot, dt, rhs),
            IntegratorKind::Rk4 => RK4.step(x, x_dot, dt, rhs),
        }
    }
}
