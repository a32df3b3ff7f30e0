//! Finite-difference Jacobians, used to cross-check the analytic ones.

use nalgebra::{DMatrix, DVector};

/// Finite-difference stencil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifferenceScheme {
    Forward,
    #[default]
    Central,
}

/// Jacobian of `f` at `x` by finite differences.
///
/// The perturbation of column `j` is `epsilon * max(|x[j]|, 1)`.
pub fn numeric_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
    scheme: DifferenceScheme,
) -> DMatrix<f64>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let f_x = f(x);
    let mut jac = DMatrix::zeros(f_x.len(), x.len());

    for j in 0..x.len() {
        let h = epsilon * x[j].abs().max(1.0);
        let mut x_plus = x.clone();
        x_plus[j] += h;

        let column = match scheme {
            DifferenceScheme::Forward => (f(&x_plus) - &f_x) / h,
            DifferenceScheme::Central => {
                let mut x_minus = x.clone();
                x_minus[j] -= h;
                (f(&x_plus) - f(&x_minus)) / (2.0 * h)
            }
        };
        jac.set_column(j, &column);
    }

    jac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(x: &DVector<f64>) -> DVector<f64> {
        DVector::from_vec(vec![x[0] * x[0] + x[1], 3.0 * x[0] * x[1]])
    }

    #[test]
    fn central_differences_match_exact() {
        let x = DVector::from_vec(vec![1.5, -2.0]);
        let jac = numeric_jacobian(&x, quadratic, 1e-6, DifferenceScheme::Central);
        let exact = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, -6.0, 4.5]);
        assert!((jac - exact).abs().max() < 1e-6);
    }

    #[test]
    fn forward_differences_are_first_order() {
        let x = DVector::from_vec(vec![1.5, -2.0]);
        let jac = numeric_jacobian(&x, quadratic, 1e-7, DifferenceScheme::Forward);
        assert!((jac[(0, 0)] - 3.0).abs() < 1e-5);
        assert!((jac[(1, 1)] - 4.5).abs() < 1e-5);
    }
}
