/// Floating point type used for all per-unit quantities.
pub type Real = f64;

/// Infinity norm. Returns NaN if any component is NaN.
pub fn max_abs(values: &[Real]) -> Real {
    let mut m: Real = 0.0;
    for v in values {
        if v.is_nan() {
            return Real::NAN;
        }
        m = m.max(v.abs());
    }
    m
}

/// Euclidean norm.
pub fn l2_norm(values: &[Real]) -> Real {
    values.iter().map(|v| v * v).sum::<Real>().sqrt()
}
