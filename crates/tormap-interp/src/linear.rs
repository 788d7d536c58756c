//! Piecewise linear interpolation.

/// Computes per-interval coefficients `(b, c, d)` for linear interpolation.
pub(crate) fn coefficients(xa: &[f64], ya: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let intervals = xa.len() - 1;
    let b = (0..intervals)
        .map(|i| (ya[i + 1] - ya[i]) / (xa[i + 1] - xa[i]))
        .collect();
    (b, vec![0.0; intervals], vec![0.0; intervals])
}
