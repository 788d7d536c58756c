//! Natural cubic spline interpolation.

/// Computes per-interval coefficients `(b, c, d)` for a natural cubic
/// spline, solving the tridiagonal system for the second derivatives at
/// the knots (natural boundary: zero curvature at both ends).
pub(crate) fn coefficients(xa: &[f64], ya: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = xa.len();
    let ypp = second_derivatives(xa, ya);

    let mut b = vec![0.0; n - 1];
    let mut c = vec![0.0; n - 1];
    let mut d = vec![0.0; n - 1];
    for i in 0..n - 1 {
        let h = xa[i + 1] - xa[i];
        let secant = (ya[i + 1] - ya[i]) / h;
        b[i] = secant - h * (2.0 * ypp[i] + ypp[i + 1]) / 6.0;
        c[i] = ypp[i] / 2.0;
        d[i] = (ypp[i + 1] - ypp[i]) / (6.0 * h);
    }
    (b, c, d)
}

/// Solves for the knot second derivatives with the Thomas algorithm.
fn second_derivatives(xa: &[f64], ya: &[f64]) -> Vec<f64> {
    let n = xa.len();
    let mut ypp = vec![0.0; n];
    let interior = n - 2;
    if interior == 0 {
        return ypp;
    }

    let mut diag = vec![0.0; interior];
    let mut rhs = vec![0.0; interior];
    for i in 0..interior {
        let h0 = xa[i + 1] - xa[i];
        let h1 = xa[i + 2] - xa[i + 1];
        diag[i] = 2.0 * (h0 + h1);
        rhs[i] = 6.0 * ((ya[i + 2] - ya[i + 1]) / h1 - (ya[i + 1] - ya[i]) / h0);
    }

    // Forward elimination: the sub/super diagonals are the interval widths.
    for i in 1..interior {
        let lower = xa[i + 1] - xa[i];
        let upper = lower; // super-diagonal of row i-1 equals h_i
        let w = lower / diag[i - 1];
        diag[i] -= w * upper;
        rhs[i] -= w * rhs[i - 1];
    }

    ypp[interior] = rhs[interior - 1] / diag[interior - 1];
    for i in (1..interior).rev() {
        let upper = xa[i + 1] - xa[i];
        ypp[i] = (rhs[i - 1] - upper * ypp[i + 1]) / diag[i - 1];
    }
    ypp
}

/// Returns the natural cubic spline's first derivative at every knot.
///
/// Used by the bicubic interpolant to tabulate node partials.
pub(crate) fn node_derivatives(xa: &[f64], ya: &[f64]) -> Vec<f64> {
    let n = xa.len();
    let (b, c, d) = coefficients(xa, ya);
    let mut derivs = Vec::with_capacity(n);
    derivs.extend_from_slice(&b);
    let h = xa[n - 1] - xa[n - 2];
    derivs.push(b[n - 2] + h * (2.0 * c[n - 2] + h * 3.0 * d[n - 2]));
    derivs
}

/// Converts knot slopes into per-interval Hermite coefficients `(b, c, d)`.
///
/// Shared by the local methods (Akima, Steffen), which both prescribe a
/// first derivative at every knot.
pub(crate) fn hermite_coefficients(
    xa: &[f64],
    ya: &[f64],
    slopes: &[f64],
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = xa.len();
    let mut b = vec![0.0; n - 1];
    let mut c = vec![0.0; n - 1];
    let mut d = vec![0.0; n - 1];
    for i in 0..n - 1 {
        let h = xa[i + 1] - xa[i];
        let secant = (ya[i + 1] - ya[i]) / h;
        b[i] = slopes[i];
        c[i] = (3.0 * secant - 2.0 * slopes[i] - slopes[i + 1]) / h;
        d[i] = (slopes[i] + slopes[i + 1] - 2.0 * secant) / (h * h);
    }
    (b, c, d)
}
