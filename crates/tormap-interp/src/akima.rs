//! Akima's local interpolation method.

use crate::cubic::hermite_coefficients;

/// Computes per-interval coefficients `(b, c, d)` for Akima interpolation.
///
/// The knot slope is Akima's weighted average of the neighbouring secants,
/// with the weights chosen so that an outlier on one side stops influencing
/// the slope. The two phantom secants needed beyond each end are obtained by
/// quadratic extension, or by wrapping around for the periodic variant.
pub(crate) fn coefficients(
    xa: &[f64],
    ya: &[f64],
    periodic: bool,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = xa.len();
    let intervals = n - 1;

    // Extended secant array: m[i + 2] is the secant of interval i.
    let mut m = vec![0.0; intervals + 4];
    for i in 0..intervals {
        m[i + 2] = (ya[i + 1] - ya[i]) / (xa[i + 1] - xa[i]);
    }
    if periodic {
        m[1] = m[intervals + 1];
        m[0] = m[intervals];
        m[intervals + 2] = m[2];
        m[intervals + 3] = m[3];
    } else {
        m[1] = 2.0 * m[2] - m[3];
        m[0] = 2.0 * m[1] - m[2];
        m[intervals + 2] = 2.0 * m[intervals + 1] - m[intervals];
        m[intervals + 3] = 2.0 * m[intervals + 2] - m[intervals + 1];
    }

    let mut slopes = vec![0.0; n];
    for i in 0..n {
        let m_m2 = m[i];
        let m_m1 = m[i + 1];
        let m_0 = m[i + 2];
        let m_p1 = m[i + 3];
        let w_left = (m_p1 - m_0).abs();
        let w_right = (m_m1 - m_m2).abs();
        let denom = w_left + w_right;
        slopes[i] = if denom == 0.0 {
            // Locally straight on both sides; either secant works.
            0.5 * (m_m1 + m_0)
        } else {
            (w_left * m_m1 + w_right * m_0) / denom
        };
    }

    hermite_coefficients(xa, ya, &slopes)
}
