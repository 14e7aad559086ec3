//! Closed-form solvers on the quadratic form `c0·x² + c1·x·y + c2·y² = c3`.
//!
//! - `find_principal_axes`: eigen-decomposition via the rotation angle that
//!   diagonalizes the form; `None` if the form is not positive definite.
//! - `validity_test`: conic classification from the 3×3 conic matrix and its
//!   top-left minor (Zwillinger, CRC Standard Mathematical Tables, p. 329).
//!
//! Code cross-refs: `ellipse::Ellipse::initialize`, `cfg::UNCORRELATED_RATIO`
use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Matrix3;

use super::cfg::UNCORRELATED_RATIO;
use super::types::{Coefficients, PrincipalAxes};

/// Principal axes of the form with the right-hand side fixed at 1.
///
/// The trend `θ = atan(−ε + sqrt(ε² + 1))`, `ε = (c0 − c2)/c1`, solves
/// `tan 2θ = c1/(c0 − c2)`; the rotated diagonal entries `d1`, `d2` are the
/// eigenvalues and the semi-axes are `1/sqrt(d)`.
pub(crate) fn find_principal_axes(coeff: &Coefficients) -> Option<PrincipalAxes> {
    let [c0, c1, c2, _] = *coeff;

    // Uncorrelated x and y: axis-aligned, no meaningful trend.
    let mut trend = 0.0;
    if c1.abs() > UNCORRELATED_RATIO * (c0 - c2).abs() {
        let eps = (c0 - c2) / c1;
        trend = (-eps + (eps * eps + 1.0).sqrt()).atan();
    }

    let (st, ct) = trend.sin_cos();
    let (ss, cc, sc) = (st * st, ct * ct, st * ct);
    let d1 = c0 * cc + c1 * sc + c2 * ss;
    let d2 = c0 * ss - c1 * sc + c2 * cc;

    // Also rejects NaN eigenvalues.
    if !(d1 > 0.0 && d2 > 0.0) {
        return None;
    }

    let mut axes = PrincipalAxes {
        major: (1.0 / d1).sqrt(),
        minor: (1.0 / d2).sqrt(),
        trend,
    };
    if axes.minor > axes.major {
        std::mem::swap(&mut axes.major, &mut axes.minor);
        axes.trend += FRAC_PI_2;
    }
    axes.trend = normalize_trend(axes.trend);
    Some(axes)
}

/// Fold an angle into `[0, π)` by whole half-turns.
#[inline]
pub(crate) fn normalize_trend(mut trend: f64) -> f64 {
    if !trend.is_finite() {
        return trend;
    }
    while trend < 0.0 {
        trend += PI;
    }
    while trend >= PI {
        trend -= PI;
    }
    trend
}

/// Symmetric conic matrix `[[c0, c1/2, 0], [c1/2, c2, 0], [0, 0, −c3]]`.
pub fn conic_matrix(coeff: &Coefficients) -> Matrix3<f64> {
    let [c0, c1, c2, c3] = *coeff;
    let h = c1 * 0.5;
    Matrix3::new(c0, h, 0.0, h, c2, 0.0, 0.0, 0.0, -c3)
}

/// True iff the coefficients describe a real, non-degenerate ellipse.
///
/// Rejects when `det(M) == 0` (degenerate), when the top-left minor
/// `J = c0·c2 − (c1/2)² <= 0` (parabola/hyperbola), or when
/// `det(M)/(c0 + c2) > 0` (imaginary ellipse).
pub(crate) fn validity_test(coeff: &Coefficients) -> bool {
    let m = conic_matrix(coeff);
    let d = determinant(&m, 3);
    if d == 0.0 {
        return false;
    }
    let j = determinant(&m, 2);
    if j <= 0.0 {
        return false;
    }
    if d / (coeff[0] + coeff[2]) > 0.0 {
        return false;
    }
    true
}

/// Closed-form determinant of the leading `size × size` block of `x`.
///
/// Only sizes 2 and 3 are defined; any other size yields 0.
pub fn determinant(x: &Matrix3<f64>, size: usize) -> f64 {
    match size {
        2 => x[(0, 0)] * x[(1, 1)] - x[(0, 1)] * x[(1, 0)],
        3 => {
            x[(0, 0)] * x[(1, 1)] * x[(2, 2)]
                + x[(0, 1)] * x[(1, 2)] * x[(2, 0)]
                + x[(0, 2)] * x[(1, 0)] * x[(2, 1)]
                - x[(0, 2)] * x[(1, 1)] * x[(2, 0)]
                - x[(0, 1)] * x[(1, 0)] * x[(2, 2)]
                - x[(0, 0)] * x[(1, 2)] * x[(2, 1)]
        }
        _ => 0.0,
    }
}
