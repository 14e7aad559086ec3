//! Fixed numeric constants for the ellipse geometry (internal).
//!
//! Policy
//! - Same stance as the other geometry modules: constants, not knobs. If a
//!   caller ever needs to tune these, promote them to a small config struct.

/// Fill value for coefficients of a quadratic form that is not an ellipse.
/// Negative, so `coeff[3] <= 0` and the ellipse reports invalid.
pub const NA_VALUE: f64 = -999_999.0;

/// `|c1| <= UNCORRELATED_RATIO * |c0 - c2|` treats x and y as uncorrelated (trend 0).
pub(crate) const UNCORRELATED_RATIO: f64 = 1e-60;

/// Scale coefficient written when the determinant test rejects the conic.
pub(crate) const REJECTED_SCALE: f64 = -1.0;

/// Schema version of `EllipseRecord`.
pub const RECORD_FORMAT: i64 = 1;
