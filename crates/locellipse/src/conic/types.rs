//! Plain value types carried by an `Ellipse`.

use serde::{Deserialize, Serialize};

/// Coefficients `[c0, c1, c2, c3]` of `c0·x² + c1·x·y + c2·y² = c3`
/// (x latitude-like / north, y longitude-like / east).
pub type Coefficients = [f64; 4];

/// Hypocenter-style position of an ellipse center.
///
/// The geometry never reads it; it is carried so callers can keep the
/// ellipse next to the location it describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Radians.
    pub lat: f64,
    /// Radians.
    pub lon: f64,
    /// Km.
    pub depth: f64,
    /// Seconds.
    pub time: f64,
}

impl Location {
    #[inline]
    pub fn new(lat: f64, lon: f64, depth: f64, time: f64) -> Self {
        Self {
            lat,
            lon,
            depth,
            time,
        }
    }
}

/// Semi-axis lengths for `c3 = 1` and the major-axis trend.
///
/// Invariants (when derived from a positive-definite form):
/// - `major >= minor > 0`.
/// - `trend ∈ [0, π)`, radians from the x axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrincipalAxes {
    pub major: f64,
    pub minor: f64,
    pub trend: f64,
}

impl PrincipalAxes {
    /// `[major, minor, trend]`.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.major, self.minor, self.trend]
    }
}
