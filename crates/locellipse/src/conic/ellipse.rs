//! `Ellipse`: a 2D confidence region `c0·x² + c1·x·y + c2·y² = c3` around a center.
//!
//! Lifecycle
//! - Built empty, then `initialize`d once with a center and coefficients. Axes
//!   are derived at that point and cached; later only `c3` changes
//!   (`set_scale_factor`), and axis lengths pick it up as `sqrt(c3)` at query time.
//! - Degenerate geometry never errors: it marks the ellipse invalid
//!   (`c3 <= 0`) and derived quantities degrade to 0 or NaN.
//!
//! Code cross-refs: `solvers::{find_principal_axes, validity_test}`, `record::EllipseRecord`
use std::f64::consts::{PI, TAU};

use nalgebra::{Matrix2, Vector2};

use super::cfg::{NA_VALUE, REJECTED_SCALE};
use super::solvers::{find_principal_axes, validity_test};
use super::types::{Coefficients, Location, PrincipalAxes};
use crate::error::EllipseError;

/// Coefficients plus the axes derived from them at initialization.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Conic {
    coeff: Coefficients,
    axes: PrincipalAxes,
}

impl Conic {
    fn derive(mut coeff: Coefficients) -> Self {
        let axes = match find_principal_axes(&coeff) {
            Some(axes) => {
                tracing::trace!(
                    major = axes.major,
                    minor = axes.minor,
                    trend = axes.trend,
                    "principal axes"
                );
                axes
            }
            None => {
                tracing::debug!(?coeff, "quadratic form is not positive definite");
                coeff = [NA_VALUE; 4];
                PrincipalAxes::default()
            }
        };
        if coeff[3] > 0.0 && !validity_test(&coeff) {
            tracing::debug!(?coeff, "conic rejected by determinant test");
            coeff[3] = REJECTED_SCALE;
        }
        Self { coeff, axes }
    }

    #[inline]
    fn is_valid(&self) -> bool {
        self.coeff[3] > 0.0
    }

    /// `c0·n² + c1·n·e + c2·e²`.
    #[inline]
    fn form(&self, n: f64, e: f64) -> f64 {
        let [c0, c1, c2, _] = self.coeff;
        c0 * n * n + c1 * n * e + c2 * e * e
    }

    #[inline]
    fn radius(&self, n: f64, e: f64, scaled: bool) -> f64 {
        let scale = if scaled { self.coeff[3] } else { 1.0 };
        (scale / self.form(n, e)).sqrt()
    }
}

/// Error ellipse around a center of type `C` (opaque to the geometry).
///
/// `Clone` is a deep copy: center, coefficients, and axes are owned values.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse<C = Location> {
    center: Option<C>,
    conic: Option<Conic>,
}

impl<C> Default for Ellipse<C> {
    fn default() -> Self {
        Self {
            center: None,
            conic: None,
        }
    }
}

impl<C> Ellipse<C> {
    /// Empty, uninitialized ellipse.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and initialize in one step.
    pub fn with_coefficients(center: C, coeff: Coefficients) -> Self {
        Self {
            center: Some(center),
            conic: Some(Conic::derive(coeff)),
        }
    }

    /// Build the `c3 = 1` ellipse with the given semi-axes and trend (radians from x).
    ///
    /// Pre: `major`, `minor` finite and > 0; `trend` finite. The axes may be
    /// given in either order; derivation reorders them.
    pub fn from_principal_axes(
        center: C,
        major: f64,
        minor: f64,
        trend: f64,
    ) -> Result<Self, EllipseError> {
        if !(major.is_finite() && minor.is_finite() && major > 0.0 && minor > 0.0) {
            return Err(EllipseError::invalid(format!(
                "semi-axes must be finite and > 0 (got {major}, {minor})"
            )));
        }
        if !trend.is_finite() {
            return Err(EllipseError::invalid("trend must be finite"));
        }
        let (s, c) = trend.sin_cos();
        let (ia, ib) = (1.0 / (major * major), 1.0 / (minor * minor));
        let coeff = [
            c * c * ia + s * s * ib,
            2.0 * s * c * (ia - ib),
            s * s * ia + c * c * ib,
            1.0,
        ];
        Ok(Self::with_coefficients(center, coeff))
    }

    /// Set the center and coefficients, derive axes, and self-check validity.
    ///
    /// `None` coefficients mean "no ellipse": the center is kept and the
    /// ellipse stays without coefficients. A slice whose length is not 4 is
    /// rejected before any state changes.
    pub fn initialize(&mut self, center: C, coeff: Option<&[f64]>) -> Result<(), EllipseError> {
        let coeff = match coeff {
            None => None,
            Some(c) => Some(<Coefficients>::try_from(c).map_err(|_| {
                EllipseError::invalid(format!(
                    "expected 4 quadratic-form coefficients, got {}",
                    c.len()
                ))
            })?),
        };
        self.center = Some(center);
        self.conic = coeff.map(Conic::derive);
        Ok(())
    }

    /// Set `c3` (κ²). No-op without coefficients; axes are not re-derived.
    pub fn set_scale_factor(&mut self, kappa_sqr: f64) {
        if let Some(conic) = self.conic.as_mut() {
            conic.coeff[3] = kappa_sqr;
        }
    }

    /// Coefficients exist and `c3 > 0`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.conic.as_ref().is_some_and(Conic::is_valid)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.conic.is_some()
    }

    #[inline]
    pub fn center(&self) -> Option<&C> {
        self.center.as_ref()
    }

    /// Current coefficients (after any invalidation or rescaling).
    #[inline]
    pub fn coefficients(&self) -> Option<&Coefficients> {
        self.conic.as_ref().map(|c| &c.coeff)
    }

    /// Current scale coefficient `c3`.
    #[inline]
    pub fn scale_factor(&self) -> Option<f64> {
        self.conic.as_ref().map(|c| c.coeff[3])
    }

    fn conic(&self) -> Result<&Conic, EllipseError> {
        self.conic.as_ref().ok_or(EllipseError::NotInitialized)
    }

    /// Cached axes for `c3 = 1` (not rescaled by the current `c3`).
    pub fn principal_axes(&self) -> Result<PrincipalAxes, EllipseError> {
        Ok(self.conic()?.axes)
    }

    /// `major * sqrt(c3)`; NaN when `c3 < 0`.
    pub fn major_axis_length(&self) -> Result<f64, EllipseError> {
        let conic = self.conic()?;
        Ok(conic.axes.major * conic.coeff[3].sqrt())
    }

    /// `minor * sqrt(c3)`; NaN when `c3 < 0`.
    pub fn minor_axis_length(&self) -> Result<f64, EllipseError> {
        let conic = self.conic()?;
        Ok(conic.axes.minor * conic.coeff[3].sqrt())
    }

    /// Major-axis trend in radians from the x axis, in `[0, π)`.
    pub fn major_axis_trend(&self) -> Result<f64, EllipseError> {
        Ok(self.conic()?.axes.trend)
    }

    /// Area of the scaled ellipse, `2π / sqrt(4ac − b²)` on the normalized form.
    /// Zero when invalid or when the discriminant is not positive.
    pub fn area(&self) -> f64 {
        let Some(conic) = self.conic.as_ref().filter(|c| c.is_valid()) else {
            return 0.0;
        };
        let d = 1.0 / conic.coeff[3];
        let a = conic.coeff[0] * d;
        let b = conic.coeff[1] * d;
        let c = conic.coeff[2] * d;
        let radical = 4.0 * a * c - b * b;
        if radical <= 0.0 {
            return 0.0;
        }
        2.0 * PI / radical.sqrt()
    }

    /// Distance from the center to the perimeter along the unit direction
    /// `[north, east]`, scaled by `sqrt(c3)` when `scaled`.
    ///
    /// Invalid ellipses (or `c3 == 0`) give 0 for any direction. Otherwise a
    /// direction that is not 2D is an error, and a non-positive form along
    /// `direction` gives NaN.
    pub fn distance_to_perimeter(&self, direction: &[f64], scaled: bool) -> Result<f64, EllipseError> {
        let Some(conic) = self.conic.as_ref().filter(|c| c.is_valid()) else {
            return Ok(0.0);
        };
        let [n, e] = <[f64; 2]>::try_from(direction).map_err(|_| {
            EllipseError::invalid(format!(
                "direction must have 2 components, got {}",
                direction.len()
            ))
        })?;
        Ok(conic.radius(n, e, scaled))
    }

    /// Scaled distance to the perimeter along `azimuth` (radians from the x/north axis).
    pub fn distance_to_perimeter_azimuth(&self, azimuth: f64) -> Result<f64, EllipseError> {
        if azimuth.is_nan() {
            return Err(EllipseError::invalid(
                "cannot compute distance to perimeter because azimuth is NaN",
            ));
        }
        let (s, c) = azimuth.sin_cos();
        self.distance_to_perimeter(&[c, s], true)
    }

    /// True if `offset` (from the center, `[north, east]`) lies inside or on
    /// the scaled ellipse. Always false for invalid ellipses.
    pub fn contains(&self, offset: Vector2<f64>) -> bool {
        match self.conic.as_ref() {
            Some(conic) if conic.is_valid() => conic.form(offset.x, offset.y) <= conic.coeff[3],
            _ => false,
        }
    }

    /// `n` offsets `[north, east]` on the scaled perimeter, at equally spaced
    /// azimuths starting from 0 and turning counter-clockwise.
    ///
    /// Empty when the ellipse is initialized but invalid.
    pub fn boundary_points(&self, n: usize) -> Result<Vec<Vector2<f64>>, EllipseError> {
        if n < 3 {
            return Err(EllipseError::invalid(format!(
                "need at least 3 boundary points, got {n}"
            )));
        }
        let conic = self.conic()?;
        if !conic.is_valid() {
            return Ok(Vec::new());
        }
        let step = -TAU / n as f64;
        Ok((0..n)
            .map(|k| {
                let (s, c) = (k as f64 * step).sin_cos();
                Vector2::new(c, s) * conic.radius(c, s, true)
            })
            .collect())
    }

    /// Symmetric matrix `Q` with `vᵀ Q v = c0·x² + c1·x·y + c2·y²`.
    pub fn quadratic_form(&self) -> Result<Matrix2<f64>, EllipseError> {
        let [c0, c1, c2, _] = self.conic()?.coeff;
        Ok(Matrix2::new(c0, 0.5 * c1, 0.5 * c1, c2))
    }
}
