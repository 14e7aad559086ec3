//! Error-ellipse geometry on a 2D quadratic form.
//!
//! Purpose
//! - Turn the coefficients of `c0·x² + c1·x·y + c2·y² = c3` (from a location
//!   covariance projection) into principal semi-axes, trend, area, and
//!   center-to-perimeter distances.
//! - Keep degenerate inputs local: they flip the ellipse to invalid instead of
//!   erroring, and callers check `Ellipse::is_valid()` before trusting outputs.
//!
//! Two independent checks guard validity: positivity of the eigenvalues during
//! axis derivation, and the conic-determinant classification afterwards.
//!
//! Code cross-refs: `Ellipse`, `PrincipalAxes`, `record::EllipseRecord`

pub mod cfg;
mod ellipse;
pub mod rand;
mod solvers;
mod types;

pub use cfg::{NA_VALUE, RECORD_FORMAT};
pub use ellipse::Ellipse;
pub use solvers::{conic_matrix, determinant};
pub use types::{Coefficients, Location, PrincipalAxes};
