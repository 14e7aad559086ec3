//! Error ellipses for seismic event location.
//!
//! - `conic`: principal axes, area, validity, and perimeter distances of the
//!   2D confidence region `c0·x² + c1·x·y + c2·y² = c3`.
//! - `record`: the five-field record emitted for diagnostics/reporting.
//! - `error`: the shared error type.

pub mod conic;
pub mod error;
pub mod record;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use conic::{Coefficients, Ellipse, Location, PrincipalAxes};
pub use error::EllipseError;
pub use record::EllipseRecord;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::conic::rand::{draw_ellipse, ReplayToken, SampleCfg};
    pub use crate::conic::{Coefficients, Ellipse, Location, PrincipalAxes, NA_VALUE};
    pub use crate::error::EllipseError;
    pub use crate::record::{EllipseRecord, KeyValueRecord, RecordReader, RecordWriter};
    pub use nalgebra::Vector2 as Vec2;
}
