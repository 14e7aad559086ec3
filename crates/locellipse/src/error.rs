//! Error type shared by the ellipse geometry and the record hook.
//!
//! Geometric degeneracy is not an error: it shows up as `Ellipse::is_valid()
//! == false` and zero/NaN derived quantities. Only programmer errors (bad input
//! shapes, use before initialization) and malformed records land here.

use std::fmt;

/// Errors surfaced by `Ellipse` queries and record (de)serialization.
#[derive(Clone, Debug, PartialEq)]
pub enum EllipseError {
    /// Input has the wrong shape or a value outside its domain.
    InvalidArgument { reason: String },
    /// Axis queries before `initialize` supplied coefficients.
    NotInitialized,
    /// Record carries a schema version this crate does not read.
    UnsupportedFormat { format: i64 },
    /// Record lacks a required field.
    MissingField { name: String },
    /// Record field could not be parsed.
    MalformedField { name: String, value: String },
}

impl EllipseError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self::MissingField { name: name.into() }
    }

    pub(crate) fn malformed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedField {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EllipseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::NotInitialized => write!(f, "ellipse has no coefficients (not initialized)"),
            Self::UnsupportedFormat { format } => {
                write!(f, "{format} is not a recognized ellipse record format")
            }
            Self::MissingField { name } => write!(f, "record is missing field `{name}`"),
            Self::MalformedField { name, value } => {
                write!(f, "record field `{name}` has malformed value {value:?}")
            }
        }
    }
}

impl std::error::Error for EllipseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let e = EllipseError::malformed("area", "abc");
        assert_eq!(
            e.to_string(),
            "record field `area` has malformed value \"abc\""
        );
        let e = EllipseError::UnsupportedFormat { format: 2 };
        assert!(e.to_string().starts_with("2 is not"));
    }
}
