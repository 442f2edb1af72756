//! # Error Types
//!
//! Structured error types for timber_core. Errors are informative for both
//! humans and programs: every variant carries enough context to locate the
//! offending input, and each one maps to a stable [`CalcError::error_code`].
//!
//! Two variants are *design outcomes* rather than bugs or bad input:
//! [`CalcError::SlendernessExceeded`] and [`CalcError::NumericInstability`].
//! Use [`CalcError::is_design_failure`] to tell them apart.
//!
//! ## Example
//!
//! ```rust
//! use timber_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length: f64) -> CalcResult<()> {
//!     if length <= 0.0 {
//!         return Err(CalcError::invalid_geometry("length", length, "Length must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(validate_length(-1.0).unwrap_err().error_code(), "INVALID_GEOMETRY");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for timber_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for design-check operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Non-positive (or non-finite) width, depth, length or effective-length factor
    #[error("Invalid geometry for '{field}': {value} - {reason}")]
    InvalidGeometry {
        field: String,
        value: String,
        reason: String,
    },

    /// An adjustment factor that must be positive is not
    #[error("Invalid {mode} adjustment factor '{factor}': {value} - factors must be finite and > 0")]
    InvalidFactor {
        mode: String,
        factor: String,
        value: String,
    },

    /// Computed slenderness ratio is beyond the code ceiling
    #[error("Slenderness exceeded ({check}): {ratio:.2} > limit {limit:.2}")]
    SlendernessExceeded {
        check: String,
        ratio: f64,
        limit: f64,
    },

    /// A section, member or force named in a combination cannot be resolved
    #[error("Missing {kind}: '{name}'")]
    MissingInput { kind: String, name: String },

    /// Second-order amplification divisor at or past instability
    #[error("Numeric instability in {check}: f_c/F_cE = {ratio:.4} (amplifier undefined)")]
    NumericInstability { check: String, ratio: f64 },

    /// An input value is invalid (out of range, unparseable, duplicated, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidGeometry error
    pub fn invalid_geometry(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidFactor error
    pub fn invalid_factor(mode: impl Into<String>, factor: impl Into<String>, value: f64) -> Self {
        CalcError::InvalidFactor {
            mode: mode.into(),
            factor: factor.into(),
            value: value.to_string(),
        }
    }

    /// Create a SlendernessExceeded error
    pub fn slenderness_exceeded(check: impl Into<String>, ratio: f64, limit: f64) -> Self {
        CalcError::SlendernessExceeded {
            check: check.into(),
            ratio,
            limit,
        }
    }

    /// Create a MissingInput error
    pub fn missing_input(kind: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::MissingInput {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a NumericInstability error
    pub fn numeric_instability(check: impl Into<String>, ratio: f64) -> Self {
        CalcError::NumericInstability {
            check: check.into(),
            ratio,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for outcomes that mean "this member does not work", as opposed to
    /// configuration or computational problems.
    pub fn is_design_failure(&self) -> bool {
        matches!(
            self,
            CalcError::SlendernessExceeded { .. } | CalcError::NumericInstability { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::InvalidFactor { .. } => "INVALID_FACTOR",
            CalcError::SlendernessExceeded { .. } => "SLENDERNESS_EXCEEDED",
            CalcError::MissingInput { .. } => "MISSING_INPUT",
            CalcError::NumericInstability { .. } => "NUMERIC_INSTABILITY",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject non-finite or non-positive dimensions.
pub(crate) fn require_positive_dimension(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_geometry(
            field,
            value,
            "Must be a finite value greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::slenderness_exceeded("column yy", 61.2, 50.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("SlendernessExceeded"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_input("section", "S-1").error_code(), "MISSING_INPUT");
        assert_eq!(
            CalcError::invalid_factor("Tension", "moisture", 0.0).error_code(),
            "INVALID_FACTOR"
        );
        assert_eq!(
            CalcError::numeric_instability("combined", 1.2).error_code(),
            "NUMERIC_INSTABILITY"
        );
    }

    #[test]
    fn test_design_failures_are_distinguishable() {
        assert!(CalcError::slenderness_exceeded("beam yy", 55.0, 50.0).is_design_failure());
        assert!(CalcError::numeric_instability("combined", 1.0).is_design_failure());
        assert!(!CalcError::invalid_geometry("width", 0.0, "x").is_design_failure());
        assert!(!CalcError::missing_input("member", "M-9").is_design_failure());
    }

    #[test]
    fn test_require_positive_dimension() {
        assert!(require_positive_dimension("width", 1.0).is_ok());
        assert!(require_positive_dimension("width", 0.0).is_err());
        assert!(require_positive_dimension("width", -2.0).is_err());
        assert!(require_positive_dimension("width", f64::NAN).is_err());
        assert!(require_positive_dimension("width", f64::INFINITY).is_err());
    }
}
