//! # Member Geometry
//!
//! Unbraced length and effective-length factors for one member. The
//! effective length le = K·L drives both column and beam stability.

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive_dimension, CalcResult};
use crate::section::Axis;

/// A named member with its unbraced length and effective-length factors.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "M-1",
///   "length": 300.0,
///   "effective_length_factor_yy": 1.0,
///   "effective_length_factor_zz": 1.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDefinition {
    /// User label for this member
    pub name: String,

    /// Unbraced length, same length unit as the section dimensions
    pub length: f64,

    /// K for buckling / lateral-torsional buckling about y-y
    #[serde(default = "unit_factor")]
    pub effective_length_factor_yy: f64,

    /// K for buckling / lateral-torsional buckling about z-z
    #[serde(default = "unit_factor")]
    pub effective_length_factor_zz: f64,
}

fn unit_factor() -> f64 {
    1.0
}

impl MemberDefinition {
    /// Pin-pin member (K = 1.0 on both axes)
    pub fn new(name: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            length,
            effective_length_factor_yy: 1.0,
            effective_length_factor_zz: 1.0,
        }
    }

    /// Set both effective-length factors
    pub fn with_factors(mut self, k_yy: f64, k_zz: f64) -> Self {
        self.effective_length_factor_yy = k_yy;
        self.effective_length_factor_zz = k_zz;
        self
    }

    /// Length and both K factors must be finite and > 0.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive_dimension("length", self.length)?;
        require_positive_dimension("effective_length_factor_yy", self.effective_length_factor_yy)?;
        require_positive_dimension("effective_length_factor_zz", self.effective_length_factor_zz)?;
        Ok(())
    }

    pub fn effective_length_factor(&self, axis: Axis) -> f64 {
        match axis {
            Axis::YY => self.effective_length_factor_yy,
            Axis::ZZ => self.effective_length_factor_zz,
        }
    }

    /// le = K·L for the given axis
    pub fn effective_length(&self, axis: Axis) -> f64 {
        self.length * self.effective_length_factor(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_length() {
        let member = MemberDefinition::new("M-1", 120.0).with_factors(1.0, 0.5);
        assert!(member.validate().is_ok());
        assert_eq!(member.effective_length(Axis::YY), 120.0);
        assert_eq!(member.effective_length(Axis::ZZ), 60.0);
    }

    #[test]
    fn test_validation() {
        assert!(MemberDefinition::new("M", 0.0).validate().is_err());
        assert!(MemberDefinition::new("M", -10.0).validate().is_err());
        let err = MemberDefinition::new("M", 10.0)
            .with_factors(1.0, 0.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("effective_length_factor_zz"));
    }

    #[test]
    fn test_factors_default_to_one() {
        let member: MemberDefinition = serde_json::from_str(r#"{"name":"M-2","length":96.0}"#).unwrap();
        assert_eq!(member.effective_length_factor_yy, 1.0);
        assert_eq!(member.effective_length_factor_zz, 1.0);
    }
}
