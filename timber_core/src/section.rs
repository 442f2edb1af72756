//! # Rectangular Sections
//!
//! Named solid rectangular cross-sections and their derived properties.
//!
//! Dimensions may be in any consistent length unit. Derived properties are
//! computed on demand from `width` and `depth`, so a section can never hold
//! stale values.
//!
//! ```text
//!            z
//!            │
//!     ┌──────┼──────┐
//!     │      │      │
//!   d │──────┼──────│── y     I_yy = w·d³/12
//!     │      │      │         I_zz = d·w³/12
//!     └──────┼──────┘
//!            w
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equations::section::{
    rectangular_area, rectangular_moment_of_inertia, rectangular_radius_of_gyration,
    rectangular_section_modulus, rectangular_shear_area,
};
use crate::errors::{require_positive_dimension, CalcError, CalcResult};

/// Principal bending / buckling axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Depth resists bending
    #[serde(rename = "yy")]
    YY,
    /// Width resists bending
    #[serde(rename = "zz")]
    ZZ,
}

impl Axis {
    /// Both axes, y-y first
    pub const ALL: [Axis; 2] = [Axis::YY, Axis::ZZ];

    /// Short label ("yy" / "zz")
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::YY => "yy",
            Axis::ZZ => "zz",
        }
    }

    /// The other principal axis
    pub fn other(&self) -> Axis {
        match self {
            Axis::YY => Axis::ZZ,
            Axis::ZZ => Axis::YY,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Axis {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yy" | "y" => Ok(Axis::YY),
            "zz" | "z" => Ok(Axis::ZZ),
            _ => Err(CalcError::invalid_input("axis", s, "Axis must be \"yy\" or \"zz\"")),
        }
    }
}

/// A named solid rectangular cross-section.
///
/// ## JSON Example
///
/// ```json
/// { "name": "6.4x6.4", "width": 6.4, "depth": 6.4 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct RectangularSectionProperties {
    name: String,
    width: f64,
    depth: f64,
}

#[derive(Deserialize)]
struct RawSection {
    name: String,
    width: f64,
    depth: f64,
}

impl TryFrom<RawSection> for RectangularSectionProperties {
    type Error = CalcError;

    fn try_from(raw: RawSection) -> CalcResult<Self> {
        RectangularSectionProperties::new(raw.name, raw.width, raw.depth)
    }
}

impl RectangularSectionProperties {
    /// Create a section, rejecting non-positive or non-finite dimensions.
    ///
    /// # Example
    /// ```rust
    /// use timber_core::section::RectangularSectionProperties;
    ///
    /// let section = RectangularSectionProperties::new("S-1", 10.0, 20.0).unwrap();
    /// assert_eq!(section.area(), 200.0);
    /// assert!(RectangularSectionProperties::new("bad", 0.0, 20.0).is_err());
    /// ```
    pub fn new(name: impl Into<String>, width: f64, depth: f64) -> CalcResult<Self> {
        require_positive_dimension("width", width)?;
        require_positive_dimension("depth", depth)?;
        Ok(Self {
            name: name.into(),
            width,
            depth,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// A = w·d
    pub fn area(&self) -> f64 {
        rectangular_area(self.width, self.depth)
    }

    /// I_yy = w·d³/12
    pub fn i_yy(&self) -> f64 {
        rectangular_moment_of_inertia(self.width, self.depth)
    }

    /// I_zz = d·w³/12
    pub fn i_zz(&self) -> f64 {
        rectangular_moment_of_inertia(self.depth, self.width)
    }

    /// S_yy = w·d²/6
    pub fn s_yy(&self) -> f64 {
        rectangular_section_modulus(self.width, self.depth)
    }

    /// S_zz = d·w²/6
    pub fn s_zz(&self) -> f64 {
        rectangular_section_modulus(self.depth, self.width)
    }

    /// r_yy = d/√12
    pub fn r_yy(&self) -> f64 {
        rectangular_radius_of_gyration(self.depth)
    }

    /// r_zz = w/√12
    pub fn r_zz(&self) -> f64 {
        rectangular_radius_of_gyration(self.width)
    }

    /// Effective shear area 2A/3
    pub fn shear_area(&self) -> f64 {
        rectangular_shear_area(self.width, self.depth)
    }

    pub fn moment_of_inertia(&self, axis: Axis) -> f64 {
        match axis {
            Axis::YY => self.i_yy(),
            Axis::ZZ => self.i_zz(),
        }
    }

    pub fn section_modulus(&self, axis: Axis) -> f64 {
        match axis {
            Axis::YY => self.s_yy(),
            Axis::ZZ => self.s_zz(),
        }
    }

    pub fn radius_of_gyration(&self, axis: Axis) -> f64 {
        match axis {
            Axis::YY => self.r_yy(),
            Axis::ZZ => self.r_zz(),
        }
    }

    /// Dimension that resists bending about `axis`, and the one across it.
    ///
    /// Returns `(d, b)` in beam-stability notation.
    pub fn depth_and_breadth(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::YY => (self.depth, self.width),
            Axis::ZZ => (self.width, self.depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ten_by_twenty() {
        let s = RectangularSectionProperties::new("S", 10.0, 20.0).unwrap();
        assert_eq!(s.area(), 200.0);
        assert_relative_eq!(s.i_yy(), 10.0 * 20.0_f64.powi(3) / 12.0);
        assert_relative_eq!(s.i_zz(), 20.0 * 10.0_f64.powi(3) / 12.0);
        assert_relative_eq!(s.s_yy(), s.i_yy() / 10.0);
        assert_relative_eq!(s.s_zz(), s.i_zz() / 5.0);
        assert_relative_eq!(s.r_yy(), (s.i_yy() / s.area()).sqrt());
        assert_relative_eq!(s.r_zz(), (s.i_zz() / s.area()).sqrt());
    }

    #[test]
    fn test_square_section_is_symmetric() {
        let s = RectangularSectionProperties::new("6.4x6.4", 6.4, 6.4).unwrap();
        assert_eq!(s.i_yy(), s.i_zz());
        assert_eq!(s.s_yy(), s.s_zz());
        assert_eq!(s.r_yy(), s.r_zz());
    }

    #[test]
    fn test_invalid_dimensions() {
        for (w, d) in [(0.0, 1.0), (1.0, 0.0), (-3.0, 2.0), (f64::NAN, 2.0), (2.0, f64::INFINITY)] {
            let err = RectangularSectionProperties::new("bad", w, d).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_GEOMETRY");
        }
    }

    #[test]
    fn test_axis_accessors() {
        let s = RectangularSectionProperties::new("2x10", 1.5, 9.25).unwrap();
        assert_eq!(s.section_modulus(Axis::YY), s.s_yy());
        assert_eq!(s.radius_of_gyration(Axis::ZZ), s.r_zz());
        assert_eq!(s.depth_and_breadth(Axis::YY), (9.25, 1.5));
        assert_eq!(s.depth_and_breadth(Axis::ZZ), (1.5, 9.25));
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("yy".parse::<Axis>().unwrap(), Axis::YY);
        assert_eq!(" ZZ ".parse::<Axis>().unwrap(), Axis::ZZ);
        assert_eq!("xx".parse::<Axis>().unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(Axis::YY.other(), Axis::ZZ);
    }

    #[test]
    fn test_deserialization_validates() {
        let ok: RectangularSectionProperties =
            serde_json::from_str(r#"{"name":"S-1","width":3.5,"depth":7.25}"#).unwrap();
        assert_eq!(ok.name(), "S-1");
        assert!(serde_json::from_str::<RectangularSectionProperties>(
            r#"{"name":"S-2","width":-3.5,"depth":7.25}"#
        )
        .is_err());
    }
}
