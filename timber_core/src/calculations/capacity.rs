//! # Section Capacities
//!
//! Adjusted design values and member capacities for one combination of
//! material, section, member geometry and adjustment factors.
//!
//! ```text
//! Tension          T'   = Ft'  × A
//! Bending          M'   = Fb'  × S      (per axis, includes C_L)
//! Shear            V'   = Fv'  × 2A/3
//! Compression      P'   = Fc'  × A      (per axis, includes C_P)
//! Bearing          R'   = Fc⊥' × A_b    (A_b = contact area, or A)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use timber_core::calculations::capacity::MemberDesign;
//! use timber_core::materials::MaterialProperties;
//! use timber_core::member::MemberDefinition;
//! use timber_core::nds_factors::DesignFactors;
//! use timber_core::section::{Axis, RectangularSectionProperties};
//!
//! let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
//! let section = RectangularSectionProperties::new("6.4x6.4", 6.4, 6.4).unwrap();
//! let member = MemberDefinition::new("M-1", 300.0);
//! let factors = DesignFactors::lrfd();
//!
//! let design = MemberDesign::new(&material, &section, &member, &factors).unwrap();
//! let capacities = design.capacities().unwrap();
//! assert!(capacities.tension > 0.0);
//! assert!(capacities.axis(Axis::YY).compression < capacities.area * 81.4 * 2.40 * 0.90);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::stability::{
    beam_critical_stress, beam_slenderness, beam_stability, column_critical_stress,
    column_stability, StabilityCheck, BEAM_SLENDERNESS_LIMIT, COLUMN_SLENDERNESS_LIMIT,
};
use crate::errors::{require_positive_dimension, CalcResult};
use crate::materials::MaterialProperties;
use crate::member::MemberDefinition;
use crate::nds_factors::{
    AdjustmentFactorSet, BendingFactors, CompressionFactors, DesignFactors, StabilityFactor,
};
use crate::section::{Axis, RectangularSectionProperties};

/// Bending and compression results about one principal axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCapacity {
    pub axis: Axis,

    /// Fb* (all bending factors except C_L)
    pub bending_reference: f64,

    /// Fb' = Fb* × C_L
    pub adjusted_bending: f64,

    /// M' = Fb' × S
    pub bending: f64,

    /// C_L details
    pub beam_stability: StabilityCheck,

    /// Fc* (all compression factors except C_P)
    pub compression_reference: f64,

    /// Fc' = Fc* × C_P
    pub adjusted_compression: f64,

    /// P' = Fc' × A
    pub compression: f64,

    /// C_P details
    pub column_stability: StabilityCheck,
}

/// All capacities of one member.
///
/// ## JSON Example (abridged)
///
/// ```json
/// {
///   "area": 40.96,
///   "elastic_modulus": 189992.0,
///   "adjusted_tension": 181.44,
///   "tension": 7431.8,
///   "shear": 5650.2,
///   "bearing_area": 40.96,
///   "perpendicular": 525.7,
///   "yy": { "axis": "yy", "bending": 19686.0, "compression": 2160.4, "...": "..." },
///   "zz": { "axis": "zz", "bending": 19686.0, "compression": 2160.4, "...": "..." }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionCapacities {
    pub area: f64,

    /// E' used for stability (E_min or E, times the elastic modulus factors)
    pub elastic_modulus: f64,

    pub adjusted_tension: f64,
    pub tension: f64,

    pub adjusted_shear: f64,
    pub shear: f64,

    pub adjusted_perpendicular: f64,
    pub bearing_area: f64,
    pub perpendicular: f64,

    pub yy: AxisCapacity,
    pub zz: AxisCapacity,
}

impl SectionCapacities {
    pub fn axis(&self, axis: Axis) -> &AxisCapacity {
        match axis {
            Axis::YY => &self.yy,
            Axis::ZZ => &self.zz,
        }
    }

    /// Axis with the lower compression capacity (y-y on a tie)
    pub fn governing_compression_axis(&self) -> Axis {
        if self.zz.compression < self.yy.compression {
            Axis::ZZ
        } else {
            Axis::YY
        }
    }

    /// Lower of the two compression capacities
    pub fn compression(&self) -> f64 {
        self.axis(self.governing_compression_axis()).compression
    }
}

/// Capacity calculator over borrowed inputs.
///
/// Construction validates every input once, so the per-mode operations only
/// fail on slenderness.
#[derive(Debug, Clone, Copy)]
pub struct MemberDesign<'a> {
    material: &'a MaterialProperties,
    section: &'a RectangularSectionProperties,
    member: &'a MemberDefinition,
    factors: &'a DesignFactors,
    contact_area: Option<f64>,
}

impl<'a> MemberDesign<'a> {
    /// Validate inputs and build the calculator.
    ///
    /// # Errors
    /// `InvalidInput` for material values, `InvalidGeometry` for member
    /// geometry, `InvalidFactor` for any factor record.
    pub fn new(
        material: &'a MaterialProperties,
        section: &'a RectangularSectionProperties,
        member: &'a MemberDefinition,
        factors: &'a DesignFactors,
    ) -> CalcResult<Self> {
        material.validate()?;
        member.validate()?;
        factors.validate()?;
        Ok(Self {
            material,
            section,
            member,
            factors,
            contact_area: None,
        })
    }

    /// Use a bearing contact area instead of the full section area.
    pub fn with_contact_area(mut self, contact_area: f64) -> CalcResult<Self> {
        require_positive_dimension("contact_area", contact_area)?;
        self.contact_area = Some(contact_area);
        Ok(self)
    }

    fn bending_factors(&self, axis: Axis) -> &BendingFactors {
        match axis {
            Axis::YY => &self.factors.bending_yy,
            Axis::ZZ => &self.factors.bending_zz,
        }
    }

    fn compression_factors(&self, axis: Axis) -> &CompressionFactors {
        match axis {
            Axis::YY => &self.factors.compression_yy,
            Axis::ZZ => &self.factors.compression_zz,
        }
    }

    // === Adjusted design values ===

    /// E' for stability
    pub fn elastic_modulus(&self) -> f64 {
        self.material.stability_modulus() * self.factors.elastic_modulus.product()
    }

    /// Ft'
    pub fn adjusted_tension(&self) -> f64 {
        self.material.tension_strength * self.factors.tension.product()
    }

    /// Fv'
    pub fn adjusted_shear(&self) -> f64 {
        self.material.shear_strength * self.factors.shear.product()
    }

    /// Fc⊥' (includes the bearing area factor)
    pub fn adjusted_perpendicular(&self) -> f64 {
        self.material.compression_perpendicular_strength * self.factors.perpendicular.product()
    }

    /// Fb* for an axis
    pub fn bending_reference(&self, axis: Axis) -> f64 {
        self.material.bending_strength * self.bending_factors(axis).product()
    }

    /// Fc* for an axis
    pub fn compression_reference(&self, axis: Axis) -> f64 {
        self.material.compression_parallel_strength * self.compression_factors(axis).product()
    }

    // === Stability ===

    /// C_P for buckling about `axis`.
    ///
    /// A fixed factor skips the slenderness ceiling; F_cE is still reported
    /// for the amplified interaction checks.
    pub fn column_stability(&self, axis: Axis) -> CalcResult<StabilityCheck> {
        let le = self.member.effective_length(axis);
        let r = self.section.radius_of_gyration(axis);
        let e = self.elastic_modulus();

        match self.compression_factors(axis).column_stability {
            StabilityFactor::Computed => column_stability(
                &format!("column {}", axis),
                le,
                r,
                e,
                self.compression_reference(axis),
                self.material.class.column_constant(),
            ),
            StabilityFactor::Fixed(factor) => {
                let slenderness = le / r;
                Ok(StabilityCheck {
                    slenderness,
                    limit: COLUMN_SLENDERNESS_LIMIT,
                    critical_stress: column_critical_stress(e, slenderness),
                    factor,
                })
            }
        }
    }

    /// C_L for bending about `axis`, using that axis' effective length.
    pub fn beam_stability(&self, axis: Axis) -> CalcResult<StabilityCheck> {
        let le = self.member.effective_length(axis);
        let (depth, breadth) = self.section.depth_and_breadth(axis);
        let e = self.elastic_modulus();

        match self.bending_factors(axis).beam_stability {
            StabilityFactor::Computed => beam_stability(
                &format!("beam {}", axis),
                le,
                depth,
                breadth,
                e,
                self.bending_reference(axis),
            ),
            StabilityFactor::Fixed(factor) => {
                let rb = beam_slenderness(le, depth, breadth);
                let critical_stress = if depth > breadth {
                    beam_critical_stress(e, rb)
                } else {
                    None
                };
                Ok(StabilityCheck {
                    slenderness: rb,
                    limit: BEAM_SLENDERNESS_LIMIT,
                    critical_stress,
                    factor,
                })
            }
        }
    }

    // === Capacities ===

    /// T' = Ft' × A
    pub fn tension_capacity(&self) -> f64 {
        self.adjusted_tension() * self.section.area()
    }

    /// M' = Fb* × C_L × S about `axis`
    pub fn bending_capacity(&self, axis: Axis) -> CalcResult<f64> {
        let cl = self.beam_stability(axis)?.factor;
        Ok(self.bending_reference(axis) * cl * self.section.section_modulus(axis))
    }

    /// V' = Fv' × 2A/3
    pub fn shear_capacity(&self) -> f64 {
        self.adjusted_shear() * self.section.shear_area()
    }

    /// P' = Fc* × C_P × A for buckling about `axis`
    pub fn compression_capacity(&self, axis: Axis) -> CalcResult<f64> {
        let cp = self.column_stability(axis)?.factor;
        Ok(self.compression_reference(axis) * cp * self.section.area())
    }

    /// Bearing area: the contact area when set, else the section area
    pub fn bearing_area(&self) -> f64 {
        self.contact_area.unwrap_or_else(|| self.section.area())
    }

    /// R' = Fc⊥' × A_b
    pub fn perpendicular_capacity(&self) -> f64 {
        self.adjusted_perpendicular() * self.bearing_area()
    }

    fn axis_capacity(&self, axis: Axis) -> CalcResult<AxisCapacity> {
        let beam = self.beam_stability(axis)?;
        let column = self.column_stability(axis)?;

        let bending_reference = self.bending_reference(axis);
        let adjusted_bending = bending_reference * beam.factor;
        let compression_reference = self.compression_reference(axis);
        let adjusted_compression = compression_reference * column.factor;

        Ok(AxisCapacity {
            axis,
            bending_reference,
            adjusted_bending,
            bending: adjusted_bending * self.section.section_modulus(axis),
            beam_stability: beam,
            compression_reference,
            adjusted_compression,
            compression: adjusted_compression * self.section.area(),
            column_stability: column,
        })
    }

    /// Every capacity at once.
    ///
    /// # Errors
    /// `SlendernessExceeded` if any computed stability check is past its ceiling.
    pub fn capacities(&self) -> CalcResult<SectionCapacities> {
        Ok(SectionCapacities {
            area: self.section.area(),
            elastic_modulus: self.elastic_modulus(),
            adjusted_tension: self.adjusted_tension(),
            tension: self.tension_capacity(),
            adjusted_shear: self.adjusted_shear(),
            shear: self.shear_capacity(),
            adjusted_perpendicular: self.adjusted_perpendicular(),
            bearing_area: self.bearing_area(),
            perpendicular: self.perpendicular_capacity(),
            yy: self.axis_capacity(Axis::YY)?,
            zz: self.axis_capacity(Axis::ZZ)?,
        })
    }
}
