//! # Materials
//!
//! Reference design values for one wood material. Values are taken as given
//! in whatever stress unit the caller uses; they only need to agree with the
//! force and length units of the sections and demands.
//!
//! ## Example
//!
//! ```rust
//! use timber_core::materials::{MaterialClass, MaterialProperties};
//!
//! let wood = MaterialProperties::new("Generic hardwood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
//! assert!(wood.validate().is_ok());
//! assert_eq!(wood.class, MaterialClass::SawnLumber);
//! assert_eq!(wood.stability_modulus(), 127000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Wood product class. Selects the column stability constant c (NDS 3.7.1.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaterialClass {
    /// Sawn lumber: c = 0.8
    #[default]
    SawnLumber,

    /// Structural glued laminated timber: c = 0.9
    Glulam,

    /// LVL, PSL, LSL: c = 0.9
    StructuralCompositeLumber,

    /// Round timber poles and piles: c = 0.85
    RoundTimberPole,
}

impl MaterialClass {
    /// Column stability constant c
    pub fn column_constant(&self) -> f64 {
        match self {
            MaterialClass::SawnLumber => 0.8,
            MaterialClass::Glulam => 0.9,
            MaterialClass::StructuralCompositeLumber => 0.9,
            MaterialClass::RoundTimberPole => 0.85,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialClass::SawnLumber => "Sawn Lumber",
            MaterialClass::Glulam => "Glulam",
            MaterialClass::StructuralCompositeLumber => "Structural Composite Lumber",
            MaterialClass::RoundTimberPole => "Round Timber Pole",
        }
    }
}

/// Reference design values for one material.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Generic hardwood",
///   "specific_gravity": 0.6,
///   "fibre_saturation_point": 0.25,
///   "tension_strength": 84.0,
///   "bending_strength": 212.0,
///   "shear_strength": 94.9,
///   "compression_parallel_strength": 81.4,
///   "compression_perpendicular_strength": 8.54,
///   "elastic_modulus": 127000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    pub name: String,

    #[serde(default = "default_specific_gravity")]
    pub specific_gravity: f64,

    /// Moisture content at fibre saturation (fraction)
    #[serde(default = "default_fibre_saturation_point")]
    pub fibre_saturation_point: f64,

    /// Ft
    pub tension_strength: f64,

    /// Fb
    pub bending_strength: f64,

    /// Fv
    pub shear_strength: f64,

    /// Fc
    pub compression_parallel_strength: f64,

    /// Fc⊥
    pub compression_perpendicular_strength: f64,

    /// E
    pub elastic_modulus: f64,

    /// E_min, used for stability when given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elastic_modulus_min: Option<f64>,

    #[serde(default)]
    pub class: MaterialClass,

    /// Display colour, not used by any check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn default_specific_gravity() -> f64 {
    0.6
}

fn default_fibre_saturation_point() -> f64 {
    0.25
}

impl MaterialProperties {
    /// Sawn-lumber material with default specific gravity and fibre saturation point.
    pub fn new(
        name: impl Into<String>,
        tension_strength: f64,
        bending_strength: f64,
        shear_strength: f64,
        compression_parallel_strength: f64,
        compression_perpendicular_strength: f64,
        elastic_modulus: f64,
    ) -> Self {
        Self {
            name: name.into(),
            specific_gravity: default_specific_gravity(),
            fibre_saturation_point: default_fibre_saturation_point(),
            tension_strength,
            bending_strength,
            shear_strength,
            compression_parallel_strength,
            compression_perpendicular_strength,
            elastic_modulus,
            elastic_modulus_min: None,
            class: MaterialClass::default(),
            color: None,
        }
    }

    pub fn with_class(mut self, class: MaterialClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_elastic_modulus_min(mut self, e_min: f64) -> Self {
        self.elastic_modulus_min = Some(e_min);
        self
    }

    /// Modulus used for buckling checks: E_min when given, else E.
    pub fn stability_modulus(&self) -> f64 {
        self.elastic_modulus_min.unwrap_or(self.elastic_modulus)
    }

    /// Every strength and modulus must be finite and > 0.
    pub fn validate(&self) -> CalcResult<()> {
        let mut values = vec![
            ("tension_strength", self.tension_strength),
            ("bending_strength", self.bending_strength),
            ("shear_strength", self.shear_strength),
            ("compression_parallel_strength", self.compression_parallel_strength),
            ("compression_perpendicular_strength", self.compression_perpendicular_strength),
            ("elastic_modulus", self.elastic_modulus),
        ];
        if let Some(e_min) = self.elastic_modulus_min {
            values.push(("elastic_modulus_min", e_min));
        }

        for (field, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    format!("Material '{}' requires a positive value", self.name),
                ));
            }
        }
        Ok(())
    }
}
