//! # NDS Adjustment Factors
//!
//! Adjustment factors for wood design per NDS 2018.
//!
//! ## Overview
//!
//! Reference design values (Ft, Fb, Fv, Fc, Fc⊥, E) are multiplied by every
//! applicable adjustment factor to obtain adjusted design values:
//!
//! ```text
//! Ft'  = Ft  × C_M × C_t × C_F × C_i × K_F × φ × λ
//! Fb'  = Fb  × C_M × C_t × C_L × C_F × C_fu × C_i × C_r × K_F × φ × λ
//! Fv'  = Fv  × C_M × C_t × C_i × K_F × φ × λ
//! Fc'  = Fc  × C_M × C_t × C_F × C_i × C_P × K_F × φ × λ
//! Fc⊥' = Fc⊥ × C_M × C_t × C_i × C_b × K_F × φ × λ   (plus any other factor set on the record)
//! E'   = E   × C_M × C_t × C_i × K_F × φ
//! ```
//!
//! Each failure mode has its own fixed-shape factor set. Every field defaults
//! to 1.0 ("not applicable") and must be finite and > 0. Factors combine by
//! plain multiplication, so order never matters.
//!
//! The stability factors C_L and C_P are [`StabilityFactor`] values: either
//! solved from member geometry by the capacity calculator, or fixed by the
//! caller (1.0 for a continuously braced member).
//!
//! ## Factor Summary
//!
//! | Factor | Description              | Typical Values    |
//! |--------|--------------------------|-------------------|
//! | C_M    | Wet service              | 0.67 - 1.0        |
//! | C_t    | Temperature              | 0.5 - 1.0         |
//! | C_L    | Beam stability           | Calculated        |
//! | C_P    | Column stability         | Calculated        |
//! | C_F    | Size factor              | 0.9 - 1.5         |
//! | C_fu   | Flat use                 | 1.0 - 1.2         |
//! | C_i    | Incising                 | 0.80 - 1.0        |
//! | C_r    | Repetitive member        | 1.0 or 1.15       |
//! | C_b    | Bearing area             | 1.0 - 1.75        |
//! | K_F    | Format conversion (LRFD) | 1.67 - 2.88       |
//! | φ      | Resistance factor (LRFD) | 0.75 - 0.90       |
//! | λ      | Time effect (LRFD) / C_D | 0.6 - 2.0         |

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// NDS Code Section References
// ============================================================================

/// NDS code section references for design checks and adjustment factors.
pub mod nds_ref {
    /// Tension parallel to grain
    pub const TENSION: &str = "NDS 3.8.1";
    /// Bending design value check
    pub const BENDING: &str = "NDS 3.3.1";
    /// Shear design value check
    pub const SHEAR: &str = "NDS 3.4.2";
    /// Compression parallel to grain
    pub const COMPRESSION: &str = "NDS 3.6.3";
    /// Bearing perpendicular to grain
    pub const BEARING: &str = "NDS 3.10.2";
    /// Combined bending and axial tension
    pub const COMBINED_TENSION: &str = "NDS 3.9.1";
    /// Combined bending and axial compression
    pub const COMBINED_COMPRESSION: &str = "NDS 3.9.2";

    /// Wet service factor C_M
    pub const C_M: &str = "NDS 4.3.3";
    /// Temperature factor C_t
    pub const C_T: &str = "NDS 2.3.3";
    /// Beam stability factor C_L
    pub const C_L: &str = "NDS 3.3.3";
    /// Column stability factor C_P
    pub const C_P: &str = "NDS 3.7.1";
    /// Incising factor C_i
    pub const C_I: &str = "NDS 4.3.8";
    /// Repetitive member factor C_r
    pub const C_R: &str = "NDS 4.3.9";
    /// Bearing area factor C_b
    pub const C_B: &str = "NDS 3.10.4";
    /// Format conversion factor K_F
    pub const K_F: &str = "NDS Table 4.3.1";
    /// Resistance factor φ
    pub const PHI: &str = "NDS Table 4.3.1";
    /// Time effect factor λ
    pub const LAMBDA: &str = "NDS Appendix N.3.3";
}

// ============================================================================
// Failure modes
// ============================================================================

/// Failure mode a factor set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorMode {
    Tension,
    Bending,
    Shear,
    Compression,
    Perpendicular,
    ElasticModulus,
}

impl FactorMode {
    /// All modes, in reporting order
    pub const ALL: [FactorMode; 6] = [
        FactorMode::Tension,
        FactorMode::Bending,
        FactorMode::Shear,
        FactorMode::Compression,
        FactorMode::Perpendicular,
        FactorMode::ElasticModulus,
    ];

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FactorMode::Tension => "Tension",
            FactorMode::Bending => "Bending",
            FactorMode::Shear => "Shear",
            FactorMode::Compression => "Compression",
            FactorMode::Perpendicular => "Compression Perpendicular",
            FactorMode::ElasticModulus => "Elastic Modulus",
        }
    }

    /// NDS format conversion factor K_F for this mode (LRFD)
    pub fn format_conversion(self) -> f64 {
        match self {
            FactorMode::Tension => 2.70,
            FactorMode::Bending => 2.54,
            FactorMode::Shear => 2.88,
            FactorMode::Compression => 2.40,
            FactorMode::Perpendicular => 1.67,
            FactorMode::ElasticModulus => 1.76,
        }
    }

    /// NDS resistance factor φ for this mode (LRFD)
    pub fn resistance_reduction(self) -> f64 {
        match self {
            FactorMode::Tension => 0.80,
            FactorMode::Bending => 0.85,
            FactorMode::Shear => 0.75,
            FactorMode::Compression => 0.90,
            FactorMode::Perpendicular => 0.90,
            FactorMode::ElasticModulus => 0.85,
        }
    }
}

impl std::fmt::Display for FactorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Stability factor slot
// ============================================================================

/// How the beam (C_L) or column (C_P) stability factor is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum StabilityFactor {
    /// Solve from slenderness, critical buckling stress and material constant
    #[default]
    Computed,

    /// Use a caller-supplied value in (0, 1]
    Fixed(f64),
}

impl StabilityFactor {
    /// Continuously braced member: C = 1.0
    pub fn braced() -> Self {
        StabilityFactor::Fixed(1.0)
    }

    fn validate(&self, mode: FactorMode, name: &str) -> CalcResult<()> {
        if let StabilityFactor::Fixed(value) = *self {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(CalcError::invalid_factor(mode.display_name(), name, value));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Factor set trait
// ============================================================================

/// Shared behaviour of the per-mode factor records.
pub trait AdjustmentFactorSet {
    /// Mode tag of this record
    const MODE: FactorMode;

    /// Every plain multiplier as (name, value). Stability slots are excluded;
    /// the capacity calculator resolves and applies them.
    fn factors(&self) -> Vec<(&'static str, f64)>;

    /// Check every factor is finite and > 0.
    fn validate(&self) -> CalcResult<()> {
        for (name, value) in self.factors() {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_factor(Self::MODE.display_name(), name, value));
            }
        }
        Ok(())
    }

    /// Product of every plain multiplier.
    fn product(&self) -> f64 {
        self.factors().iter().map(|(_, value)| value).product()
    }

    /// `base × product()`, after validation.
    fn adjust(&self, base: f64) -> CalcResult<f64> {
        self.validate()?;
        Ok(base * self.product())
    }
}

// ============================================================================
// Per-mode factor records
// ============================================================================

/// Tension parallel to grain factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TensionFactors {
    pub moisture: f64,
    pub temperature: f64,
    pub size: f64,
    pub incising: f64,
    pub format_conversion: f64,
    pub resistance_reduction: f64,
    pub time_effect: f64,
}

impl Default for TensionFactors {
    fn default() -> Self {
        Self {
            moisture: 1.0,
            temperature: 1.0,
            size: 1.0,
            incising: 1.0,
            format_conversion: 1.0,
            resistance_reduction: 1.0,
            time_effect: 1.0,
        }
    }
}

impl AdjustmentFactorSet for TensionFactors {
    const MODE: FactorMode = FactorMode::Tension;

    fn factors(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("moisture", self.moisture),
            ("temperature", self.temperature),
            ("size", self.size),
            ("incising", self.incising),
            ("format_conversion", self.format_conversion),
            ("resistance_reduction", self.resistance_reduction),
            ("time_effect", self.time_effect),
        ]
    }
}

/// Bending factors (one record per axis)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BendingFactors {
    pub moisture: f64,
    pub temperature: f64,
    pub beam_stability: StabilityFactor,
    pub size: f64,
    pub flat_use: f64,
    pub incising: f64,
    pub repetitive_member: f64,
    pub format_conversion: f64,
    pub resistance_reduction: f64,
    pub time_effect: f64,
}

impl Default for BendingFactors {
    fn default() -> Self {
        Self {
            moisture: 1.0,
            temperature: 1.0,
            beam_stability: StabilityFactor::Computed,
            size: 1.0,
            flat_use: 1.0,
            incising: 1.0,
            repetitive_member: 1.0,
            format_conversion: 1.0,
            resistance_reduction: 1.0,
            time_effect: 1.0,
        }
    }
}

impl AdjustmentFactorSet for BendingFactors {
    const MODE: FactorMode = FactorMode::Bending;

    fn factors(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("moisture", self.moisture),
            ("temperature", self.temperature),
            ("size", self.size),
            ("flat_use", self.flat_use),
            ("incising", self.incising),
            ("repetitive_member", self.repetitive_member),
            ("format_conversion", self.format_conversion),
            ("resistance_reduction", self.resistance_reduction),
            ("time_effect", self.time_effect),
        ]
    }

    fn validate(&self) -> CalcResult<()> {
        self.beam_stability.validate(Self::MODE, "beam_stability")?;
        for (name, value) in self.factors() {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_factor(Self::MODE.display_name(), name, value));
            }
        }
        Ok(())
    }
}

/// Shear parallel to grain factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShearFactors {
    pub moisture: f64,
    pub temperature: f64,
    pub incising: f64,
    pub format_conversion: f64,
    pub resistance_reduction: f64,
    pub time_effect: f64,
}

impl Default for ShearFactors {
    fn default() -> Self {
        Self {
            moisture: 1.0,
            temperature: 1.0,
            incising: 1.0,
            format_conversion: 1.0,
            resistance_reduction: 1.0,
            time_effect: 1.0,
        }
    }
}

impl AdjustmentFactorSet for ShearFactors {
    const MODE: FactorMode = FactorMode::Shear;

    fn factors(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("moisture", self.moisture),
            ("temperature", self.temperature),
            ("incising", self.incising),
            ("format_conversion", self.format_conversion),
            ("resistance_reduction", self.resistance_reduction),
            ("time_effect", self.time_effect),
        ]
    }
}

/// Compression parallel to grain factors (one record per buckling axis)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionFactors {
    pub moisture: f64,
    pub temperature: f64,
    pub size: f64,
    pub incising: f64,
    pub column_stability: StabilityFactor,
    pub format_conversion: f64,
    pub resistance_reduction: f64,
    pub time_effect: f64,
}

impl Default for CompressionFactors {
    fn default() -> Self {
        Self {
            moisture: 1.0,
            temperature: 1.0,
            size: 1.0,
            incising: 1.0,
            column_stability: StabilityFactor::Computed,
            format_conversion: 1.0,
            resistance_reduction: 1.0,
            time_effect: 1.0,
        }
    }
}

impl AdjustmentFactorSet for CompressionFactors {
    const MODE: FactorMode = FactorMode::Compression;

    fn factors(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("moisture", self.moisture),
            ("temperature", self.temperature),
            ("size", self.size),
            ("incising", self.incising),
            ("format_conversion", self.format_conversion),
            ("resistance_reduction", self.resistance_reduction),
            ("time_effect", self.time_effect),
        ]
    }

    fn validate(&self) -> CalcResult<()> {
        self.column_stability.validate(Self::MODE, "column_stability")?;
        for (name, value) in self.factors() {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_factor(Self::MODE.display_name(), name, value));
            }
        }
        Ok(())
    }
}

/// Compression perpendicular to grain (bearing) factors.
///
/// Carries the full field list of the input form; anything not relevant to
/// bearing simply stays at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerpendicularFactors {
    pub moisture: f64,
    pub temperature: f64,
    pub beam_stability: f64,
    pub size: f64,
    pub flat_use: f64,
    pub incising: f64,
    pub repetitive_member: f64,
    pub column_stability: f64,
    pub buckling_stiffness: f64,
    pub bearing_area: f64,
    pub format_conversion: f64,
    pub resistance_reduction: f64,
    pub time_effect: f64,
}

impl Default for PerpendicularFactors {
    fn default() -> Self {
        Self {
            moisture: 1.0,
            temperature: 1.0,
            beam_stability: 1.0,
            size: 1.0,
            flat_use: 1.0,
            incising: 1.0,
            repetitive_member: 1.0,
            column_stability: 1.0,
            buckling_stiffness: 1.0,
            bearing_area: 1.0,
            format_conversion: 1.0,
            resistance_reduction: 1.0,
            time_effect: 1.0,
        }
    }
}

impl AdjustmentFactorSet for PerpendicularFactors {
    const MODE: FactorMode = FactorMode::Perpendicular;

    fn factors(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("moisture", self.moisture),
            ("temperature", self.temperature),
            ("beam_stability", self.beam_stability),
            ("size", self.size),
            ("flat_use", self.flat_use),
            ("incising", self.incising),
            ("repetitive_member", self.repetitive_member),
            ("column_stability", self.column_stability),
            ("buckling_stiffness", self.buckling_stiffness),
            ("bearing_area", self.bearing_area),
            ("format_conversion", self.format_conversion),
            ("resistance_reduction", self.resistance_reduction),
            ("time_effect", self.time_effect),
        ]
    }
}

/// Elastic (stability) modulus factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElasticModulusFactors {
    pub moisture: f64,
    pub temperature: f64,
    pub incising: f64,
    pub format_conversion: f64,
    pub resistance_reduction: f64,
}

impl Default for ElasticModulusFactors {
    fn default() -> Self {
        Self {
            moisture: 1.0,
            temperature: 1.0,
            incising: 1.0,
            format_conversion: 1.0,
            resistance_reduction: 1.0,
        }
    }
}

impl AdjustmentFactorSet for ElasticModulusFactors {
    const MODE: FactorMode = FactorMode::ElasticModulus;

    fn factors(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("moisture", self.moisture),
            ("temperature", self.temperature),
            ("incising", self.incising),
            ("format_conversion", self.format_conversion),
            ("resistance_reduction", self.resistance_reduction),
        ]
    }
}

// ============================================================================
// Service conditions (presets that fill the factor records)
// ============================================================================

/// Load duration, mapped to C_D (ASD) or the time effect factor λ (LRFD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LoadDuration {
    /// Permanent loads (> 10 years): C_D = 0.9, λ = 0.6
    Permanent,

    /// Normal duration (10 years, occupancy live load): C_D = 1.0, λ = 0.8
    #[default]
    Normal,

    /// Snow load (2 months): C_D = 1.15, λ = 0.8
    Snow,

    /// Construction load (7 days): C_D = 1.25, λ = 0.8
    Construction,

    /// Wind/Earthquake (10 minutes): C_D = 1.6, λ = 1.0
    WindSeismic,

    /// Impact (instantaneous): C_D = 2.0, λ = 1.25
    Impact,
}

impl LoadDuration {
    /// All load duration variants
    pub const ALL: [LoadDuration; 6] = [
        LoadDuration::Permanent,
        LoadDuration::Normal,
        LoadDuration::Snow,
        LoadDuration::Construction,
        LoadDuration::WindSeismic,
        LoadDuration::Impact,
    ];

    /// ASD load duration factor C_D
    pub fn factor(&self) -> f64 {
        match self {
            LoadDuration::Permanent => 0.9,
            LoadDuration::Normal => 1.0,
            LoadDuration::Snow => 1.15,
            LoadDuration::Construction => 1.25,
            LoadDuration::WindSeismic => 1.6,
            LoadDuration::Impact => 2.0,
        }
    }

    /// LRFD time effect factor λ
    pub fn time_effect(&self) -> f64 {
        match self {
            LoadDuration::Permanent => 0.6,
            LoadDuration::Normal | LoadDuration::Snow | LoadDuration::Construction => 0.8,
            LoadDuration::WindSeismic => 1.0,
            LoadDuration::Impact => 1.25,
        }
    }
}

/// Wet service condition for C_M factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WetService {
    /// Dry conditions (MC ≤ 19%): C_M = 1.0
    #[default]
    Dry,

    /// Wet conditions (MC > 19%): C_M varies by property
    Wet,
}

impl WetService {
    /// C_M for a failure mode (NDS Table 4A adjustment factors)
    pub fn factor(&self, mode: FactorMode) -> f64 {
        match self {
            WetService::Dry => 1.0,
            WetService::Wet => match mode {
                FactorMode::Tension => 1.0,
                FactorMode::Bending => 0.85,
                FactorMode::Shear => 0.97,
                FactorMode::Compression => 0.8,
                FactorMode::Perpendicular => 0.67,
                FactorMode::ElasticModulus => 0.9,
            },
        }
    }
}

/// Temperature condition for C_t factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Temperature {
    /// T ≤ 100°F: C_t = 1.0
    #[default]
    Normal,

    /// 100°F < T ≤ 125°F
    Elevated,

    /// 125°F < T ≤ 150°F
    High,
}

impl Temperature {
    /// C_t per NDS Table 2.3.3
    ///
    /// Ft and E use 0.9 in both elevated ranges regardless of moisture;
    /// the strength modes depend on wet service.
    pub fn factor(&self, mode: FactorMode, wet_service: WetService) -> f64 {
        match (self, mode) {
            (Temperature::Normal, _) => 1.0,
            (_, FactorMode::Tension | FactorMode::ElasticModulus) => 0.9,
            (Temperature::Elevated, _) => match wet_service {
                WetService::Dry => 0.8,
                WetService::Wet => 0.7,
            },
            (Temperature::High, _) => match wet_service {
                WetService::Dry => 0.7,
                WetService::Wet => 0.5,
            },
        }
    }
}

/// Incising treatment condition for C_i factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Incising {
    /// Not incised: C_i = 1.0
    #[default]
    None,

    /// Incised for preservative treatment
    Incised,
}

impl Incising {
    /// C_i per NDS Table 4.3.8
    pub fn factor(&self, mode: FactorMode) -> f64 {
        match (self, mode) {
            (Incising::None, _) => 1.0,
            (Incising::Incised, FactorMode::ElasticModulus) => 0.95,
            (Incising::Incised, FactorMode::Perpendicular) => 1.0,
            (Incising::Incised, _) => 0.80,
        }
    }
}

/// Repetitive member factor (C_r) condition
///
/// Per NDS 4.3.9: applies when 3 or more members spaced ≤ 24" OC
/// are joined by floor, roof, or other load-distributing elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RepetitiveMember {
    /// Single member: C_r = 1.0
    #[default]
    Single,

    /// 3+ members with load distribution: C_r = 1.15
    Repetitive,
}

impl RepetitiveMember {
    /// Get C_r factor
    pub fn factor(&self) -> f64 {
        match self {
            RepetitiveMember::Single => 1.0,
            RepetitiveMember::Repetitive => 1.15,
        }
    }
}

/// Allowable stress or load and resistance factor format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DesignFormat {
    /// K_F = φ = 1.0, load duration enters as C_D
    #[default]
    Asd,
    /// K_F and φ per mode, load duration enters as λ
    Lrfd,
}

/// Service conditions that determine the dimension-independent factors.
///
/// Size and flat-use factors depend on lumber dimension tables and are left
/// at 1.0; set them on the resulting records directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConditions {
    pub design_format: DesignFormat,
    pub load_duration: LoadDuration,
    pub wet_service: WetService,
    pub temperature: Temperature,
    pub incising: Incising,
    pub repetitive_member: RepetitiveMember,
}

impl ServiceConditions {
    /// Default conditions: ASD, normal duration, dry, normal temperature
    pub fn new() -> Self {
        Self::default()
    }

    /// Set design format
    pub fn with_design_format(mut self, format: DesignFormat) -> Self {
        self.design_format = format;
        self
    }

    /// Set load duration
    pub fn with_load_duration(mut self, duration: LoadDuration) -> Self {
        self.load_duration = duration;
        self
    }

    /// Set wet service condition
    pub fn with_wet_service(mut self, wet: WetService) -> Self {
        self.wet_service = wet;
        self
    }

    /// Set temperature condition
    pub fn with_temperature(mut self, temp: Temperature) -> Self {
        self.temperature = temp;
        self
    }

    /// Set incising treatment
    pub fn with_incising(mut self, incising: Incising) -> Self {
        self.incising = incising;
        self
    }

    /// Set repetitive member factor
    pub fn with_repetitive(mut self, repetitive: RepetitiveMember) -> Self {
        self.repetitive_member = repetitive;
        self
    }

    fn c_m(&self, mode: FactorMode) -> f64 {
        self.wet_service.factor(mode)
    }

    fn c_t(&self, mode: FactorMode) -> f64 {
        self.temperature.factor(mode, self.wet_service)
    }

    fn k_f(&self, mode: FactorMode) -> f64 {
        match self.design_format {
            DesignFormat::Asd => 1.0,
            DesignFormat::Lrfd => mode.format_conversion(),
        }
    }

    fn phi(&self, mode: FactorMode) -> f64 {
        match self.design_format {
            DesignFormat::Asd => 1.0,
            DesignFormat::Lrfd => mode.resistance_reduction(),
        }
    }

    /// C_D in ASD, λ in LRFD
    fn duration(&self) -> f64 {
        match self.design_format {
            DesignFormat::Asd => self.load_duration.factor(),
            DesignFormat::Lrfd => self.load_duration.time_effect(),
        }
    }
}

// ============================================================================
// Full factor bundle
// ============================================================================

/// The eight factor records used by one design check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DesignFactors {
    pub tension: TensionFactors,
    pub bending_yy: BendingFactors,
    pub bending_zz: BendingFactors,
    pub shear: ShearFactors,
    pub compression_yy: CompressionFactors,
    pub compression_zz: CompressionFactors,
    pub perpendicular: PerpendicularFactors,
    pub elastic_modulus: ElasticModulusFactors,
}

impl DesignFactors {
    /// All factors 1.0, stability solved from geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// All factors 1.0 except the NDS format conversion K_F and resistance
    /// factor φ of each mode.
    pub fn lrfd() -> Self {
        let mut factors = Self::default();
        factors.set_format_conversion(FactorMode::format_conversion);
        factors.set_resistance_reduction(FactorMode::resistance_reduction);
        factors
    }

    /// Build factor records from service conditions.
    pub fn from_conditions(conditions: &ServiceConditions) -> Self {
        use FactorMode::*;

        let lambda = conditions.duration();
        let tension = TensionFactors {
            moisture: conditions.c_m(Tension),
            temperature: conditions.c_t(Tension),
            incising: conditions.incising.factor(Tension),
            time_effect: lambda,
            ..TensionFactors::default()
        };
        let bending = BendingFactors {
            moisture: conditions.c_m(Bending),
            temperature: conditions.c_t(Bending),
            incising: conditions.incising.factor(Bending),
            repetitive_member: conditions.repetitive_member.factor(),
            time_effect: lambda,
            ..BendingFactors::default()
        };
        let shear = ShearFactors {
            moisture: conditions.c_m(Shear),
            temperature: conditions.c_t(Shear),
            incising: conditions.incising.factor(Shear),
            time_effect: lambda,
            ..ShearFactors::default()
        };
        let compression = CompressionFactors {
            moisture: conditions.c_m(Compression),
            temperature: conditions.c_t(Compression),
            incising: conditions.incising.factor(Compression),
            time_effect: lambda,
            ..CompressionFactors::default()
        };
        // C_D does not apply to bearing in ASD (NDS Table 4.3.1); λ does in LRFD
        let perpendicular = PerpendicularFactors {
            moisture: conditions.c_m(Perpendicular),
            temperature: conditions.c_t(Perpendicular),
            incising: conditions.incising.factor(Perpendicular),
            time_effect: match conditions.design_format {
                DesignFormat::Asd => 1.0,
                DesignFormat::Lrfd => lambda,
            },
            ..PerpendicularFactors::default()
        };
        let elastic_modulus = ElasticModulusFactors {
            moisture: conditions.c_m(ElasticModulus),
            temperature: conditions.c_t(ElasticModulus),
            incising: conditions.incising.factor(ElasticModulus),
            ..ElasticModulusFactors::default()
        };

        let mut factors = DesignFactors {
            tension,
            bending_yy: bending,
            bending_zz: bending,
            shear,
            compression_yy: compression,
            compression_zz: compression,
            perpendicular,
            elastic_modulus,
        };
        factors.set_format_conversion(|mode| conditions.k_f(mode));
        factors.set_resistance_reduction(|mode| conditions.phi(mode));
        factors
    }

    /// Fix both beam stability factors (e.g. `StabilityFactor::braced()`)
    pub fn with_beam_stability(mut self, stability: StabilityFactor) -> Self {
        self.bending_yy.beam_stability = stability;
        self.bending_zz.beam_stability = stability;
        self
    }

    /// Fix both column stability factors
    pub fn with_column_stability(mut self, stability: StabilityFactor) -> Self {
        self.compression_yy.column_stability = stability;
        self.compression_zz.column_stability = stability;
        self
    }

    fn set_format_conversion(&mut self, value: impl Fn(FactorMode) -> f64) {
        self.tension.format_conversion = value(FactorMode::Tension);
        self.bending_yy.format_conversion = value(FactorMode::Bending);
        self.bending_zz.format_conversion = value(FactorMode::Bending);
        self.shear.format_conversion = value(FactorMode::Shear);
        self.compression_yy.format_conversion = value(FactorMode::Compression);
        self.compression_zz.format_conversion = value(FactorMode::Compression);
        self.perpendicular.format_conversion = value(FactorMode::Perpendicular);
        self.elastic_modulus.format_conversion = value(FactorMode::ElasticModulus);
    }

    fn set_resistance_reduction(&mut self, value: impl Fn(FactorMode) -> f64) {
        self.tension.resistance_reduction = value(FactorMode::Tension);
        self.bending_yy.resistance_reduction = value(FactorMode::Bending);
        self.bending_zz.resistance_reduction = value(FactorMode::Bending);
        self.shear.resistance_reduction = value(FactorMode::Shear);
        self.compression_yy.resistance_reduction = value(FactorMode::Compression);
        self.compression_zz.resistance_reduction = value(FactorMode::Compression);
        self.perpendicular.resistance_reduction = value(FactorMode::Perpendicular);
        self.elastic_modulus.resistance_reduction = value(FactorMode::ElasticModulus);
    }

    /// Validate all eight records
    pub fn validate(&self) -> CalcResult<()> {
        self.tension.validate()?;
        self.bending_yy.validate()?;
        self.bending_zz.validate()?;
        self.shear.validate()?;
        self.compression_yy.validate()?;
        self.compression_zz.validate()?;
        self.perpendicular.validate()?;
        self.elastic_modulus.validate()?;
        Ok(())
    }

    /// Format as a multi-line string for reports
    pub fn format_report(&self) -> String {
        let mut out = String::from("NDS Adjustment Factors\n================================================\n");
        let sections: [(&str, Vec<(&'static str, f64)>, &str); 8] = [
            ("Tension", self.tension.factors(), nds_ref::TENSION),
            ("Bending yy", self.bending_yy.factors(), nds_ref::BENDING),
            ("Bending zz", self.bending_zz.factors(), nds_ref::BENDING),
            ("Shear", self.shear.factors(), nds_ref::SHEAR),
            ("Compression yy", self.compression_yy.factors(), nds_ref::COMPRESSION),
            ("Compression zz", self.compression_zz.factors(), nds_ref::COMPRESSION),
            ("Compression perp", self.perpendicular.factors(), nds_ref::BEARING),
            ("Elastic modulus", self.elastic_modulus.factors(), nds_ref::C_M),
        ];
        for (title, factors, reference) in sections.iter() {
            let net: f64 = factors.iter().map(|(_, v)| v).product();
            out.push_str(&format!("{:<18} net = {:.3}   {}\n", title, net, reference));
            for (name, value) in factors {
                if (*value - 1.0).abs() > f64::EPSILON {
                    out.push_str(&format!("    {:<22} = {:.3}\n", name, value));
                }
            }
        }
        out.push_str(&format!(
            "Beam stability     yy = {}, zz = {}   {}\n",
            describe_stability(self.bending_yy.beam_stability),
            describe_stability(self.bending_zz.beam_stability),
            nds_ref::C_L,
        ));
        out.push_str(&format!(
            "Column stability   yy = {}, zz = {}   {}",
            describe_stability(self.compression_yy.column_stability),
            describe_stability(self.compression_zz.column_stability),
            nds_ref::C_P,
        ));
        out
    }
}

fn describe_stability(stability: StabilityFactor) -> String {
    match stability {
        StabilityFactor::Computed => "computed".to_string(),
        StabilityFactor::Fixed(value) => format!("{:.3}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unity() {
        assert_eq!(TensionFactors::default().product(), 1.0);
        assert_eq!(BendingFactors::default().product(), 1.0);
        assert_eq!(ShearFactors::default().product(), 1.0);
        assert_eq!(CompressionFactors::default().product(), 1.0);
        assert_eq!(PerpendicularFactors::default().product(), 1.0);
        assert_eq!(ElasticModulusFactors::default().product(), 1.0);
    }

    #[test]
    fn test_unity_factors_leave_base_exact() {
        for base in [84.0, 212.0, 94.9, 81.4, 8.54, 127000.0, 0.1 + 0.2] {
            assert_eq!(TensionFactors::default().adjust(base).unwrap(), base);
            assert_eq!(BendingFactors::default().adjust(base).unwrap(), base);
            assert_eq!(PerpendicularFactors::default().adjust(base).unwrap(), base);
        }
    }

    #[test]
    fn test_every_factor_applied_once() {
        let factors = ShearFactors {
            moisture: 0.97,
            temperature: 0.8,
            incising: 0.8,
            format_conversion: 2.88,
            resistance_reduction: 0.75,
            time_effect: 0.8,
        };
        let expected = 0.97 * 0.8 * 0.8 * 2.88 * 0.75 * 0.8;
        assert!((factors.product() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let factors = TensionFactors {
            incising: 0.0,
            ..TensionFactors::default()
        };
        let err = factors.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FACTOR");
        assert!(err.to_string().contains("incising"));

        let negative = ElasticModulusFactors {
            moisture: -0.9,
            ..ElasticModulusFactors::default()
        };
        assert!(negative.adjust(100.0).is_err());
    }

    #[test]
    fn test_fixed_stability_must_be_in_unit_interval() {
        let mut bending = BendingFactors::default();
        bending.beam_stability = StabilityFactor::Fixed(1.2);
        assert!(bending.validate().is_err());
        bending.beam_stability = StabilityFactor::Fixed(0.0);
        assert!(bending.validate().is_err());
        bending.beam_stability = StabilityFactor::braced();
        assert!(bending.validate().is_ok());
    }

    #[test]
    fn test_stability_excluded_from_plain_product() {
        let compression = CompressionFactors {
            column_stability: StabilityFactor::Fixed(0.5),
            ..CompressionFactors::default()
        };
        assert_eq!(compression.product(), 1.0);
        assert!(!compression.factors().iter().any(|(name, _)| *name == "column_stability"));
    }

    #[test]
    fn test_lrfd_factors() {
        let factors = DesignFactors::lrfd();
        assert_eq!(factors.tension.format_conversion, 2.70);
        assert_eq!(factors.tension.resistance_reduction, 0.80);
        assert_eq!(factors.bending_zz.format_conversion, 2.54);
        assert_eq!(factors.shear.resistance_reduction, 0.75);
        assert_eq!(factors.compression_yy.format_conversion, 2.40);
        assert_eq!(factors.perpendicular.format_conversion, 1.67);
        assert_eq!(factors.elastic_modulus.format_conversion, 1.76);
        assert_eq!(factors.elastic_modulus.resistance_reduction, 0.85);
        assert_eq!(factors.tension.moisture, 1.0);
        assert!(factors.validate().is_ok());
    }

    #[test]
    fn test_lrfd_matches_mode_tables() {
        let factors = DesignFactors::lrfd();
        let records: [(FactorMode, f64, f64); 6] = [
            (FactorMode::Tension, factors.tension.format_conversion, factors.tension.resistance_reduction),
            (FactorMode::Bending, factors.bending_yy.format_conversion, factors.bending_yy.resistance_reduction),
            (FactorMode::Shear, factors.shear.format_conversion, factors.shear.resistance_reduction),
            (
                FactorMode::Compression,
                factors.compression_zz.format_conversion,
                factors.compression_zz.resistance_reduction,
            ),
            (
                FactorMode::Perpendicular,
                factors.perpendicular.format_conversion,
                factors.perpendicular.resistance_reduction,
            ),
            (
                FactorMode::ElasticModulus,
                factors.elastic_modulus.format_conversion,
                factors.elastic_modulus.resistance_reduction,
            ),
        ];
        for (mode, k_f, phi) in records {
            assert_eq!(k_f, mode.format_conversion(), "{}", mode);
            assert_eq!(phi, mode.resistance_reduction(), "{}", mode);
        }
        assert_eq!(FactorMode::ALL.len(), records.len());
    }

    #[test]
    fn test_from_conditions_asd_wet_snow() {
        let conditions = ServiceConditions::new()
            .with_load_duration(LoadDuration::Snow)
            .with_wet_service(WetService::Wet)
            .with_repetitive(RepetitiveMember::Repetitive);
        let factors = DesignFactors::from_conditions(&conditions);

        assert_eq!(factors.bending_yy.moisture, 0.85);
        assert_eq!(factors.bending_yy.time_effect, 1.15);
        assert_eq!(factors.bending_zz.repetitive_member, 1.15);
        assert_eq!(factors.shear.moisture, 0.97);
        assert_eq!(factors.compression_zz.moisture, 0.8);
        assert_eq!(factors.perpendicular.moisture, 0.67);
        assert_eq!(factors.perpendicular.time_effect, 1.0);
        assert_eq!(factors.elastic_modulus.moisture, 0.9);
        assert_eq!(factors.tension.format_conversion, 1.0);
    }

    #[test]
    fn test_from_conditions_lrfd_uses_time_effect() {
        let conditions = ServiceConditions::new()
            .with_design_format(DesignFormat::Lrfd)
            .with_load_duration(LoadDuration::Permanent);
        let factors = DesignFactors::from_conditions(&conditions);
        assert_eq!(factors.tension.time_effect, 0.6);
        assert_eq!(factors.perpendicular.time_effect, 0.6);
        assert_eq!(factors.bending_yy.format_conversion, 2.54);
        assert_eq!(factors.compression_yy.resistance_reduction, 0.90);
    }

    #[test]
    fn test_temperature_factors() {
        assert_eq!(Temperature::Normal.factor(FactorMode::Bending, WetService::Dry), 1.0);
        assert_eq!(Temperature::Elevated.factor(FactorMode::Bending, WetService::Dry), 0.8);
        assert_eq!(Temperature::Elevated.factor(FactorMode::Bending, WetService::Wet), 0.7);
        assert_eq!(Temperature::High.factor(FactorMode::Shear, WetService::Wet), 0.5);
        assert_eq!(Temperature::High.factor(FactorMode::Tension, WetService::Wet), 0.9);
    }

    #[test]
    fn test_incising_factors() {
        assert_eq!(Incising::Incised.factor(FactorMode::ElasticModulus), 0.95);
        assert_eq!(Incising::Incised.factor(FactorMode::Bending), 0.80);
        assert_eq!(Incising::Incised.factor(FactorMode::Perpendicular), 1.0);
    }

    #[test]
    fn test_misnamed_factor_rejected_on_load() {
        let json = r#"{ "moisture": 0.9, "temprature": 0.8 }"#;
        assert!(serde_json::from_str::<TensionFactors>(json).is_err());

        let partial: TensionFactors = serde_json::from_str(r#"{ "moisture": 0.9 }"#).unwrap();
        assert_eq!(partial.moisture, 0.9);
        assert_eq!(partial.temperature, 1.0);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let factors = DesignFactors::lrfd().with_beam_stability(StabilityFactor::braced());
        let json = serde_json::to_string(&factors).unwrap();
        let parsed: DesignFactors = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, factors);
    }

    #[test]
    fn test_format_report_lists_non_unity_factors() {
        let report = DesignFactors::lrfd().format_report();
        assert!(report.contains("format_conversion"));
        assert!(report.contains("computed"));
        assert!(!report.contains("moisture"));
    }
}
