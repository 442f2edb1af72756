//! # Demand-to-Capacity Ratios
//!
//! Per-mode ratios and combined-stress interaction for one force demand
//! against one set of [`SectionCapacities`].
//!
//! ## Simple ratios
//!
//! ```text
//! axial        = |P| / T'          (P > 0, tension)
//!              = |P| / min(P'yy, P'zz)   (P < 0, compression)
//! shear_y/z    = |V| / V'
//! bending_yy   = |M_yy| / M'_yy
//! bending_zz   = |M_zz| / M'_zz
//! biaxial      = bending_yy + bending_zz
//! ```
//!
//! ## Combined axial and bending
//!
//! Tension or zero axial uses the linear sum. Compression amplifies the
//! bending terms for second-order (P-Δ) effects; the form depends on the
//! [`InteractionPolicy`]. An amplification divisor at or past zero is a
//! `NumericInstability` error, never an infinite ratio.
//!
//! Torsion (`moment_xx`) is carried on the demand but not checked.

use serde::{Deserialize, Serialize};

use crate::calculations::capacity::SectionCapacities;
use crate::errors::{CalcError, CalcResult};
use crate::forces::ForceDemand;
use crate::section::Axis;

/// Interaction law for compression with biaxial bending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InteractionPolicy {
    /// `P/P' + Σ (M/M')_axis / (1 - f_c/F_cE,axis)`, each axis amplified on its own
    #[default]
    IndependentAxes,

    /// NDS Eq. 3.9-3:
    /// `(f_c/F'c)² + (M/M')_yy / (1 - f_c/F_cE,yy) + (M/M')_zz / (1 - f_c/F_cE,zz - (f_b,yy/F_bE,yy)²)`
    Nds2018,
}

impl InteractionPolicy {
    pub fn display_name(&self) -> &'static str {
        match self {
            InteractionPolicy::IndependentAxes => "Independent axes",
            InteractionPolicy::Nds2018 => "NDS 2018 Eq. 3.9-3",
        }
    }
}

/// Which capacity the axial demand was compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxialMode {
    Tension,
    Compression,
    None,
}

/// Identifies one reported ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DcrMode {
    Axial,
    ShearY,
    ShearZ,
    BendingYy,
    BendingZz,
    BiaxialBending,
    Combined,
}

impl DcrMode {
    pub const ALL: [DcrMode; 7] = [
        DcrMode::Axial,
        DcrMode::ShearY,
        DcrMode::ShearZ,
        DcrMode::BendingYy,
        DcrMode::BendingZz,
        DcrMode::BiaxialBending,
        DcrMode::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DcrMode::Axial => "axial",
            DcrMode::ShearY => "shear_y",
            DcrMode::ShearZ => "shear_z",
            DcrMode::BendingYy => "bending_yy",
            DcrMode::BendingZz => "bending_zz",
            DcrMode::BiaxialBending => "biaxial_bending",
            DcrMode::Combined => "combined",
        }
    }
}

impl std::fmt::Display for DcrMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// All ratios for one demand. Every ratio is reported, pass or fail.
///
/// ## JSON Example
///
/// ```json
/// {
///   "axial_mode": "Compression",
///   "axial": 0.42,
///   "shear_y": 0.05,
///   "shear_z": 0.0,
///   "bending_yy": 0.31,
///   "bending_zz": 0.0,
///   "biaxial_bending": 0.31,
///   "combined": 0.93
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcrResult {
    pub axial_mode: AxialMode,
    pub axial: f64,
    pub shear_y: f64,
    pub shear_z: f64,
    pub bending_yy: f64,
    pub bending_zz: f64,
    pub biaxial_bending: f64,
    pub combined: f64,
}

impl DcrResult {
    pub fn ratio(&self, mode: DcrMode) -> f64 {
        match mode {
            DcrMode::Axial => self.axial,
            DcrMode::ShearY => self.shear_y,
            DcrMode::ShearZ => self.shear_z,
            DcrMode::BendingYy => self.bending_yy,
            DcrMode::BendingZz => self.bending_zz,
            DcrMode::BiaxialBending => self.biaxial_bending,
            DcrMode::Combined => self.combined,
        }
    }

    /// (mode, ratio) pairs in reporting order
    pub fn ratios(&self) -> [(DcrMode, f64); 7] {
        DcrMode::ALL.map(|mode| (mode, self.ratio(mode)))
    }

    /// Mode with the largest ratio (first listed on a tie)
    pub fn governing(&self) -> (DcrMode, f64) {
        self.ratios()
            .into_iter()
            .fold((DcrMode::Axial, self.axial), |best, current| {
                if current.1 > best.1 {
                    current
                } else {
                    best
                }
            })
    }

    pub fn max_ratio(&self) -> f64 {
        self.governing().1
    }

    /// Every ratio ≤ `limit`
    pub fn passes(&self, limit: f64) -> bool {
        self.max_ratio() <= limit
    }

    /// Modes whose ratio exceeds `limit`
    pub fn failed_modes(&self, limit: f64) -> Vec<DcrMode> {
        self.ratios()
            .into_iter()
            .filter(|(_, ratio)| *ratio > limit)
            .map(|(mode, _)| mode)
            .collect()
    }
}

fn demand_ratio(demand: f64, capacity: f64) -> f64 {
    if demand == 0.0 {
        0.0
    } else {
        demand.abs() / capacity
    }
}

/// Second-order amplifier divisor 1 - f_c/F_cE for one axis.
fn amplification_divisor(fc: f64, critical_stress: Option<f64>) -> (f64, f64) {
    let ratio = critical_stress.map_or(0.0, |f_ce| fc / f_ce);
    (1.0 - ratio, ratio)
}

/// Evaluate every ratio for `force` against `capacities`.
///
/// # Errors
/// `NumericInstability` when a compression amplification divisor for an
/// axis that carries bending is ≤ 0.
///
/// # Example
/// ```rust
/// use timber_core::calculations::capacity::MemberDesign;
/// use timber_core::calculations::dcr::{evaluate, InteractionPolicy};
/// use timber_core::forces::ForceDemand;
/// use timber_core::materials::MaterialProperties;
/// use timber_core::member::MemberDefinition;
/// use timber_core::nds_factors::DesignFactors;
/// use timber_core::section::RectangularSectionProperties;
///
/// let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
/// let section = RectangularSectionProperties::new("S", 6.4, 6.4).unwrap();
/// let member = MemberDefinition::new("M", 300.0);
/// let factors = DesignFactors::lrfd();
/// let caps = MemberDesign::new(&material, &section, &member, &factors)
///     .unwrap()
///     .capacities()
///     .unwrap();
///
/// let dcr = evaluate(&ForceDemand::zero("F0"), &caps, InteractionPolicy::default()).unwrap();
/// assert_eq!(dcr.max_ratio(), 0.0);
/// ```
pub fn evaluate(
    force: &ForceDemand,
    capacities: &SectionCapacities,
    policy: InteractionPolicy,
) -> CalcResult<DcrResult> {
    force.validate()?;

    // === Simple ratios ===
    let (axial_mode, axial) = if force.axial > 0.0 {
        (AxialMode::Tension, force.axial / capacities.tension)
    } else if force.axial < 0.0 {
        (AxialMode::Compression, -force.axial / capacities.compression())
    } else {
        (AxialMode::None, 0.0)
    };

    let shear_y = demand_ratio(force.shear_y, capacities.shear);
    let shear_z = demand_ratio(force.shear_z, capacities.shear);
    let bending_yy = demand_ratio(force.moment_yy, capacities.yy.bending);
    let bending_zz = demand_ratio(force.moment_zz, capacities.zz.bending);
    let biaxial_bending = bending_yy + bending_zz;

    // === Combined axial + bending ===
    let combined = match axial_mode {
        AxialMode::Tension | AxialMode::None => axial + biaxial_bending,
        AxialMode::Compression => {
            let fc = -force.axial / capacities.area;
            match policy {
                InteractionPolicy::IndependentAxes => {
                    let mut total = axial;
                    for (axis, bending) in [(Axis::YY, bending_yy), (Axis::ZZ, bending_zz)] {
                        if bending == 0.0 {
                            continue;
                        }
                        let critical = capacities.axis(axis).column_stability.critical_stress;
                        let (divisor, ratio) = amplification_divisor(fc, critical);
                        if divisor <= 0.0 {
                            return Err(CalcError::numeric_instability(
                                format!("combined compression {}", axis),
                                ratio,
                            ));
                        }
                        total += bending / divisor;
                    }
                    total
                }
                InteractionPolicy::Nds2018 => {
                    nds_combined_compression(force, capacities, fc, axial, bending_yy, bending_zz)?
                }
            }
        }
    };

    Ok(DcrResult {
        axial_mode,
        axial,
        shear_y,
        shear_z,
        bending_yy,
        bending_zz,
        biaxial_bending,
        combined,
    })
}

/// NDS Eq. 3.9-3 with y-y as the edgewise (d1) direction.
fn nds_combined_compression(
    force: &ForceDemand,
    capacities: &SectionCapacities,
    fc: f64,
    axial: f64,
    bending_yy: f64,
    bending_zz: f64,
) -> CalcResult<f64> {
    let mut total = axial * axial;

    if bending_yy != 0.0 {
        let (divisor, ratio) =
            amplification_divisor(fc, capacities.yy.column_stability.critical_stress);
        if divisor <= 0.0 {
            return Err(CalcError::numeric_instability("combined compression yy", ratio));
        }
        total += bending_yy / divisor;
    }

    if bending_zz != 0.0 {
        let (divisor, ratio) =
            amplification_divisor(fc, capacities.zz.column_stability.critical_stress);
        // f_b,yy = M_yy / S_yy, recovered from M'_yy = Fb'_yy · S_yy
        let fb_yy = force.moment_yy.abs() * capacities.yy.adjusted_bending / capacities.yy.bending;
        let lateral = capacities
            .yy
            .beam_stability
            .critical_stress
            .map_or(0.0, |f_be| (fb_yy / f_be).powi(2));
        let divisor = divisor - lateral;
        if divisor <= 0.0 {
            return Err(CalcError::numeric_instability(
                "combined compression zz",
                ratio + lateral,
            ));
        }
        total += bending_zz / divisor;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::capacity::MemberDesign;
    use crate::materials::MaterialProperties;
    use crate::member::MemberDefinition;
    use crate::nds_factors::DesignFactors;
    use crate::section::RectangularSectionProperties;
    use approx::assert_relative_eq;

    fn capacities(width: f64, depth: f64, length: f64) -> SectionCapacities {
        let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
        let section = RectangularSectionProperties::new("S", width, depth).unwrap();
        let member = MemberDefinition::new("M", length);
        let factors = DesignFactors::lrfd();
        MemberDesign::new(&material, &section, &member, &factors)
            .unwrap()
            .capacities()
            .unwrap()
    }

    #[test]
    fn test_zero_demand_gives_zero_ratios() {
        let caps = capacities(6.4, 6.4, 300.0);
        for policy in [InteractionPolicy::IndependentAxes, InteractionPolicy::Nds2018] {
            let dcr = evaluate(&ForceDemand::zero("F"), &caps, policy).unwrap();
            for (mode, ratio) in dcr.ratios() {
                assert_eq!(ratio, 0.0, "{} should be zero", mode);
            }
            assert_eq!(dcr.axial_mode, AxialMode::None);
            assert!(dcr.passes(1.0));
        }
    }

    #[test]
    fn test_axial_sign_selects_capacity() {
        let caps = capacities(6.4, 6.4, 300.0);
        let tension = evaluate(&ForceDemand::zero("T").with_axial(1000.0), &caps, Default::default()).unwrap();
        assert_eq!(tension.axial_mode, AxialMode::Tension);
        assert_relative_eq!(tension.axial, 1000.0 / caps.tension);

        let compression =
            evaluate(&ForceDemand::zero("C").with_axial(-1000.0), &caps, Default::default()).unwrap();
        assert_eq!(compression.axial_mode, AxialMode::Compression);
        assert_relative_eq!(compression.axial, 1000.0 / caps.compression());
        assert!(compression.axial > tension.axial);
    }

    #[test]
    fn test_shear_and_bending_use_magnitude() {
        let caps = capacities(6.4, 6.4, 300.0);
        let force = ForceDemand::zero("F").with_shears(-100.0, 50.0).with_moments(999.0, -2000.0, 500.0);
        let dcr = evaluate(&force, &caps, Default::default()).unwrap();

        assert_relative_eq!(dcr.shear_y, 100.0 / caps.shear);
        assert_relative_eq!(dcr.shear_z, 50.0 / caps.shear);
        assert_relative_eq!(dcr.bending_yy, 2000.0 / caps.yy.bending);
        assert_relative_eq!(dcr.bending_zz, 500.0 / caps.zz.bending);
        assert_relative_eq!(dcr.biaxial_bending, dcr.bending_yy + dcr.bending_zz);
        // no axial: combined is the linear sum, torsion ignored
        assert_relative_eq!(dcr.combined, dcr.biaxial_bending);
    }

    #[test]
    fn test_tension_combined_is_linear() {
        let caps = capacities(6.4, 6.4, 300.0);
        let force = ForceDemand::zero("F").with_axial(2000.0).with_moments(0.0, 3000.0, 1000.0);
        let dcr = evaluate(&force, &caps, InteractionPolicy::Nds2018).unwrap();
        assert_relative_eq!(dcr.combined, dcr.axial + dcr.bending_yy + dcr.bending_zz);
    }

    #[test]
    fn test_compression_amplifies_bending() {
        let caps = capacities(6.4, 6.4, 300.0);
        let force = ForceDemand::zero("F").with_axial(-500.0).with_moments(0.0, 3000.0, 0.0);
        let dcr = evaluate(&force, &caps, InteractionPolicy::IndependentAxes).unwrap();

        let fc = 500.0 / caps.area;
        let f_ce = caps.yy.column_stability.critical_stress.unwrap();
        let expected = dcr.axial + dcr.bending_yy / (1.0 - fc / f_ce);
        assert_relative_eq!(dcr.combined, expected, max_relative = 1e-12);
        assert!(dcr.combined > dcr.axial + dcr.bending_yy);
    }

    #[test]
    fn test_nds_policy_squares_axial_term() {
        let caps = capacities(6.4, 6.4, 300.0);
        let force = ForceDemand::zero("F").with_axial(-500.0).with_moments(0.0, 3000.0, 0.0);
        let independent = evaluate(&force, &caps, InteractionPolicy::IndependentAxes).unwrap();
        let nds = evaluate(&force, &caps, InteractionPolicy::Nds2018).unwrap();

        assert!(independent.axial < 1.0);
        assert_relative_eq!(
            nds.combined - nds.axial * nds.axial,
            independent.combined - independent.axial,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_instability_flagged_before_divisor_reaches_zero() {
        let caps = capacities(6.4, 6.4, 300.0);
        let f_ce = caps.yy.column_stability.critical_stress.unwrap();

        // f_c just below F_cE: finite but large
        let near = -(f_ce * caps.area) * (1.0 - 1e-9);
        let force = ForceDemand::zero("F").with_axial(near).with_moments(0.0, 10.0, 0.0);
        let dcr = evaluate(&force, &caps, Default::default()).unwrap();
        assert!(dcr.combined.is_finite());

        // f_c at (to rounding) and beyond F_cE
        for scale in [1.0 + 1e-9, 1.5] {
            let force = ForceDemand::zero("F")
                .with_axial(-(f_ce * caps.area) * scale)
                .with_moments(0.0, 10.0, 0.0);
            for policy in [InteractionPolicy::IndependentAxes, InteractionPolicy::Nds2018] {
                let err = evaluate(&force, &caps, policy).unwrap_err();
                assert_eq!(err.error_code(), "NUMERIC_INSTABILITY");
                assert!(err.is_design_failure());
            }
        }
    }

    #[test]
    fn test_governing_and_failed_modes() {
        let caps = capacities(6.4, 6.4, 300.0);
        let force = ForceDemand::zero("F").with_shears(caps.shear * 1.5, 0.0);
        let dcr = evaluate(&force, &caps, Default::default()).unwrap();

        assert_eq!(dcr.governing().0, DcrMode::ShearY);
        assert_relative_eq!(dcr.max_ratio(), 1.5);
        assert!(!dcr.passes(1.0));
        assert_eq!(dcr.failed_modes(1.0), vec![DcrMode::ShearY]);
    }

    #[test]
    fn test_non_finite_force_rejected() {
        let caps = capacities(6.4, 6.4, 300.0);
        let force = ForceDemand::zero("F").with_axial(f64::INFINITY);
        assert_eq!(
            evaluate(&force, &caps, Default::default()).unwrap_err().error_code(),
            "INVALID_INPUT"
        );
    }
}
