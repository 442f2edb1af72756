//! # Stability Factor Formulas
//!
//! Column stability factor C_P (NDS 3.7.1) and beam stability factor C_L
//! (NDS 3.3.3) share one closed-form expression:
//!
//! ```text
//!         1 + α       ⎛ 1 + α ⎞²    α
//! C  =  ─────── - √ ⎜ ───── ⎟  - ───
//!          2c         ⎝  2c   ⎠     c
//!
//! α = F_E / F*
//! ```
//!
//! where `F_E` is the critical buckling design value, `F*` is the adjusted
//! reference value excluding the stability factor itself, and `c` is a
//! material-class constant:
//!
//! | Use                                  | c    |
//! |--------------------------------------|------|
//! | Column, sawn lumber                  | 0.80 |
//! | Column, round timber pole            | 0.85 |
//! | Column, glulam / structural composite| 0.90 |
//! | Beam (all wood products)             | 0.95 |
//!
//! The expression is the smaller root of `c·C² - (1 + α)·C + α = 0`, which
//! always lies in (0, 1] for 0 < c ≤ 1 and α > 0.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Column slenderness ceiling in terms of le/r (NDS 3.7.1.4: le/d ≤ 50, and r = d/√12)
pub const COLUMN_SLENDERNESS_LIMIT: f64 = 173.205_080_756_887_72;

/// Beam slenderness ceiling on R_B (NDS 3.3.3.7)
pub const BEAM_SLENDERNESS_LIMIT: f64 = 50.0;

/// Beam stability constant (the 1.9 = 2c and 0.95 = c of NDS Eq. 3.3-6)
pub const BEAM_STABILITY_CONSTANT: f64 = 0.95;

/// Coefficient on E'min in the beam critical buckling value (NDS 3.3.3.8)
pub const BEAM_BUCKLING_COEFFICIENT: f64 = 1.20;

/// Closed-form stability factor for a buckling/crushing interaction.
///
/// `alpha` is F_E / F*; `c` the material-class constant. An infinite `alpha`
/// (zero slenderness) gives exactly 1.0.
///
/// Evaluated as `2ρ / (1 + √(1 - 4cρ/(1 + α)))` with `ρ = α/(1 + α)`. This is
/// the textbook root `B - √(B² - α/c)`, `B = (1 + α)/(2c)`, rationalized and
/// divided through by `B`: no cancellation, and no intermediate overflows for
/// any finite α.
///
/// # Example
/// ```rust
/// use timber_core::equations::stability::stability_factor;
///
/// let cp = stability_factor(1.0, 0.8);
/// assert!(cp > 0.0 && cp < 1.0);
/// assert_eq!(stability_factor(f64::INFINITY, 0.8), 1.0);
/// ```
pub fn stability_factor(alpha: f64, c: f64) -> f64 {
    if alpha.is_infinite() {
        return 1.0;
    }
    let rho = alpha / (1.0 + alpha);
    let disc = (1.0 - 4.0 * c * rho / (1.0 + alpha)).max(0.0);
    let factor = 2.0 * rho / (1.0 + disc.sqrt());
    factor.min(1.0)
}

/// Euler critical buckling stress for a column, F_cE = π²·E / (le/r)².
///
/// Equivalent to NDS 0.822·E'min/(le/d)² for rectangles. Returns `None`
/// when slenderness is zero (no buckling).
pub fn column_critical_stress(elastic_modulus: f64, slenderness: f64) -> Option<f64> {
    if slenderness <= 0.0 {
        return None;
    }
    Some(std::f64::consts::PI.powi(2) * elastic_modulus / (slenderness * slenderness))
}

/// Critical buckling design value for a beam, F_bE = 1.20·E'min / R_B².
pub fn beam_critical_stress(elastic_modulus: f64, rb: f64) -> Option<f64> {
    if rb <= 0.0 {
        return None;
    }
    Some(BEAM_BUCKLING_COEFFICIENT * elastic_modulus / (rb * rb))
}

/// Beam slenderness ratio R_B = √(le·d / b²) (NDS Eq. 3.3-5)
pub fn beam_slenderness(effective_length: f64, depth: f64, breadth: f64) -> f64 {
    (effective_length * depth / (breadth * breadth)).sqrt()
}

/// Outcome of a column or beam stability evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityCheck {
    /// le/r for columns, R_B for beams
    pub slenderness: f64,

    /// Code ceiling the slenderness was checked against
    pub limit: f64,

    /// Critical buckling stress F_cE or F_bE; `None` when buckling cannot occur
    pub critical_stress: Option<f64>,

    /// Stability factor C_P or C_L, in (0, 1]
    pub factor: f64,
}

impl StabilityCheck {
    /// A check that does not govern (fully braced, zero length, d ≤ b, or a
    /// user-fixed factor).
    pub fn unbuckled(slenderness: f64, limit: f64, factor: f64) -> Self {
        StabilityCheck {
            slenderness,
            limit,
            critical_stress: None,
            factor,
        }
    }
}

/// Column stability factor C_P for one axis.
///
/// # Arguments
/// * `label` - Identifies the check in errors (e.g. "column yy")
/// * `effective_length` - le = K·L
/// * `radius_of_gyration` - r about the buckling axis
/// * `elastic_modulus` - adjusted stability modulus E'min
/// * `fc_star` - Fc* = Fc × all compression factors except C_P
/// * `c` - material-class constant
///
/// # Errors
/// `SlendernessExceeded` when le/r is past [`COLUMN_SLENDERNESS_LIMIT`].
pub fn column_stability(
    label: &str,
    effective_length: f64,
    radius_of_gyration: f64,
    elastic_modulus: f64,
    fc_star: f64,
    c: f64,
) -> CalcResult<StabilityCheck> {
    let slenderness = effective_length / radius_of_gyration;
    if slenderness > COLUMN_SLENDERNESS_LIMIT {
        return Err(CalcError::slenderness_exceeded(
            label,
            slenderness,
            COLUMN_SLENDERNESS_LIMIT,
        ));
    }

    let critical_stress = column_critical_stress(elastic_modulus, slenderness);
    let factor = match critical_stress {
        Some(f_ce) => stability_factor(f_ce / fc_star, c),
        None => 1.0,
    };

    Ok(StabilityCheck {
        slenderness,
        limit: COLUMN_SLENDERNESS_LIMIT,
        critical_stress,
        factor,
    })
}

/// Beam stability factor C_L for bending about one axis.
///
/// `depth` is the dimension resisting the bending, `breadth` the other one.
/// When depth ≤ breadth the compression edge cannot roll out of plane and
/// C_L = 1.0 (NDS 3.3.3.1).
///
/// # Errors
/// `SlendernessExceeded` when R_B is past [`BEAM_SLENDERNESS_LIMIT`].
pub fn beam_stability(
    label: &str,
    effective_length: f64,
    depth: f64,
    breadth: f64,
    elastic_modulus: f64,
    fb_star: f64,
) -> CalcResult<StabilityCheck> {
    let rb = beam_slenderness(effective_length, depth, breadth);
    if depth <= breadth {
        return Ok(StabilityCheck::unbuckled(rb, BEAM_SLENDERNESS_LIMIT, 1.0));
    }
    if rb > BEAM_SLENDERNESS_LIMIT {
        return Err(CalcError::slenderness_exceeded(label, rb, BEAM_SLENDERNESS_LIMIT));
    }

    let critical_stress = beam_critical_stress(elastic_modulus, rb);
    let factor = match critical_stress {
        Some(f_be) => stability_factor(f_be / fb_star, BEAM_STABILITY_CONSTANT),
        None => 1.0,
    };

    Ok(StabilityCheck {
        slenderness: rb,
        limit: BEAM_SLENDERNESS_LIMIT,
        critical_stress,
        factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Textbook form, fine for moderate α
    fn naive(alpha: f64, c: f64) -> f64 {
        let b = (1.0 + alpha) / (2.0 * c);
        b - (b * b - alpha / c).sqrt()
    }

    #[test]
    fn test_stability_factor_matches_textbook_form() {
        for &c in &[0.8, 0.85, 0.9, 0.95] {
            for &alpha in &[0.05, 0.3, 0.8, 1.0, 1.5, 3.0, 10.0] {
                assert_relative_eq!(stability_factor(alpha, c), naive(alpha, c), max_relative = 1e-10);
            }
        }
    }

    #[test]
    fn test_stability_factor_in_unit_interval() {
        let mut alpha = 1e-6;
        while alpha < 1e300 {
            for &c in &[0.8, 0.85, 0.9, 0.95] {
                let f = stability_factor(alpha, c);
                assert!(f > 0.0 && f <= 1.0, "alpha = {}, c = {}, C = {}", alpha, c, f);
            }
            alpha *= 3.7;
        }
    }

    #[test]
    fn test_stability_factor_for_huge_alpha() {
        for &alpha in &[1e160, 1e200, 1e300, f64::MAX] {
            for &c in &[0.8, 0.85, 0.9, 0.95] {
                let f = stability_factor(alpha, c);
                assert!(f > 0.0 && f <= 1.0, "alpha = {}, c = {}, C = {}", alpha, c, f);
                assert_relative_eq!(f, 1.0, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_stability_factor_satisfies_quadratic() {
        let (alpha, c) = (1.7, 0.8);
        let f = stability_factor(alpha, c);
        let residual = c * f * f - (1.0 + alpha) * f + alpha;
        assert!(residual.abs() < 1e-12, "residual = {}", residual);
    }

    #[test]
    fn test_stability_factor_is_monotonic_in_alpha() {
        let mut previous = 0.0;
        for i in 1..200 {
            let f = stability_factor(i as f64 * 0.05, 0.8);
            assert!(f >= previous);
            previous = f;
        }
    }

    #[test]
    fn test_zero_slenderness_column_is_unity() {
        let check = column_stability("column yy", 0.0, 2.0, 1_000_000.0, 1000.0, 0.8).unwrap();
        assert_eq!(check.factor, 1.0);
        assert_eq!(check.slenderness, 0.0);
        assert!(check.critical_stress.is_none());
    }

    #[test]
    fn test_column_reference_point() {
        // DF-L No.2 4x4 style check in psi/in: le/d = 30, E'min = 580000, Fc* = 1350
        // F_cE = 0.822 × 580000 / 30² = 529.7 psi, C_P ≈ 0.35
        let d = 3.5;
        let le = 30.0 * d;
        let r = d / 12.0_f64.sqrt();
        let check = column_stability("column yy", le, r, 580_000.0, 1350.0, 0.8).unwrap();
        let f_ce = check.critical_stress.unwrap();
        assert_relative_eq!(f_ce, 0.8225 * 580_000.0 / 900.0, max_relative = 1e-3);
        assert!((check.factor - 0.35).abs() < 0.01, "C_P = {}", check.factor);
    }

    #[test]
    fn test_column_slenderness_ceiling() {
        let d = 2.0;
        let r = d / 12.0_f64.sqrt();
        // le/d = 51 > 50
        let err = column_stability("column zz", 51.0 * d, r, 1.0e6, 1000.0, 0.8).unwrap_err();
        assert_eq!(err.error_code(), "SLENDERNESS_EXCEEDED");
        // le/d = 50 exactly is allowed
        assert!(column_stability("column zz", 50.0 * d * 0.999_999, r, 1.0e6, 1000.0, 0.8).is_ok());
    }

    #[test]
    fn test_beam_stability_reference_point() {
        // 12' unbraced, 1.5" x 9.25": R_B = sqrt(144 × 9.25 / 1.5²) = 24.3
        let check = beam_stability("beam yy", 144.0, 9.25, 1.5, 580_000.0, 990.0).unwrap();
        assert!((check.slenderness - 24.3).abs() < 0.1);
        assert!(check.factor > 0.0 && check.factor < 1.0);
        let f_be = check.critical_stress.unwrap();
        assert_relative_eq!(f_be, 1.2 * 580_000.0 / (check.slenderness * check.slenderness));
    }

    #[test]
    fn test_beam_bending_about_weak_axis_is_unity() {
        let check = beam_stability("beam zz", 300.0, 1.5, 9.25, 580_000.0, 990.0).unwrap();
        assert_eq!(check.factor, 1.0);
        assert!(check.critical_stress.is_none());
    }

    #[test]
    fn test_beam_slenderness_ceiling() {
        // R_B = sqrt(2000 × 20 / 4) = 100 > 50
        let err = beam_stability("beam yy", 2000.0, 20.0, 2.0, 1.0e6, 1000.0).unwrap_err();
        assert!(err.is_design_failure());
    }
}
