//! # Cross-Section Property Formulas
//!
//! Formulas for geometric properties of solid rectangular cross-sections.
//! Inputs may be in any consistent length unit; outputs carry the matching
//! power of that unit.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Moment of inertia (second moment of area)
//! - `S` = Section modulus (I/c, where c = distance to extreme fiber)
//! - `r` = Radius of gyration (√(I/A))
//! - `b` = Dimension parallel to the bending axis
//! - `h` = Dimension perpendicular to the bending axis
//!
//! ## References
//!
//! - NDS 2018 Section 3.3: Bending Members - Section Properties
//! - Roark's Formulas for Stress and Strain, 8th Edition, Chapter 3

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Calculate cross-sectional area for rectangular section
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │         │
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// A = b × h
///
/// # Example
/// ```rust
/// use timber_core::equations::section::rectangular_area;
///
/// let area = rectangular_area(10.0, 20.0);
/// assert_eq!(area, 200.0);
/// ```
#[inline]
pub fn rectangular_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Moment of inertia of a rectangle about the centroidal axis parallel to `b`.
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │ ════════│ ← axis at h/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = b·h³/12
///
/// Swap the arguments for the other principal axis: I = h·b³/12.
///
/// # Example
/// ```rust
/// use timber_core::equations::section::rectangular_moment_of_inertia;
///
/// // 10 x 20 section, strong axis
/// let i = rectangular_moment_of_inertia(10.0, 20.0);
/// assert!((i - 6666.667).abs() < 0.001);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, h: f64) -> f64 {
    b * h.powi(3) / 12.0
}

/// Section modulus of a rectangle about the axis parallel to `b`.
///
/// # Formula
/// S = I/c = (b·h³/12) / (h/2) = b·h²/6
///
/// Rectangles are symmetric, so S_top = S_bottom.
///
/// # Example
/// ```rust
/// use timber_core::equations::section::rectangular_section_modulus;
///
/// let s = rectangular_section_modulus(10.0, 20.0);
/// assert!((s - 666.667).abs() < 0.001);
/// ```
#[inline]
pub fn rectangular_section_modulus(b: f64, h: f64) -> f64 {
    b * h.powi(2) / 6.0
}

/// Radius of gyration of a rectangle for the axis that `h` spans across.
///
/// # Formula
/// r = √(I/A) = √(h²/12) = h/√12 ≈ 0.289h
///
/// # Example
/// ```rust
/// use timber_core::equations::section::rectangular_radius_of_gyration;
///
/// let r = rectangular_radius_of_gyration(20.0);
/// assert!((r - 5.7735).abs() < 0.0001);
/// ```
///
/// # Reference
/// - NDS 2018 Section 3.7.1: Column Stability Factor
#[inline]
pub fn rectangular_radius_of_gyration(h: f64) -> f64 {
    h / (12.0_f64).sqrt()
}

/// Effective shear area for a rectangular section.
///
/// Maximum shear stress at the neutral axis is 1.5× the average,
/// τ_max = 1.5·V/A = V/A_shear, therefore A_shear = 2A/3.
///
/// # Reference
/// - NDS 2018 Section 3.4.2: f_v = 3V/(2bd)
#[inline]
pub fn rectangular_shear_area(b: f64, h: f64) -> f64 {
    2.0 * b * h / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON || (a - b).abs() / b.abs().max(1.0) < 1e-12
    }

    #[test]
    fn test_rectangular_area() {
        assert!(approx_eq(rectangular_area(10.0, 20.0), 200.0));
    }

    #[test]
    fn test_section_modulus_matches_i_over_c() {
        for &(b, h) in &[(10.0, 20.0), (6.4, 6.4), (1.5, 9.25), (3.5, 11.25)] {
            let i = rectangular_moment_of_inertia(b, h);
            let s = rectangular_section_modulus(b, h);
            assert!(approx_eq(s, i / (h / 2.0)), "S = {}, I/(h/2) = {}", s, i / (h / 2.0));
        }
    }

    #[test]
    fn test_radius_of_gyration_matches_sqrt_i_over_a() {
        for &(b, h) in &[(10.0, 20.0), (20.0, 10.0), (6.4, 6.4)] {
            let i = rectangular_moment_of_inertia(b, h);
            let a = rectangular_area(b, h);
            let r = rectangular_radius_of_gyration(h);
            assert!(approx_eq(r, (i / a).sqrt()), "r = {} (expected {})", r, (i / a).sqrt());
        }
    }

    #[test]
    fn test_rectangular_shear_area() {
        let a_shear = rectangular_shear_area(1.5, 9.25);
        assert!(approx_eq(a_shear, 9.25), "A_shear = {} (expected 9.25)", a_shear);
    }
}
