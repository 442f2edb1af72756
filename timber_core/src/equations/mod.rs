//! # Design Equations
//!
//! Closed-form formulas used by the design checks, kept apart from the data
//! types so each one can be verified directly against its code reference.
//!
//! ## Modules
//!
//! - [`section`] - Rectangular cross-section properties (A, I, S, r)
//! - [`stability`] - Column (C_P) and beam (C_L) stability factors
//!
//! ## Axis Convention
//!
//! - **y-y**: the axis about which the section depth resists bending
//! - **z-z**: the axis about which the section width resists bending
//! - **x-x**: the member's longitudinal axis (axial force, torsion)
//!
//! ## References
//!
//! - NDS 2018: National Design Specification for Wood Construction
//! - Roark's Formulas for Stress and Strain, 8th Edition

pub mod section;
pub mod stability;

pub use section::{
    rectangular_area,
    rectangular_moment_of_inertia,
    rectangular_radius_of_gyration,
    rectangular_section_modulus,
    rectangular_shear_area,
};

pub use stability::{
    beam_critical_stress,
    beam_slenderness,
    beam_stability,
    column_critical_stress,
    column_stability,
    stability_factor,
    StabilityCheck,
    BEAM_SLENDERNESS_LIMIT,
    BEAM_STABILITY_CONSTANT,
    COLUMN_SLENDERNESS_LIMIT,
};
