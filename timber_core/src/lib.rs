//! # timber_core - Timber Member Design-Check Engine
//!
//! `timber_core` checks rectangular timber members against an NDS-style wood
//! design code. Given a material, cross-sections, member geometry, force
//! demands and adjustment factors, it computes adjusted design values,
//! stability factors and capacities, then reports demand-to-capacity ratios
//! (DCR) per failure mode, including combined-stress interaction.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Unit-Agnostic**: Any consistent unit system; nothing is converted
//!
//! ## Quick Start
//!
//! ```rust
//! use timber_core::prelude::*;
//!
//! let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
//! let section = RectangularSectionProperties::new("6.4x6.4", 6.4, 6.4).unwrap();
//! let member = MemberDefinition::new("M-1", 300.0);
//! let force = ForceDemand::zero("F-1").with_axial(-500.0).with_moments(0.0, 1200.0, 0.0);
//! let factors = DesignFactors::lrfd();
//!
//! let result = check_combination(&material, &section, &member, &force, &factors, &CheckSettings::default())
//!     .unwrap();
//! println!("governing: {:?}", result.dcr.governing());
//! assert!(result.dcr.combined > result.dcr.axial);
//! ```
//!
//! ## Modules
//!
//! - [`section`] - Rectangular sections and their properties
//! - [`materials`] - Reference design values and material class
//! - [`member`] - Member length and effective-length factors
//! - [`forces`] - Force demands and the analysis-export reader
//! - [`nds_factors`] - Per-mode adjustment factor records
//! - [`equations`] - Section and stability formulas
//! - [`calculations`] - Capacities, DCR evaluation and batch checking
//! - [`job`] - Job container (configuration file)
//! - [`file_io`] - Atomic saves, job loading, CSV export
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod forces;
pub mod job;
pub mod materials;
pub mod member;
pub mod nds_factors;
pub mod section;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_job, save_job, write_results_csv};
pub use job::{DesignJob, JobMetadata};

/// Everything needed to run checks from code.
pub mod prelude {
    pub use crate::calculations::{
        check_combination, evaluate, run_batch, BatchInput, CheckResult, CheckSettings,
        CombinationKey, DcrMode, InteractionPolicy, MemberDesign, ResultTable, Selection,
    };
    pub use crate::errors::{CalcError, CalcResult};
    pub use crate::forces::ForceDemand;
    pub use crate::job::DesignJob;
    pub use crate::materials::{MaterialClass, MaterialProperties};
    pub use crate::member::MemberDefinition;
    pub use crate::nds_factors::{DesignFactors, ServiceConditions, StabilityFactor};
    pub use crate::section::{Axis, RectangularSectionProperties};
}
