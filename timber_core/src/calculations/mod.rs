//! # Design Checks
//!
//! The check pipeline, leaf first:
//!
//! - [`capacity`] - Adjusted design values, stability factors and capacities
//! - [`dcr`] - Demand-to-capacity ratios and combined-stress interaction
//! - [`batch`] - Many combinations at once, with filtering and export
//!
//! Every function here is pure: inputs are borrowed, never mutated, and the
//! same inputs always give the same result.

pub mod batch;
pub mod capacity;
pub mod dcr;

// Re-export commonly used types
pub use batch::{
    check_combination, run_batch, BatchInput, BatchSummary, CheckResult, CheckSettings,
    CombinationKey, ResultRow, ResultTable, RowStatus, Selection,
};
pub use capacity::{AxisCapacity, MemberDesign, SectionCapacities};
pub use dcr::{evaluate, AxialMode, DcrMode, DcrResult, InteractionPolicy};
