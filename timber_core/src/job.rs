//! # Design Jobs
//!
//! A `DesignJob` is the root container for one batch of design checks.
//! Jobs serialize to human-readable JSON files.
//!
//! ## Structure
//!
//! ```text
//! DesignJob
//! ├── meta: JobMetadata (schema version, engineer, job info, timestamps)
//! ├── settings: CheckSettings (interaction policy, DCR limit, contact area)
//! ├── material: MaterialProperties
//! ├── sections: Vec<RectangularSectionProperties>
//! ├── members: Vec<MemberDefinition>
//! ├── forces: Vec<ForceDemand>
//! ├── force_columns: ForceColumns (header names of analysis exports)
//! ├── factors: DesignFactors (eight per-mode factor records)
//! └── selection: Selection (cross product or explicit keys)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use timber_core::job::DesignJob;
//! use timber_core::materials::MaterialProperties;
//! use timber_core::member::MemberDefinition;
//! use timber_core::forces::ForceDemand;
//! use timber_core::section::RectangularSectionProperties;
//!
//! let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
//! let mut job = DesignJob::new("Jane Engineer", "25-042", "ACME Corp", material);
//! job.add_section(RectangularSectionProperties::new("S-1", 6.4, 6.4).unwrap());
//! job.add_member(MemberDefinition::new("M-1", 300.0));
//! job.add_force(ForceDemand::zero("F-1"));
//!
//! let table = job.run().unwrap();
//! assert_eq!(table.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::batch::{run_batch, BatchInput, CheckSettings, ResultTable, Selection};
use crate::errors::CalcResult;
use crate::forces::{read_force_table, ForceColumns, ForceDemand};
use crate::materials::MaterialProperties;
use crate::member::MemberDefinition;
use crate::nds_factors::DesignFactors;
use crate::section::RectangularSectionProperties;

/// Current schema version for job files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root job container, serialized to job files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignJob {
    /// Job metadata (version, engineer, job info)
    pub meta: JobMetadata,

    /// Options shared by every check
    #[serde(default)]
    pub settings: CheckSettings,

    pub material: MaterialProperties,

    #[serde(default)]
    pub sections: Vec<RectangularSectionProperties>,

    #[serde(default)]
    pub members: Vec<MemberDefinition>,

    #[serde(default)]
    pub forces: Vec<ForceDemand>,

    /// How to read this job's analysis exports
    #[serde(default)]
    pub force_columns: ForceColumns,

    /// Adjustment factors; every omitted factor is 1.0
    #[serde(default)]
    pub factors: DesignFactors,

    #[serde(default)]
    pub selection: Selection,
}

impl DesignJob {
    /// Create a new empty job for one material.
    ///
    /// # Example
    ///
    /// ```rust
    /// use timber_core::job::DesignJob;
    /// use timber_core::materials::MaterialProperties;
    ///
    /// let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
    /// let job = DesignJob::new("John Doe", "25-001", "Client Corp", material);
    /// assert_eq!(job.meta.engineer, "John Doe");
    /// assert_eq!(job.combination_count(), 0);
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
        material: MaterialProperties,
    ) -> Self {
        let now = Utc::now();
        DesignJob {
            meta: JobMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                description: String::new(),
                created: now,
                modified: now,
            },
            settings: CheckSettings::default(),
            material,
            sections: Vec::new(),
            members: Vec::new(),
            forces: Vec::new(),
            force_columns: ForceColumns::default(),
            factors: DesignFactors::default(),
            selection: Selection::default(),
        }
    }

    pub fn add_section(&mut self, section: RectangularSectionProperties) {
        self.sections.push(section);
        self.touch();
    }

    pub fn add_member(&mut self, member: MemberDefinition) {
        self.members.push(member);
        self.touch();
    }

    pub fn add_force(&mut self, force: ForceDemand) {
        self.forces.push(force);
        self.touch();
    }

    /// Replace the force list (e.g. after reading an analysis export)
    pub fn set_forces(&mut self, forces: Vec<ForceDemand>) {
        self.forces = forces;
        self.touch();
    }

    /// Replace the forces with an analysis export read through
    /// `force_columns`. Returns the number of forces read.
    pub fn import_forces(&mut self, text: &str) -> CalcResult<usize> {
        let forces = read_force_table(text, &self.force_columns)?;
        let count = forces.len();
        self.set_forces(forces);
        Ok(count)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Borrow the job as batch input
    pub fn batch_input(&self) -> BatchInput<'_> {
        BatchInput {
            material: &self.material,
            sections: &self.sections,
            members: &self.members,
            forces: &self.forces,
            factors: &self.factors,
            selection: &self.selection,
            settings: &self.settings,
        }
    }

    /// Number of rows a run will produce
    pub fn combination_count(&self) -> usize {
        self.batch_input().combination_count()
    }

    /// Check every selected combination.
    pub fn run(&self) -> CalcResult<ResultTable> {
        run_batch(&self.batch_input())
    }
}

/// Job metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    #[serde(default)]
    pub description: String,

    /// When the job was created
    pub created: DateTime<Utc>,

    /// When the job was last modified
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::batch::CombinationKey;

    fn job() -> DesignJob {
        let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
        DesignJob::new("Engineer", "25-001", "Client", material)
    }

    #[test]
    fn test_new_job() {
        let job = job();
        assert_eq!(job.meta.version, SCHEMA_VERSION);
        assert_eq!(job.meta.created, job.meta.modified);
        assert_eq!(job.settings.dcr_limit, 1.0);
        assert!(job.sections.is_empty());
    }

    #[test]
    fn test_add_items_and_count() {
        let mut job = job();
        job.add_section(RectangularSectionProperties::new("S-1", 6.4, 6.4).unwrap());
        job.add_section(RectangularSectionProperties::new("S-2", 8.0, 8.0).unwrap());
        job.add_member(MemberDefinition::new("M-1", 300.0));
        job.add_force(ForceDemand::zero("F-1"));
        job.add_force(ForceDemand::zero("F-2").with_axial(-100.0));
        assert_eq!(job.combination_count(), 4);
        assert!(job.meta.modified >= job.meta.created);

        job.selection = Selection::Explicit(vec![CombinationKey::new("S-1", "M-1", "F-2")]);
        assert_eq!(job.combination_count(), 1);
        let table = job.run().unwrap();
        assert_eq!(table.rows[0].key.force, "F-2");
    }

    #[test]
    fn test_import_forces_uses_job_columns() {
        let mut design = job();
        design.force_columns = ForceColumns {
            name: "Frame".to_string(),
            axial: "P".to_string(),
            shear_y: "V2".to_string(),
            shear_z: "V3".to_string(),
            moment_xx: "T".to_string(),
            moment_yy: "M2".to_string(),
            moment_zz: "M3".to_string(),
            delimiter: '\t',
        };
        let text = "Frame\tP\tV2\tV3\tT\tM2\tM3\nB-1\t-120\t4\t0\t0\t350\t0\nB-2\t80\t0\t0\t0\t0\t0\n";

        assert_eq!(design.import_forces(text).unwrap(), 2);
        assert_eq!(design.forces[0].name, "B-1");
        assert_eq!(design.forces[0].axial, -120.0);
        assert_eq!(design.forces[0].moment_yy, 350.0);

        // the default mapping cannot read these headers
        let mut plain = job();
        assert!(plain.import_forces(text).is_err());
        assert!(plain.forces.is_empty());
    }

    #[test]
    fn test_force_columns_default_when_absent() {
        let mut value = serde_json::to_value(job()).unwrap();
        value.as_object_mut().unwrap().remove("force_columns");
        let parsed: DesignJob = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.force_columns, ForceColumns::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut job = job();
        job.add_section(RectangularSectionProperties::new("S-1", 6.4, 6.4).unwrap());
        job.factors = DesignFactors::lrfd();
        let json = serde_json::to_string_pretty(&job).unwrap();
        let parsed: DesignJob = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, job);
    }
}
