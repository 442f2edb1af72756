//! # Batch Checking
//!
//! Runs the capacity and DCR checks over many (section, member, force)
//! combinations and collects one [`ResultRow`] per combination.
//!
//! Combinations are named by an explicit [`CombinationKey`]. The default
//! [`Selection::CrossProduct`] enumerates every key in the order
//! sections → members → forces; [`Selection::Explicit`] checks only the keys
//! the caller lists. A key that names an unknown item becomes a
//! `MissingInput` row instead of being skipped.
//!
//! Rows are evaluated in parallel with rayon. Row order always matches key
//! order, so identical inputs give identical tables.
//!
//! A failing combination never aborts the batch: its error is stored on the
//! row. Only problems shared by every row (invalid material, invalid factors,
//! duplicate names, invalid settings) fail the whole run.

use std::collections::HashMap;
use std::io;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calculations::capacity::{MemberDesign, SectionCapacities};
use crate::calculations::dcr::{evaluate, DcrMode, DcrResult, InteractionPolicy};
use crate::errors::{require_positive_dimension, CalcError, CalcResult};
use crate::forces::ForceDemand;
use crate::materials::MaterialProperties;
use crate::member::MemberDefinition;
use crate::nds_factors::DesignFactors;
use crate::section::RectangularSectionProperties;

/// Identifies one combination by the names of its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombinationKey {
    pub section: String,
    pub member: String,
    pub force: String,
}

impl CombinationKey {
    pub fn new(section: impl Into<String>, member: impl Into<String>, force: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            member: member.into(),
            force: force.into(),
        }
    }
}

impl std::fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.section, self.member, self.force)
    }
}

/// Which combinations a batch evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "keys")]
pub enum Selection {
    /// Every section × member × force
    #[default]
    CrossProduct,

    /// Only these combinations, in this order
    Explicit(Vec<CombinationKey>),
}

/// Options shared by every combination in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    pub interaction_policy: InteractionPolicy,

    /// A row passes when every ratio is ≤ this value
    pub dcr_limit: f64,

    /// Bearing contact area; the full section area when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_area: Option<f64>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            interaction_policy: InteractionPolicy::default(),
            dcr_limit: 1.0,
            contact_area: None,
        }
    }
}

impl CheckSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if !self.dcr_limit.is_finite() || self.dcr_limit <= 0.0 {
            return Err(CalcError::invalid_input(
                "dcr_limit",
                self.dcr_limit.to_string(),
                "DCR limit must be a finite value greater than zero",
            ));
        }
        if let Some(area) = self.contact_area {
            require_positive_dimension("contact_area", area)?;
        }
        Ok(())
    }
}

/// Capacities and ratios of one successful combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub capacities: SectionCapacities,
    pub dcr: DcrResult,
}

/// Check a single combination.
///
/// # Errors
/// Any error from the capacity calculator or the DCR evaluator, unchanged.
pub fn check_combination(
    material: &MaterialProperties,
    section: &RectangularSectionProperties,
    member: &MemberDefinition,
    force: &ForceDemand,
    factors: &DesignFactors,
    settings: &CheckSettings,
) -> CalcResult<CheckResult> {
    let mut design = MemberDesign::new(material, section, member, factors)?;
    if let Some(area) = settings.contact_area {
        design = design.with_contact_area(area)?;
    }
    let capacities = design.capacities()?;
    let dcr = evaluate(force, &capacities, settings.interaction_policy)?;
    Ok(CheckResult { capacities, dcr })
}

/// Outcome category of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowStatus {
    Pass,
    /// A ratio over the limit, or a design-failure error (slenderness, instability)
    Fail,
    /// Configuration or lookup error
    Error,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Pass => "PASS",
            RowStatus::Fail => "FAIL",
            RowStatus::Error => "ERROR",
        }
    }
}

/// One evaluated combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub key: CombinationKey,
    pub outcome: Result<CheckResult, CalcError>,
}

impl ResultRow {
    /// Largest ratio, when the check succeeded
    pub fn max_dcr(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|result| result.dcr.max_ratio())
    }

    /// Governing mode and ratio, when the check succeeded
    pub fn governing(&self) -> Option<(DcrMode, f64)> {
        self.outcome.as_ref().ok().map(|result| result.dcr.governing())
    }

    pub fn status(&self, limit: f64) -> RowStatus {
        match &self.outcome {
            Ok(result) if result.dcr.passes(limit) => RowStatus::Pass,
            Ok(_) => RowStatus::Fail,
            Err(err) if err.is_design_failure() => RowStatus::Fail,
            Err(_) => RowStatus::Error,
        }
    }
}

/// Borrowed inputs of a batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchInput<'a> {
    pub material: &'a MaterialProperties,
    pub sections: &'a [RectangularSectionProperties],
    pub members: &'a [MemberDefinition],
    pub forces: &'a [ForceDemand],
    pub factors: &'a DesignFactors,
    pub selection: &'a Selection,
    pub settings: &'a CheckSettings,
}

impl<'a> BatchInput<'a> {
    /// Number of rows the run will produce
    pub fn combination_count(&self) -> usize {
        match self.selection {
            Selection::CrossProduct => self.sections.len() * self.members.len() * self.forces.len(),
            Selection::Explicit(keys) => keys.len(),
        }
    }

    /// Keys in evaluation order
    pub fn keys(&self) -> Vec<CombinationKey> {
        match self.selection {
            Selection::CrossProduct => {
                let mut keys = Vec::with_capacity(self.combination_count());
                for section in self.sections {
                    for member in self.members {
                        for force in self.forces {
                            keys.push(CombinationKey::new(section.name(), &member.name, &force.name));
                        }
                    }
                }
                keys
            }
            Selection::Explicit(keys) => keys.clone(),
        }
    }
}

fn index_by_name<'a, T, F>(items: &'a [T], kind: &str, name_of: F) -> CalcResult<HashMap<&'a str, &'a T>>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        let name = name_of(item);
        if index.insert(name, item).is_some() {
            return Err(CalcError::invalid_input(
                format!("{} name", kind),
                name,
                "Names must be unique within a collection",
            ));
        }
    }
    Ok(index)
}

fn lookup<'a, T>(index: &HashMap<&str, &'a T>, kind: &str, name: &str) -> CalcResult<&'a T> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| CalcError::missing_input(kind, name))
}

/// Evaluate every selected combination.
///
/// # Errors
/// Only for problems shared by every row: invalid material, factors or
/// settings, and duplicate names. Per-combination errors land on their row.
pub fn run_batch(input: &BatchInput<'_>) -> CalcResult<ResultTable> {
    input.material.validate()?;
    input.factors.validate()?;
    input.settings.validate()?;

    let sections = index_by_name(input.sections, "section", |s| s.name())?;
    let members = index_by_name(input.members, "member", |m| m.name.as_str())?;
    let forces = index_by_name(input.forces, "force", |f| f.name.as_str())?;

    let keys = input.keys();
    let rows: Vec<ResultRow> = keys
        .into_par_iter()
        .map(|key| {
            let outcome = lookup(&sections, "section", &key.section).and_then(|section| {
                let member = lookup(&members, "member", &key.member)?;
                let force = lookup(&forces, "force", &key.force)?;
                check_combination(input.material, section, member, force, input.factors, input.settings)
            });
            ResultRow { key, outcome }
        })
        .collect();

    Ok(ResultTable {
        rows,
        dcr_limit: input.settings.dcr_limit,
    })
}

/// Governing row of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoverningRow {
    pub key: CombinationKey,
    pub mode: DcrMode,
    pub ratio: f64,
}

/// Pass/fail counts of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub passing: usize,
    pub failing: usize,
    pub errored: usize,
    /// Successful row with the largest ratio
    pub governing: Option<GoverningRow>,
}

/// Ordered rows of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
    pub dcr_limit: f64,
}

/// Column headers of the delimited export
pub const CSV_HEADER: [&str; 21] = [
    "section",
    "member",
    "force",
    "status",
    "governing_mode",
    "max_dcr",
    "tension_capacity",
    "compression_capacity_yy",
    "compression_capacity_zz",
    "bending_capacity_yy",
    "bending_capacity_zz",
    "shear_capacity",
    "perpendicular_capacity",
    "dcr_axial",
    "dcr_shear_y",
    "dcr_shear_z",
    "dcr_bending_yy",
    "dcr_bending_zz",
    "dcr_biaxial_bending",
    "dcr_combined",
    "error",
];

fn csv_error(err: impl std::fmt::Display) -> CalcError {
    CalcError::SerializationError {
        reason: format!("CSV export failed: {}", err),
    }
}

/// Cells of one exported row, in [`CSV_HEADER`] order
fn csv_record(row: &ResultRow, dcr_limit: f64) -> Vec<String> {
    let mut cells = vec![
        row.key.section.clone(),
        row.key.member.clone(),
        row.key.force.clone(),
        row.status(dcr_limit).as_str().to_string(),
    ];

    match &row.outcome {
        Ok(result) => {
            let (mode, ratio) = result.dcr.governing();
            let caps = &result.capacities;
            cells.push(mode.as_str().to_string());
            for value in [
                ratio,
                caps.tension,
                caps.yy.compression,
                caps.zz.compression,
                caps.yy.bending,
                caps.zz.bending,
                caps.shear,
                caps.perpendicular,
            ] {
                cells.push(value.to_string());
            }
            for (_, ratio) in result.dcr.ratios() {
                cells.push(ratio.to_string());
            }
            cells.push(String::new());
        }
        Err(err) => {
            cells.extend(std::iter::repeat(String::new()).take(CSV_HEADER.len() - 5));
            cells.push(err.to_string());
        }
    }

    cells
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }

    /// Row for one combination
    pub fn get(&self, section: &str, member: &str, force: &str) -> Option<&ResultRow> {
        self.rows
            .iter()
            .find(|row| row.key.section == section && row.key.member == member && row.key.force == force)
    }

    /// Rows that satisfy `keep`, order preserved
    pub fn filter<F>(&self, keep: F) -> ResultTable
    where
        F: Fn(&ResultRow) -> bool,
    {
        ResultTable {
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
            dcr_limit: self.dcr_limit,
        }
    }

    /// Successful rows whose largest ratio is ≤ `max`
    pub fn with_max_dcr_at_most(&self, max: f64) -> ResultTable {
        self.filter(|row| row.max_dcr().is_some_and(|dcr| dcr <= max))
    }

    /// Successful rows whose largest ratio is > `min`
    pub fn with_max_dcr_above(&self, min: f64) -> ResultTable {
        self.filter(|row| row.max_dcr().is_some_and(|dcr| dcr > min))
    }

    pub fn for_member(&self, member: &str) -> ResultTable {
        self.filter(|row| row.key.member == member)
    }

    pub fn for_section(&self, section: &str) -> ResultTable {
        self.filter(|row| row.key.section == section)
    }

    pub fn for_force(&self, force: &str) -> ResultTable {
        self.filter(|row| row.key.force == force)
    }

    /// Rows with status `Fail`
    pub fn failing(&self) -> ResultTable {
        let limit = self.dcr_limit;
        self.filter(|row| row.status(limit) == RowStatus::Fail)
    }

    /// Rows whose check returned an error of any kind
    pub fn errors(&self) -> ResultTable {
        self.filter(|row| row.outcome.is_err())
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.rows.len(),
            passing: 0,
            failing: 0,
            errored: 0,
            governing: None,
        };

        for row in &self.rows {
            match row.status(self.dcr_limit) {
                RowStatus::Pass => summary.passing += 1,
                RowStatus::Fail => summary.failing += 1,
                RowStatus::Error => summary.errored += 1,
            }
            if let Some((mode, ratio)) = row.governing() {
                let is_larger = summary.governing.as_ref().map_or(true, |g| ratio > g.ratio);
                if is_larger {
                    summary.governing = Some(GoverningRow {
                        key: row.key.clone(),
                        mode,
                        ratio,
                    });
                }
            }
        }

        summary
    }

    /// Write the table as comma-delimited text, header first. Numbers use
    /// shortest round-trip formatting, so they parse back to the identical
    /// `f64`. Fields are quoted where needed.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> CalcResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER).map_err(csv_error)?;
        for row in &self.rows {
            csv_writer
                .write_record(csv_record(row, self.dcr_limit))
                .map_err(csv_error)?;
        }
        csv_writer.flush().map_err(csv_error)?;
        Ok(())
    }

    /// [`ResultTable::write_csv`] into a string
    pub fn to_csv(&self) -> CalcResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(csv_error)
    }
}
