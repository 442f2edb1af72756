//! # Force Demands
//!
//! Member end forces from an external analysis, one named record per bar or
//! load case. Units are consumed as given and never converted.
//!
//! ## Sign Convention
//!
//! - **axial**: positive = tension, negative = compression
//! - **shear_y / shear_z**: transverse shears; only magnitude is checked
//! - **moment_xx**: torsion about the member axis
//! - **moment_yy / moment_zz**: bending about the section axes
//!
//! ## Reading an analysis export
//!
//! ```rust
//! use timber_core::forces::{read_force_table, ForceColumns};
//!
//! let text = "name,axial,shear_y,shear_z,moment_xx,moment_yy,moment_zz\n\
//!             B1-D,-1200,35,0,0,410.5,0\n";
//! let forces = read_force_table(text, &ForceColumns::default()).unwrap();
//! assert_eq!(forces[0].name, "B1-D");
//! assert_eq!(forces[0].axial, -1200.0);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Force demand on one member for one load case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceDemand {
    pub name: String,
    #[serde(default)]
    pub axial: f64,
    #[serde(default)]
    pub shear_y: f64,
    #[serde(default)]
    pub shear_z: f64,
    #[serde(default)]
    pub moment_xx: f64,
    #[serde(default)]
    pub moment_yy: f64,
    #[serde(default)]
    pub moment_zz: f64,
}

impl ForceDemand {
    /// A demand with every component zero
    pub fn zero(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axial: 0.0,
            shear_y: 0.0,
            shear_z: 0.0,
            moment_xx: 0.0,
            moment_yy: 0.0,
            moment_zz: 0.0,
        }
    }

    pub fn with_axial(mut self, axial: f64) -> Self {
        self.axial = axial;
        self
    }

    pub fn with_shears(mut self, shear_y: f64, shear_z: f64) -> Self {
        self.shear_y = shear_y;
        self.shear_z = shear_z;
        self
    }

    pub fn with_moments(mut self, moment_xx: f64, moment_yy: f64, moment_zz: f64) -> Self {
        self.moment_xx = moment_xx;
        self.moment_yy = moment_yy;
        self.moment_zz = moment_zz;
        self
    }

    pub fn is_tension(&self) -> bool {
        self.axial > 0.0
    }

    pub fn is_compression(&self) -> bool {
        self.axial < 0.0
    }

    /// All six components must be finite.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in self.components() {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", self.name, field),
                    value.to_string(),
                    "Force components must be finite",
                ));
            }
        }
        Ok(())
    }

    fn components(&self) -> [(&'static str, f64); 6] {
        [
            ("axial", self.axial),
            ("shear_y", self.shear_y),
            ("shear_z", self.shear_z),
            ("moment_xx", self.moment_xx),
            ("moment_yy", self.moment_yy),
            ("moment_zz", self.moment_zz),
        ]
    }
}

/// Header names that map an export's columns onto [`ForceDemand`] fields.
///
/// Header matching ignores case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceColumns {
    pub name: String,
    pub axial: String,
    pub shear_y: String,
    pub shear_z: String,
    pub moment_xx: String,
    pub moment_yy: String,
    pub moment_zz: String,
    pub delimiter: char,
}

impl Default for ForceColumns {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            axial: "axial".to_string(),
            shear_y: "shear_y".to_string(),
            shear_z: "shear_z".to_string(),
            moment_xx: "moment_xx".to_string(),
            moment_yy: "moment_yy".to_string(),
            moment_zz: "moment_zz".to_string(),
            delimiter: ',',
        }
    }
}

impl ForceColumns {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn delimiter_byte(delimiter: char) -> CalcResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CalcError::invalid_input(
            "delimiter",
            delimiter.to_string(),
            "Delimiter must be a single ASCII character",
        ))
    }
}

fn cell_at<'a>(record: &'a csv::StringRecord, row: u64, column: &str, idx: usize) -> CalcResult<&'a str> {
    record.get(idx).ok_or_else(|| {
        CalcError::invalid_input(
            format!("row {} column '{}'", row, column),
            "",
            "Row has fewer cells than the header",
        )
    })
}

/// Parse delimited text (header row first) into force demands.
///
/// Fields may be quoted, so names can contain the delimiter. Cells are
/// trimmed and blank lines are skipped. Row numbers in errors are 1-based
/// line numbers of the input, so the header is row 1.
///
/// # Errors
/// `InvalidInput` for a missing header, a duplicate header name, a column
/// named in `columns` that the header lacks, a short or malformed row, or a
/// cell that is not a finite number.
pub fn read_force_table(text: &str, columns: &ForceColumns) -> CalcResult<Vec<ForceDemand>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(columns.delimiter)?)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header_record = reader
        .headers()
        .map_err(|e| CalcError::invalid_input("header", "", e.to_string()))?
        .clone();
    if header_record.is_empty() {
        return Err(CalcError::invalid_input("header", "", "Force table is empty"));
    }

    let mut header: HashMap<String, usize> = HashMap::with_capacity(header_record.len());
    for (i, cell) in header_record.iter().enumerate() {
        if header.insert(cell.to_lowercase(), i).is_some() {
            return Err(CalcError::invalid_input(
                "header",
                cell,
                "Duplicate column name (names are matched ignoring case)",
            ));
        }
    }

    let locate = |column: &str| -> CalcResult<usize> {
        header
            .get(&column.trim().to_lowercase())
            .copied()
            .ok_or_else(|| CalcError::invalid_input(column, "", "Column not found in header row"))
    };

    let name_idx = locate(&columns.name)?;
    let numeric = [
        (columns.axial.as_str(), locate(&columns.axial)?),
        (columns.shear_y.as_str(), locate(&columns.shear_y)?),
        (columns.shear_z.as_str(), locate(&columns.shear_z)?),
        (columns.moment_xx.as_str(), locate(&columns.moment_xx)?),
        (columns.moment_yy.as_str(), locate(&columns.moment_yy)?),
        (columns.moment_zz.as_str(), locate(&columns.moment_zz)?),
    ];

    let mut forces = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            let row = e.position().map_or(0, |p| p.line());
            CalcError::invalid_input(format!("row {}", row), "", e.to_string())
        })?;
        let row = record.position().map_or(0, |p| p.line());

        let name = cell_at(&record, row, &columns.name, name_idx)?.to_string();
        let mut values = [0.0; 6];
        for (slot, (column, idx)) in values.iter_mut().zip(numeric.iter()) {
            let raw = cell_at(&record, row, column, *idx)?;
            *slot = match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    return Err(CalcError::invalid_input(
                        format!("row {} column '{}'", row, column),
                        raw,
                        "Not a finite number",
                    ))
                }
            };
        }

        let [axial, shear_y, shear_z, moment_xx, moment_yy, moment_zz] = values;
        forces.push(ForceDemand {
            name,
            axial,
            shear_y,
            shear_z,
            moment_xx,
            moment_yy,
            moment_zz,
        });
    }

    Ok(forces)
}
