//! # File I/O Module
//!
//! Handles job and result files with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## File Formats
//!
//! - Jobs are JSON ([`DesignJob`]).
//! - Results are comma-delimited text ([`ResultTable::write_csv`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use timber_core::file_io::{load_job, save_job, write_results_csv};
//! use std::path::Path;
//!
//! let job = load_job(Path::new("frame.json"))?;
//! let table = job.run()?;
//! write_results_csv(&table, Path::new("frame_results.csv"))?;
//! save_job(&job, Path::new("frame.json"))?;
//! # Ok::<(), timber_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::calculations::batch::ResultTable;
use crate::errors::{CalcError, CalcResult};
use crate::forces::{read_force_table, ForceColumns, ForceDemand};
use crate::job::{DesignJob, SCHEMA_VERSION};

/// Temp file next to `path`: `name.ext` becomes `name.ext.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path` with atomic write semantics.
///
/// The write process:
/// 1. Write to a temporary file (.tmp)
/// 2. Sync to disk (fsync)
/// 3. Rename .tmp to the final name (atomic on most filesystems)
fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn read_to_string(path: &Path) -> CalcResult<String> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    Ok(contents)
}

/// Save a job to a file with atomic write semantics.
///
/// # Example
///
/// ```rust,no_run
/// use timber_core::file_io::save_job;
/// use timber_core::job::DesignJob;
/// use timber_core::materials::MaterialProperties;
/// use std::path::Path;
///
/// let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
/// let job = DesignJob::new("Engineer", "25-001", "Client", material);
/// save_job(&job, Path::new("job.json"))?;
/// # Ok::<(), timber_core::errors::CalcError>(())
/// ```
pub fn save_job(job: &DesignJob, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(job).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, json.as_bytes())
}

/// Load a job from a file.
///
/// # Returns
///
/// * `Ok(DesignJob)` - Successfully loaded job
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON, or a field that
///   fails validation (e.g. a non-positive section dimension)
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_job(path: &Path) -> CalcResult<DesignJob> {
    let contents = read_to_string(path)?;

    let job: DesignJob = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&job.meta.version)?;

    Ok(job)
}

/// Read an analysis export into force demands.
pub fn load_force_table(path: &Path, columns: &ForceColumns) -> CalcResult<Vec<ForceDemand>> {
    let contents = read_to_string(path)?;
    read_force_table(&contents, columns)
}

/// Export a result table as delimited text with atomic write semantics.
pub fn write_results_csv(table: &ResultTable, path: &Path) -> CalcResult<()> {
    let mut buffer = Vec::new();
    table.write_csv(&mut buffer)?;
    write_atomic(path, &buffer)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    // Parse semver-style versions
    let file_parts: Vec<u32> = file_version
        .split('.')
        .map(|p| p.parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|_| mismatch())?;
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version may contain breaking changes
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::batch::CSV_HEADER;
    use crate::materials::MaterialProperties;
    use crate::member::MemberDefinition;
    use crate::section::RectangularSectionProperties;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("timbercheck_test_{}_{}", std::process::id(), name))
    }

    fn sample_job() -> DesignJob {
        let material = MaterialProperties::new("Wood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
        let mut job = DesignJob::new("Test Engineer", "TEST-001", "Test Client", material);
        job.add_section(RectangularSectionProperties::new("S-1", 6.4, 6.4).unwrap());
        job.add_member(MemberDefinition::new("M-1", 300.0));
        job.add_force(ForceDemand::zero("F-1").with_axial(-250.0));
        job
    }

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(
            tmp_path_for(Path::new("/path/to/job.json")),
            Path::new("/path/to/job.json.tmp")
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip.json");

        let job = sample_job();
        save_job(&job, &path).unwrap();

        let loaded = load_job(&path).unwrap();
        assert_eq!(loaded, job);
        assert_eq!(loaded.meta.engineer, "Test Engineer");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic.json");
        save_job(&sample_job(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_path("future.json");
        let mut job = sample_job();
        job.meta.version = "0.9.0".to_string();
        save_job(&job, &path).unwrap();

        let err = load_job(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_job(&temp_path("does_not_exist.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.0.3").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("abc").is_err());
    }

    #[test]
    fn test_write_results_csv() {
        let path = temp_path("results.csv");
        let table = sample_job().run().unwrap();
        write_results_csv(&table, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(&CSV_HEADER.join(",")));
        assert_eq!(written.lines().count(), 2);
        assert!(!tmp_path_for(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_force_table() {
        let path = temp_path("forces.csv");
        fs::write(&path, "name,axial,shear_y,shear_z,moment_xx,moment_yy,moment_zz\nF1,-5,0,0,0,1,0\n").unwrap();
        let forces = load_force_table(&path, &ForceColumns::default()).unwrap();
        assert_eq!(forces.len(), 1);
        assert_eq!(forces[0].axial, -5.0);
        let _ = fs::remove_file(&path);
    }
}
