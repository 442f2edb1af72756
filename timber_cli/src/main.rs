//! # Timbercheck CLI
//!
//! Runs batch design checks from job files and prints or exports the
//! result table.
//!
//! ```text
//! timbercheck check frame.json --csv frame_results.csv
//! timbercheck check frame.json --forces analysis.csv --max-dcr 0.9
//! timbercheck check frame.json --forces etabs.txt --columns etabs_columns.json
//! timbercheck template new_job.json
//! timbercheck demo
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use timber_core::calculations::{ResultTable, RowStatus};
use timber_core::file_io::{load_force_table, load_job, save_job, write_results_csv};
use timber_core::forces::ForceColumns;
use timber_core::nds_factors::{DesignFormat, LoadDuration, ServiceConditions};
use timber_core::prelude::*;

#[derive(Parser)]
#[command(name = "timbercheck")]
#[command(about = "Batch design checks for rectangular timber members", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every combination in a job file
    Check {
        /// Job file (JSON)
        job: PathBuf,
        /// Replace the job's forces with an analysis export (delimited text)
        #[arg(long)]
        forces: Option<PathBuf>,
        /// Column mapping for the forces file (JSON); defaults to the job's `force_columns`
        #[arg(long, requires = "forces")]
        columns: Option<PathBuf>,
        /// Delimiter of the forces file, overriding the column mapping
        #[arg(long, requires = "forces")]
        delimiter: Option<char>,
        /// Write the full result table to this file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Only show rows whose largest ratio is at most this value
        #[arg(long)]
        max_dcr: Option<f64>,
        /// Only show rows for this member
        #[arg(long)]
        member: Option<String>,
        /// Print the result table as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a starter job file
    Template {
        /// Output job file
        output: PathBuf,
    },
    /// Run the built-in example job
    Demo,
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Check {
            job,
            forces,
            columns,
            delimiter,
            csv,
            max_dcr,
            member,
            json,
        } => {
            let import = forces.map(|path| ForceImport {
                path,
                columns,
                delimiter,
            });
            check(&job, import.as_ref(), csv.as_deref(), max_dcr, member.as_deref(), json)
        }
        Commands::Template { output } => write_template(&output),
        Commands::Demo => demo(),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        if let Some(calc_error) = e.downcast_ref::<CalcError>() {
            if let Ok(json) = serde_json::to_string_pretty(calc_error) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
        std::process::exit(1);
    }
}

/// Where `check` reads replacement forces from
struct ForceImport {
    path: PathBuf,
    columns: Option<PathBuf>,
    delimiter: Option<char>,
}

impl ForceImport {
    /// The job's mapping, replaced by `--columns` and then `--delimiter`
    fn columns(&self, job: &DesignJob) -> Result<ForceColumns> {
        let mut columns = match &self.columns {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading column mapping {}", path.display()))?;
                serde_json::from_str::<ForceColumns>(&text)
                    .with_context(|| format!("parsing column mapping {}", path.display()))?
            }
            None => job.force_columns.clone(),
        };
        if let Some(delimiter) = self.delimiter {
            columns = columns.with_delimiter(delimiter);
        }
        Ok(columns)
    }
}

fn check(
    job_path: &Path,
    import: Option<&ForceImport>,
    csv: Option<&Path>,
    max_dcr: Option<f64>,
    member: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut job = load_job(job_path).with_context(|| format!("loading {}", job_path.display()))?;

    if let Some(import) = import {
        let columns = import.columns(&job)?;
        let table = load_force_table(&import.path, &columns)
            .with_context(|| format!("reading forces from {}", import.path.display()))?;
        if !json {
            println!("Read {} forces from {}", table.len(), import.path.display());
        }
        job.set_forces(table);
    }

    let table = job.run()?;

    if let Some(path) = csv {
        write_results_csv(&table, path)?;
    }

    let mut shown = table.clone();
    if let Some(name) = member {
        shown = shown.for_member(name);
    }
    if let Some(limit) = max_dcr {
        shown = shown.with_max_dcr_at_most(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("Job {} - {} ({})", job.meta.job_id, job.meta.client, job.meta.engineer);
    println!("Material: {}", job.material.name);
    print_table(&shown);
    print_summary(&table);
    if let Some(path) = csv {
        println!("Results written to {}", path.display());
    }
    Ok(())
}

fn write_template(output: &Path) -> Result<()> {
    save_job(&demo_job(), output)?;
    println!("Template written to {}", output.display());
    Ok(())
}

fn demo() -> Result<()> {
    let job = demo_job();
    let table = job.run()?;

    println!("Timbercheck demo: {} combinations", table.len());
    print_table(&table);
    print_summary(&table);

    if let Some(first) = table.rows.first() {
        println!();
        println!("JSON output for {}:", first.key);
        println!("{}", serde_json::to_string_pretty(first)?);
    }
    Ok(())
}

/// Example job in cm / kgf / kgf·cm
fn demo_job() -> DesignJob {
    let material = MaterialProperties::new("Hardwood", 84.0, 212.0, 94.9, 81.4, 8.54, 127000.0);
    let mut job = DesignJob::new("Engineer", "DEMO-001", "Demo Client", material);
    job.meta.description = "Two sections, two members, three force cases".to_string();
    job.factors = DesignFactors::from_conditions(
        &ServiceConditions::new()
            .with_design_format(DesignFormat::Lrfd)
            .with_load_duration(LoadDuration::Normal),
    );

    for (name, width, depth) in [("6.4x6.4", 6.4, 6.4), ("5x10", 5.0, 10.0)] {
        if let Ok(section) = RectangularSectionProperties::new(name, width, depth) {
            job.add_section(section);
        }
    }
    job.add_member(MemberDefinition::new("Post-200", 200.0));
    job.add_member(MemberDefinition::new("Brace-150", 150.0).with_factors(1.0, 0.8));

    job.add_force(ForceDemand::zero("Dead"));
    job.add_force(ForceDemand::zero("Gravity").with_axial(-350.0).with_moments(0.0, 800.0, 150.0));
    job.add_force(
        ForceDemand::zero("Uplift")
            .with_axial(900.0)
            .with_shears(40.0, 10.0)
            .with_moments(25.0, 600.0, 0.0),
    );
    job
}

fn print_table(table: &ResultTable) {
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "  {:<10} {:<12} {:<10} {:>8}  {:<16} STATUS",
        "SECTION", "MEMBER", "FORCE", "MAX DCR", "GOVERNS"
    );
    println!("═══════════════════════════════════════════════════════════════════════════");

    for row in table.iter() {
        let status = row.status(table.dcr_limit);
        match (&row.outcome, row.governing()) {
            (Ok(_), Some((mode, ratio))) => println!(
                "  {:<10} {:<12} {:<10} {:>8.3}  {:<16} {}",
                row.key.section,
                row.key.member,
                row.key.force,
                ratio,
                mode,
                status_icon(status)
            ),
            (Err(e), _) => println!(
                "  {:<10} {:<12} {:<10} {:>8}  {:<16} {} {}",
                row.key.section,
                row.key.member,
                row.key.force,
                "-",
                e.error_code(),
                status_icon(status),
                e
            ),
            _ => {}
        }
    }
}

fn print_summary(table: &ResultTable) {
    let summary = table.summary();
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "  {} rows: {} pass, {} fail, {} error (limit {})",
        summary.total, summary.passing, summary.failing, summary.errored, table.dcr_limit
    );
    if let Some(governing) = summary.governing {
        println!(
            "  Governing: {} -> {} = {:.3}",
            governing.key, governing.mode, governing.ratio
        );
    }
    println!("═══════════════════════════════════════════════════════════════════════════");
}

fn status_icon(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Pass => "[OK]",
        RowStatus::Fail => "[FAIL]",
        RowStatus::Error => "[ERROR]",
    }
}
