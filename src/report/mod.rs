//! Report emission
//!
//! The only stage with side effects. Every file is written to a temporary
//! sibling in the output directory and renamed into place once complete, so a
//! crash never leaves a truncated table behind.
//!
//! | File | Contents |
//! |------|----------|
//! | `combined_results.csv` | every record with derived columns |
//! | `combined_results.parquet` | same, columnar (optional) |
//! | `metrics_summary.csv` | one row per (language, size), ranking order |
//! | `benchmark_report.txt` | ranking narrative |
//! | `complexity_results.csv` | best model per language |
//! | `analysis_run.json` | run manifest |

pub mod narrative;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::aggregate::Aggregation;
use crate::complexity::Classification;
use crate::record::{BenchmarkRecord, RecordStore};
use crate::run::AnalysisRun;
use crate::storage::StorageEngine;
use crate::Result;

/// Combined record table.
pub const COMBINED_CSV: &str = "combined_results.csv";
/// Columnar copy of the combined record table.
pub const COMBINED_PARQUET: &str = "combined_results.parquet";
/// Per-(language, size) summary.
pub const SUMMARY_CSV: &str = "metrics_summary.csv";
/// Ranking narrative.
pub const REPORT_TXT: &str = "benchmark_report.txt";
/// Complexity classification table.
pub const COMPLEXITY_CSV: &str = "complexity_results.csv";
/// Run manifest.
pub const MANIFEST_JSON: &str = "analysis_run.json";

const COMBINED_HEADER: [&str; 10] = [
    "language",
    "matrix_size",
    "iterations",
    "individual_times",
    "average_time",
    "min_time",
    "max_time",
    "std_dev",
    "fastest_time",
    "relative_performance",
];

const COMPLEXITY_HEADER: [&str; 4] = ["language", "best_model", "r_squared", "coefficients"];

/// Writes analysis results into one output directory.
#[derive(Debug, Clone)]
pub struct ReportEmitter {
    output_dir: PathBuf,
    write_parquet: bool,
}

impl ReportEmitter {
    /// Create an emitter for `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, write_parquet: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_parquet,
        }
    }

    /// Output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every table and the narrative, recording each file in `run`.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or a file cannot be
    /// written. Files already finalized stay in place; the failing file is
    /// never left half-written.
    pub fn emit_tables(
        &self,
        store: &RecordStore,
        aggregation: &Aggregation,
        classification: &Classification,
        run: &mut AnalysisRun,
    ) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;

        run.record_output(self.write_file(COMBINED_CSV, |file| write_combined_csv(file, store))?);
        if self.write_parquet {
            run.record_output(self.write_file(COMBINED_PARQUET, |file| {
                StorageEngine::from_records(store.iter())?.write_parquet(file)
            })?);
        }
        run.record_output(
            self.write_file(SUMMARY_CSV, |file| write_summary_csv(file, aggregation))?,
        );
        run.record_output(self.write_file(REPORT_TXT, |file| {
            file.write_all(narrative::render(aggregation, classification).as_bytes())?;
            Ok(())
        })?);
        run.record_output(
            self.write_file(COMPLEXITY_CSV, |file| write_complexity_csv(file, classification))?,
        );

        info!(dir = %self.output_dir.display(), "wrote analysis tables");
        Ok(())
    }

    /// Write the run manifest.
    ///
    /// # Errors
    ///
    /// Returns error if the manifest cannot be serialized or written.
    pub fn emit_manifest(&self, run: &mut AnalysisRun) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        run.record_output(self.output_dir.join(MANIFEST_JSON));
        let snapshot = run.clone();
        self.write_file(MANIFEST_JSON, |file| {
            serde_json::to_writer_pretty(&mut *file, &snapshot)?;
            file.write_all(b"\n")?;
            Ok(())
        })
    }

    /// Write `file_name` through a temporary file persisted on success.
    fn write_file(
        &self,
        file_name: &str,
        write: impl FnOnce(&mut File) -> Result<()>,
    ) -> Result<PathBuf> {
        let mut temp = NamedTempFile::new_in(&self.output_dir)?;
        write(temp.as_file_mut())?;
        temp.as_file().sync_all()?;

        let path = self.output_dir.join(file_name);
        temp.persist(&path)?;
        debug!(path = %path.display(), "finalized output file");
        Ok(path)
    }
}

fn write_combined_csv(file: &mut File, store: &RecordStore) -> Result<()> {
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(COMBINED_HEADER)?;
    for record in store.iter() {
        writer.write_record(combined_row(record))?;
    }
    writer.flush()?;
    Ok(())
}

fn combined_row(record: &BenchmarkRecord) -> [String; 10] {
    let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    [
        record.language().to_string(),
        record.matrix_size().to_string(),
        record.iterations().to_string(),
        record
            .individual_times()
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        record.average_time().to_string(),
        record.min_time().to_string(),
        record.max_time().to_string(),
        record.std_dev().to_string(),
        optional(record.fastest_time()),
        optional(record.relative_performance()),
    ]
}

fn write_summary_csv(file: &mut File, aggregation: &Aggregation) -> Result<()> {
    let mut writer = csv::Writer::from_writer(file);
    for row in aggregation.summary() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_complexity_csv(file: &mut File, classification: &Classification) -> Result<()> {
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(COMPLEXITY_HEADER)?;
    for fit in &classification.fits {
        writer.write_record([
            fit.language().to_string(),
            fit.best_model().name().to_string(),
            fit.r_squared().to_string(),
            format_coefficients(fit.coefficients()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// `[c_d c_(d-1) … c_0]` in scientific notation.
#[must_use]
pub fn format_coefficients(coefficients: &[f64]) -> String {
    let terms: Vec<String> = coefficients.iter().map(|c| format!("{c:.6e}")).collect();
    format!("[{}]", terms.join(" "))
}
