//! Result writers
//!
//! A run is written as two sheets: one row per attempted pair, and a
//! summary with totals and a per-company breakdown.
//!
//! - [`xlsx::XlsxReportWriter`] - both sheets in one workbook (default)
//! - [`csv::CsvReportWriter`] - `<stem>.csv` plus `<stem>_summary.csv`
//! - [`path`] - timestamped, collision-free output file names
//! - [`summary::RunSummary`] - the aggregation behind the summary sheet

use crate::puller::PullResult;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod csv;
pub mod path;
pub mod summary;
pub mod xlsx;

pub use summary::{CompanySummary, RunSummary};

/// Name of the per-pair result sheet.
pub const RESULTS_SHEET: &str = "GSTR2A_Pull_Results";

/// Name of the summary sheet.
pub const SUMMARY_SHEET: &str = "Summary";

/// Result sheet header, in column order.
pub const RESULT_COLUMNS: [&str; 9] = [
    "Company ID",
    "Company Name",
    "GSTIN",
    "Return Period",
    "Job ID",
    "Status",
    "Error Type",
    "Error Message",
    "Timestamp",
];

/// Header of the per-company table on the summary sheet.
pub const COMPANY_SUMMARY_COLUMNS: [&str; 5] =
    ["Company ID", "Company Name", "Attempts", "Successful", "Failed"];

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Workbook could not be built or saved
    #[error("XLSX error: {0}")]
    Xlsx(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    Csv(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Single workbook with both sheets
    #[default]
    Xlsx,
    /// Two CSV files
    Csv,
}

impl ReportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Writer for this format.
    pub fn writer(&self) -> Box<dyn ReportWriter> {
        match self {
            Self::Xlsx => Box::new(xlsx::XlsxReportWriter::new()),
            Self::Csv => Box::new(csv::CsvReportWriter::new()),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown report format '{other}' (expected xlsx or csv)")),
        }
    }
}

/// Writes a run's results to disk.
pub trait ReportWriter {
    /// Write results and summary for `results` to `path`.
    ///
    /// Returns every file written; `path` is always the first.
    fn write_report(&self, path: &Path, results: &[PullResult]) -> OutputResult<Vec<PathBuf>>;
}

/// Write `results` into a fresh timestamped file under `output_dir`.
pub fn write_report(
    output_dir: &Path,
    format: ReportFormat,
    results: &[PullResult],
) -> OutputResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| {
        OutputError::Io(format!(
            "failed to create directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;
    let path = path::report_path(output_dir, format, chrono::Local::now());
    format.writer().write_report(&path, results)
}

/// One result row as the cells written to either format.
pub fn result_cells(result: &PullResult) -> [String; 9] {
    [
        result.company_id.clone(),
        result.company_name.clone(),
        result.gstin.clone(),
        result.return_period.to_string(),
        result.job_id_str().to_string(),
        result.status.to_string(),
        result.error_type().to_string(),
        result.error_message(),
        result.timestamp_str(),
    ]
}
