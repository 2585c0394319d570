//! CSV report writer

use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::path::summary_path;
use super::{
    result_cells, OutputError, OutputResult, ReportWriter, RunSummary, COMPANY_SUMMARY_COLUMNS,
    RESULT_COLUMNS,
};
use crate::puller::PullResult;

const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Writes the result sheet to `path` and the summary to `<stem>_summary.csv`.
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    buffer_size: usize,
}

impl CsvReportWriter {
    /// Create a writer with the default buffer size
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    fn open(&self, path: &Path) -> OutputResult<Writer<BufWriter<File>>> {
        debug!("Creating CSV writer: path={}", path.display());
        let file = File::create(path).map_err(|e| {
            OutputError::Io(format!("failed to create {}: {}", path.display(), e))
        })?;
        // summary rows have varying widths
        Ok(WriterBuilder::new()
            .flexible(true)
            .from_writer(BufWriter::with_capacity(self.buffer_size, file)))
    }

    fn write_results(&self, path: &Path, results: &[PullResult]) -> OutputResult<()> {
        let mut writer = self.open(path)?;
        writer.write_record(RESULT_COLUMNS).map_err(csv_err)?;
        for result in results {
            writer.write_record(result_cells(result)).map_err(csv_err)?;
        }
        writer
            .flush()
            .map_err(|e| OutputError::Io(format!("failed to flush {}: {}", path.display(), e)))
    }

    fn write_summary(&self, path: &Path, summary: &RunSummary) -> OutputResult<()> {
        let mut writer = self.open(path)?;
        writer.write_record(["Metric", "Value"]).map_err(csv_err)?;
        for (label, value) in summary.overview() {
            writer.write_record([label, value.as_str()]).map_err(csv_err)?;
        }
        writer.write_record([""]).map_err(csv_err)?;

        writer.write_record(COMPANY_SUMMARY_COLUMNS).map_err(csv_err)?;
        for company in &summary.companies {
            writer
                .write_record([
                    company.company_id.clone(),
                    company.company_name.clone(),
                    company.attempts.to_string(),
                    company.successful.to_string(),
                    company.failed.to_string(),
                ])
                .map_err(csv_err)?;
        }
        writer
            .flush()
            .map_err(|e| OutputError::Io(format!("failed to flush {}: {}", path.display(), e)))
    }
}

impl Default for CsvReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_err(e: csv::Error) -> OutputError {
    OutputError::Csv(e.to_string())
}

impl ReportWriter for CsvReportWriter {
    fn write_report(&self, path: &Path, results: &[PullResult]) -> OutputResult<Vec<PathBuf>> {
        let summary = RunSummary::from_results(results);
        let summary_file = summary_path(path);

        self.write_results(path, results)?;
        self.write_summary(&summary_file, &summary)?;

        info!(
            "Wrote {} results to {} (summary: {})",
            results.len(),
            path.display(),
            summary_file.display()
        );
        Ok(vec![path.to_path_buf(), summary_file])
    }
}
