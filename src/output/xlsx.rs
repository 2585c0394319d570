//! XLSX report writer

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{
    result_cells, OutputError, OutputResult, ReportWriter, RunSummary, COMPANY_SUMMARY_COLUMNS,
    RESULTS_SHEET, RESULT_COLUMNS, SUMMARY_SHEET,
};
use crate::puller::PullResult;

/// Widest a column is allowed to get, in characters.
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Writes results and summary as two sheets of one workbook.
#[derive(Debug, Default, Clone)]
pub struct XlsxReportWriter;

impl XlsxReportWriter {
    /// Create a writer
    pub fn new() -> Self {
        Self
    }
}

fn xlsx_err(e: XlsxError) -> OutputError {
    OutputError::Xlsx(e.to_string())
}

/// Sizes columns to their longest cell, capped at [`MAX_COLUMN_WIDTH`].
#[derive(Debug, Default)]
struct ColumnWidths(Vec<usize>);

impl ColumnWidths {
    fn observe(&mut self, col: usize, text: &str) {
        if self.0.len() <= col {
            self.0.resize(col + 1, 0);
        }
        self.0[col] = self.0[col].max(text.chars().count());
    }

    fn apply(&self, sheet: &mut Worksheet) -> OutputResult<()> {
        for (col, width) in self.0.iter().enumerate() {
            let width = (width + 2).min(MAX_COLUMN_WIDTH);
            sheet
                .set_column_width(col as u16, width as f64)
                .map_err(xlsx_err)?;
        }
        Ok(())
    }
}

fn write_results_sheet(sheet: &mut Worksheet, results: &[PullResult], header: &Format) -> OutputResult<()> {
    sheet.set_name(RESULTS_SHEET).map_err(xlsx_err)?;
    let mut widths = ColumnWidths::default();

    for (col, name) in RESULT_COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *name, header)
            .map_err(xlsx_err)?;
        widths.observe(col, name);
    }

    for (i, result) in results.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in result_cells(result).iter().enumerate() {
            sheet.write_string(row, col as u16, cell).map_err(xlsx_err)?;
            widths.observe(col, cell);
        }
    }

    sheet.set_freeze_panes(1, 0).map_err(xlsx_err)?;
    widths.apply(sheet)
}

fn write_summary_sheet(sheet: &mut Worksheet, summary: &RunSummary, header: &Format) -> OutputResult<()> {
    sheet.set_name(SUMMARY_SHEET).map_err(xlsx_err)?;
    let mut widths = ColumnWidths::default();

    sheet.write_string_with_format(0, 0, "Metric", header).map_err(xlsx_err)?;
    sheet.write_string_with_format(0, 1, "Value", header).map_err(xlsx_err)?;
    let counts = [summary.total_attempts, summary.successful, summary.failed];
    for (i, (label, value)) in summary.overview().iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *label).map_err(xlsx_err)?;
        match counts.get(i) {
            Some(n) => sheet.write_number(row, 1, *n as f64),
            None => sheet.write_string(row, 1, value),
        }
        .map_err(xlsx_err)?;
        widths.observe(0, label);
        widths.observe(1, value);
    }

    // blank row, then the per-company table
    let table_start = summary.overview().len() as u32 + 2;
    for (col, name) in COMPANY_SUMMARY_COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(table_start, col as u16, *name, header)
            .map_err(xlsx_err)?;
        widths.observe(col, name);
    }
    for (i, company) in summary.companies.iter().enumerate() {
        let row = table_start + 1 + i as u32;
        sheet.write_string(row, 0, &company.company_id).map_err(xlsx_err)?;
        sheet.write_string(row, 1, &company.company_name).map_err(xlsx_err)?;
        sheet.write_number(row, 2, company.attempts as f64).map_err(xlsx_err)?;
        sheet.write_number(row, 3, company.successful as f64).map_err(xlsx_err)?;
        sheet.write_number(row, 4, company.failed as f64).map_err(xlsx_err)?;
        widths.observe(0, &company.company_id);
        widths.observe(1, &company.company_name);
    }

    widths.apply(sheet)
}

impl ReportWriter for XlsxReportWriter {
    fn write_report(&self, path: &Path, results: &[PullResult]) -> OutputResult<Vec<PathBuf>> {
        let summary = RunSummary::from_results(results);
        let header = Format::new().set_bold();
        let mut workbook = Workbook::new();

        write_results_sheet(workbook.add_worksheet(), results, &header)?;
        write_summary_sheet(workbook.add_worksheet(), &summary, &header)?;

        workbook.save(path).map_err(xlsx_err)?;
        info!(
            "Wrote {} results to {} ({} successful, {} failed)",
            results.len(),
            path.display(),
            summary.successful,
            summary.failed
        );
        Ok(vec![path.to_path_buf()])
    }
}
