//! Workbook input backend (xlsx, xlsm, xls, ods) via calamine

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

use super::{InputError, InputResult, Table, DEFAULT_SHEET_NAME};

/// Read one sheet of a workbook.
///
/// With `sheet` set, that sheet must exist. Otherwise the sheet named
/// [`DEFAULT_SHEET_NAME`] is used when present, else the first sheet.
pub fn read_table(path: &Path, sheet: Option<&str>) -> InputResult<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| InputError::Workbook(format!("failed to open {}: {}", path.display(), e)))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = select_sheet(&sheet_names, sheet)?;
    info!("Using sheet: {}", sheet_name);

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| InputError::Workbook(format!("failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = rows.map(|row| row.iter().map(cell_to_string).collect()).collect();

    debug!("Read {} rows from sheet '{}'", rows.len(), sheet_name);
    Ok(Table { headers, rows })
}

fn select_sheet(names: &[String], requested: Option<&str>) -> InputResult<String> {
    if let Some(requested) = requested {
        return names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(requested))
            .cloned()
            .ok_or_else(|| InputError::SheetNotFound {
                sheet: requested.to_string(),
                available: names.to_vec(),
            });
    }

    names
        .iter()
        .find(|n| n.eq_ignore_ascii_case(DEFAULT_SHEET_NAME))
        .or_else(|| names.first())
        .cloned()
        .ok_or_else(|| InputError::Workbook("workbook contains no sheets".to_string()))
}

/// Render a cell the way it reads in the sheet.
///
/// Whole-number floats lose their fractional part so numeric company ids
/// come through as `3372`, not `3372.0`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        other => other.to_string().trim().to_string(),
    }
}
