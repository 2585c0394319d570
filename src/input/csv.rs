//! CSV input backend

use std::fs::File;
use std::path::Path;
use tracing::debug;

use super::{InputError, InputResult, Table};

/// Read a CSV file with a header row.
///
/// Rows may have fewer fields than the header; a UTF-8 BOM on the first
/// header is stripped.
pub fn read_table(path: &Path) -> InputResult<Table> {
    let file = File::open(path)
        .map_err(|e| InputError::Io(format!("failed to open {}: {}", path.display(), e)))?;

    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| InputError::Csv(format!("failed to read header row: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| InputError::Csv(e.to_string()))?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    debug!("Read {} CSV rows from {}", rows.len(), path.display());
    Ok(Table { headers, rows })
}
