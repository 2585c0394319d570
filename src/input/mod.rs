//! Company input readers
//!
//! Both backends produce a [`Table`] of trimmed strings; column matching,
//! row filtering and normalization happen here so CSV and Excel inputs
//! behave identically.

use crate::CompanyRecord;
use std::path::Path;
use tracing::{debug, info, warn};

pub mod csv;
pub mod excel;

/// Mandatory input columns, matched case-insensitively.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Company ID", "Company Name", "GSTIN"];

/// Columns carried through when present.
pub const OPTIONAL_COLUMNS: [&str; 3] = ["Environment", "Description", "Registration"];

/// Sheet read when the caller does not name one and it exists.
pub const DEFAULT_SHEET_NAME: &str = "Companies";

/// Input errors. All of them abort the run before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// File could not be opened or read
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(String),

    /// Workbook could not be parsed
    #[error("workbook error: {0}")]
    Workbook(String),

    /// Extension is not CSV or a spreadsheet format
    #[error("unsupported input format '{0}': expected .csv, .xlsx, .xlsm, .xls or .ods")]
    UnsupportedFormat(String),

    /// Requested sheet does not exist
    #[error("sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        /// Requested sheet name
        sheet: String,
        /// Sheets present in the workbook
        available: Vec<String>,
    },

    /// One or more mandatory columns are absent
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// No usable company rows
    #[error("no company rows found in input")]
    Empty,
}

/// Result type for input operations
pub type InputResult<T> = Result<T, InputError>;

/// Raw header row plus data rows, every cell trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header cells
    pub headers: Vec<String>,
    /// Data rows; may be shorter than the header row
    pub rows: Vec<Vec<String>>,
}

/// Input formats understood by [`read_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values
    Csv,
    /// xlsx / xlsm / xls / ods workbook
    Workbook,
}

impl InputFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> InputResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Whether `path` looks like a supported input file.
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// Read the raw table from a CSV file or workbook sheet.
pub fn read_table(path: &Path, sheet: Option<&str>) -> InputResult<Table> {
    if !path.exists() {
        return Err(InputError::Io(format!("input file not found: {}", path.display())));
    }

    match InputFormat::from_path(path)? {
        InputFormat::Csv => csv::read_table(path),
        InputFormat::Workbook => excel::read_table(path, sheet),
    }
}

/// Read and normalize company records.
///
/// # Errors
///
/// - [`InputError::MissingColumns`] if any of [`REQUIRED_COLUMNS`] is absent
/// - [`InputError::Empty`] if no row has both a company id and a GSTIN
/// - IO, CSV or workbook errors from the backend
pub fn read_companies<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> InputResult<Vec<CompanyRecord>> {
    let path = path.as_ref();
    info!("Reading companies from {}", path.display());

    let table = read_table(path, sheet)?;
    let companies = companies_from_table(&table)?;

    info!("Loaded {} companies from {}", companies.len(), path.display());
    if let Some(first) = companies.first() {
        debug!("Sample company: {:?}", first);
    }
    Ok(companies)
}

/// Summary of a structurally valid input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureReport {
    /// Header row as read
    pub headers: Vec<String>,
    /// Data rows present (before filtering)
    pub data_rows: usize,
}

/// Check headers and presence of data without building records.
pub fn validate_structure<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> InputResult<StructureReport> {
    let table = read_table(path.as_ref(), sheet)?;
    ColumnMap::resolve(&table.headers)?;

    let data_rows = table
        .rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .count();
    if data_rows == 0 {
        return Err(InputError::Empty);
    }

    Ok(StructureReport {
        headers: table.headers,
        data_rows,
    })
}

/// Column indices resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    company_id: usize,
    company_name: usize,
    gstin: usize,
    environment: Option<usize>,
    description: Option<usize>,
    registration: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> InputResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let [id_col, name_col, gstin_col] = REQUIRED_COLUMNS;
        let (company_id, company_name, gstin) = match (find(id_col), find(name_col), find(gstin_col)) {
            (Some(id), Some(name), Some(gstin)) => (id, name, gstin),
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .filter(|c| find(c).is_none())
                    .map(|c| c.to_string())
                    .collect();
                return Err(InputError::MissingColumns(missing));
            }
        };

        let [env_col, desc_col, reg_col] = OPTIONAL_COLUMNS;
        Ok(Self {
            company_id,
            company_name,
            gstin,
            environment: find(env_col),
            description: find(desc_col),
            registration: find(reg_col),
        })
    }
}

/// Turn a raw table into company records.
pub fn companies_from_table(table: &Table) -> InputResult<Vec<CompanyRecord>> {
    let columns = ColumnMap::resolve(&table.headers)?;
    let cell = |row: &[String], idx: usize| row.get(idx).map(|c| c.trim()).unwrap_or_default().to_string();
    let optional = |row: &[String], idx: Option<usize>| idx.map(|i| cell(row, i)).unwrap_or_default();

    let mut companies = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        // header is line 1
        let line = i + 2;
        let gstin = cell(row, columns.gstin);
        if gstin.is_empty() {
            if row.iter().any(|c| !c.trim().is_empty()) {
                debug!("Skipping row {}: no GSTIN", line);
            }
            continue;
        }

        let mut record = CompanyRecord::new(
            cell(row, columns.company_id),
            cell(row, columns.company_name),
            &gstin,
        );
        if record.company_id.is_empty() {
            warn!("Skipping row {} ({}): missing Company ID", line, gstin);
            continue;
        }

        record.environment = optional(row, columns.environment);
        record.description = optional(row, columns.description);
        record.registration = optional(row, columns.registration);

        if !record.has_valid_gstin() {
            warn!(
                "Row {} ({}): GSTIN '{}' has an invalid format; its pulls will fail validation",
                line, record.company_name, record.gstin
            );
        }
        companies.push(record);
    }

    if companies.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(companies)
}
