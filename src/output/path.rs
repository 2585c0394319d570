//! Output file naming
//!
//! Reports are named `gstr2a_pulls_YYYYmmdd_HHMMSS.<ext>` so every run gets
//! its own file. Two runs in the same second get `_1`, `_2`, ... suffixes
//! instead of overwriting each other.

use super::ReportFormat;
use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};

/// Prefix shared by every report file.
pub const REPORT_PREFIX: &str = "gstr2a_pulls";

/// Suffix appended to the stem of the CSV summary file.
pub const SUMMARY_SUFFIX: &str = "_summary";

/// `gstr2a_pulls_YYYYmmdd_HHMMSS` for `at`.
pub fn report_stem<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}", REPORT_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// First free report path under `dir` for a run started at `at`.
pub fn report_path<Tz: TimeZone>(dir: &Path, format: ReportFormat, at: DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    unique_path(dir, &report_stem(&at), format.extension())
}

/// `dir/stem.ext`, or `dir/stem_N.ext` with the smallest free `N`.
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{extension}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}.{extension}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// `<stem>_summary.<ext>` next to `path`.
pub fn summary_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}{SUMMARY_SUFFIX}");
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}
