//! GSTIN validation and OCTA company identifier normalization
//!
//! A GSTIN is the 15-character GST registration number:
//! `SS PPPPP NNNN P E Z C` where `SS` is the state code, the next ten
//! characters are the holder's PAN, `E` is the entity number, `Z` is a
//! literal and `C` is a check character.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Prefix the OCTA API expects on every company identifier.
pub const COMPANY_ID_PREFIX: &str = "oc-";

/// Length of a GSTIN.
pub const GSTIN_LEN: usize = 15;

static GSTIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("GSTIN pattern is valid")
});

/// A GSTIN that passed local format validation.
///
/// # Examples
///
/// ```
/// use gstr2a_puller::identifier::Gstin;
///
/// let gstin = Gstin::parse(" 19aadcg0737g1zq ").unwrap();
/// assert_eq!(gstin.as_str(), "19AADCG0737G1ZQ");
/// assert_eq!(gstin.state_code(), "19");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gstin(String);

impl Gstin {
    /// Parse and validate a GSTIN.
    ///
    /// Input is trimmed and upper-cased before matching.
    ///
    /// # Errors
    ///
    /// Returns [`GstinError::InvalidLength`] when the trimmed input is not 15
    /// characters long and [`GstinError::InvalidFormat`] when it does not match
    /// the GSTIN structure.
    pub fn parse(s: &str) -> Result<Self, GstinError> {
        let normalized = s.trim().to_uppercase();

        let len = normalized.chars().count();
        if len != GSTIN_LEN {
            return Err(GstinError::InvalidLength { gstin: normalized, len });
        }

        if !GSTIN_PATTERN.is_match(&normalized) {
            return Err(GstinError::InvalidFormat(normalized));
        }

        Ok(Self(normalized))
    }

    /// The normalized GSTIN.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit state code.
    pub fn state_code(&self) -> &str {
        &self.0[..2]
    }

    /// The embedded PAN (characters 3-12).
    pub fn pan(&self) -> &str {
        &self.0[2..12]
    }
}

impl fmt::Display for Gstin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `s` is a well-formed GSTIN.
pub fn is_valid_gstin(s: &str) -> bool {
    Gstin::parse(s).is_ok()
}

/// Normalize a raw company identifier from an input sheet.
///
/// Trims whitespace, drops a trailing `.0` left behind by spreadsheet
/// numeric cells and adds [`COMPANY_ID_PREFIX`] when missing. Blank input
/// stays blank so the caller can reject the row.
///
/// ```
/// use gstr2a_puller::identifier::normalize_company_id;
///
/// assert_eq!(normalize_company_id("3372"), "oc-3372");
/// assert_eq!(normalize_company_id("3372.0"), "oc-3372");
/// assert_eq!(normalize_company_id(" oc-3372 "), "oc-3372");
/// ```
pub fn normalize_company_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if trimmed.starts_with(COMPANY_ID_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{COMPANY_ID_PREFIX}{trimmed}")
    }
}

/// Errors produced by GSTIN validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GstinError {
    /// Wrong number of characters
    #[error("invalid GSTIN '{gstin}': expected 15 characters, got {len}")]
    InvalidLength {
        /// Normalized input
        gstin: String,
        /// Character count of the normalized input
        len: usize,
    },

    /// Right length, wrong structure
    #[error("invalid GSTIN format: {0}")]
    InvalidFormat(String),
}
