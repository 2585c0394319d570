//! # GSTR-2A Puller
//!
//! Bulk-requests GSTR-2A pulls from the OCTA GST API for every company in an
//! input spreadsheet and every month in a period range, then records the
//! returned job ids and failures in a timestamped workbook.
//!
//! ## Architecture
//!
//! - [`input`] - read companies from CSV or Excel, validate columns
//! - [`identifier`] - GSTIN validation and company id normalization
//! - [`period`] - `YYYY-MM` return periods and inclusive month ranges
//! - [`client`] - one authenticated pull endpoint with fixed retry
//! - [`puller`] - the (company x period) loop and per-pair results
//! - [`output`] - result and summary sheets (XLSX or CSV)
//! - [`config`] - explicit run configuration
//! - [`logging`] - console and per-run log file
//! - [`shutdown`] - Ctrl+C handling so finished work is still written
//!
//! ## Example
//!
//! ```no_run
//! use gstr2a_puller::client::OctaClient;
//! use gstr2a_puller::config::{Credentials, PullConfig};
//! use gstr2a_puller::period::{month_range, ReturnPeriod};
//! use gstr2a_puller::puller::PullExecutor;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PullConfig {
//!     credentials: Credentials::new("api-key-0123456789", "api-secret-0123456789"),
//!     ..PullConfig::default()
//! };
//! let companies = gstr2a_puller::input::read_companies("input/companies.xlsx", None)?;
//! let periods = month_range("2024-04".parse()?, "2024-06".parse::<ReturnPeriod>()?);
//!
//! let client = Arc::new(OctaClient::from_config(&config)?);
//! let run = PullExecutor::new(client, &config).run(&companies, &periods).await?;
//! println!("{} pulls attempted", run.results.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// CLI command implementations
pub mod cli;

/// Remote pull client
pub mod client;

/// Run configuration
pub mod config;

/// GSTIN and company id rules
pub mod identifier;

/// Company input readers
pub mod input;

/// Tracing setup
pub mod logging;

/// Result writers
pub mod output;

/// Return periods
pub mod period;

/// Pull orchestration
pub mod puller;

/// Graceful shutdown coordination
pub mod shutdown;

pub use client::{FailureKind, PullApi, PullFailure};
pub use config::PullConfig;
pub use period::ReturnPeriod;
pub use puller::{PullResult, PullStatus};

/// One company row from the input sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyRecord {
    /// OCTA company id, always carrying the `oc-` prefix
    pub company_id: String,
    /// Display name
    pub company_name: String,
    /// GSTIN, trimmed and upper-cased but not yet format-checked
    pub gstin: String,
    /// Optional `Environment` column
    pub environment: String,
    /// Optional `Description` column
    pub description: String,
    /// Optional `Registration` column
    pub registration: String,
}

impl CompanyRecord {
    /// Record with the three mandatory fields, normalizing id and GSTIN.
    pub fn new(
        company_id: impl AsRef<str>,
        company_name: impl Into<String>,
        gstin: impl AsRef<str>,
    ) -> Self {
        Self {
            company_id: identifier::normalize_company_id(company_id.as_ref()),
            company_name: company_name.into().trim().to_string(),
            gstin: gstin.as_ref().trim().to_uppercase(),
            ..Self::default()
        }
    }

    /// Whether the GSTIN passes local format validation.
    pub fn has_valid_gstin(&self) -> bool {
        identifier::is_valid_gstin(&self.gstin)
    }
}
