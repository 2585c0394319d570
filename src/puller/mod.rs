//! Pull orchestration
//!
//! [`executor::PullExecutor`] walks every (company, period) pair, asks a
//! [`PullApi`](crate::client::PullApi) for one pull per pair and records a
//! [`PullResult`] for each, success or not.
//!
//! # Ordering
//!
//! Pairs are visited company-major: all periods of the first company in
//! chronological order, then all periods of the second, and so on. Result
//! rows come out in that same order.
//!
//! # Error Handling
//!
//! A failed pull never stops the run; it becomes a `Failed` row. Only setup
//! problems (nothing to pull) are returned as [`PullError`].

use crate::client::{PullFailure, PullOutcome};
use crate::period::ReturnPeriod;
use crate::CompanyRecord;
use chrono::{DateTime, Local};
use std::fmt;

pub mod executor;
pub mod progress;

pub use executor::PullExecutor;
pub use progress::ProgressState;

/// Text written in the Error Type / Error Message columns of successful rows.
pub const NO_ERROR: &str = "-";

/// Setup errors that abort a run before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PullError {
    /// The company list is empty
    #[error("no companies to pull")]
    NoCompanies,

    /// The period range is empty
    #[error("no return periods to pull")]
    NoPeriods,
}

/// Outcome of one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullStatus {
    /// The API accepted the pull and returned a job id
    Success,
    /// The pull failed; see [`PullResult::failure`]
    Failed,
}

impl PullStatus {
    /// Label written to the Status column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for PullStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one attempted (company, period) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PullResult {
    /// Normalized company id
    pub company_id: String,
    /// Company name from input
    pub company_name: String,
    /// GSTIN as read from input
    pub gstin: String,
    /// Requested period
    pub return_period: ReturnPeriod,
    /// Job id, present on success
    pub job_id: Option<String>,
    /// Success or failure
    pub status: PullStatus,
    /// Why the pull failed, present on failure
    pub failure: Option<PullFailure>,
    /// When the outcome was recorded
    pub timestamp: DateTime<Local>,
}

impl PullResult {
    /// Build the row for `company` and `period` from a client outcome.
    pub fn from_outcome(company: &CompanyRecord, period: ReturnPeriod, outcome: PullOutcome) -> Self {
        let (status, job_id, failure) = match outcome {
            Ok(job_id) => (PullStatus::Success, Some(job_id), None),
            Err(failure) => (PullStatus::Failed, None, Some(failure)),
        };
        Self {
            company_id: company.company_id.clone(),
            company_name: company.company_name.clone(),
            gstin: company.gstin.clone(),
            return_period: period,
            job_id,
            status,
            failure,
            timestamp: Local::now(),
        }
    }

    /// Whether the pull succeeded.
    pub fn is_success(&self) -> bool {
        self.status == PullStatus::Success
    }

    /// Job id or an empty string.
    pub fn job_id_str(&self) -> &str {
        self.job_id.as_deref().unwrap_or_default()
    }

    /// Failure category label, or [`NO_ERROR`].
    pub fn error_type(&self) -> &'static str {
        self.failure.as_ref().map(|f| f.kind().label()).unwrap_or(NO_ERROR)
    }

    /// Failure message, or [`NO_ERROR`].
    pub fn error_message(&self) -> String {
        self.failure
            .as_ref()
            .map(|f| f.to_string())
            .unwrap_or_else(|| NO_ERROR.to_string())
    }

    /// Timestamp as written to result sheets.
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct PullRun {
    /// One row per attempted pair, in attempt order
    pub results: Vec<PullResult>,
    /// Number of pairs the run set out to attempt
    pub planned: usize,
    /// Whether shutdown cut the run short
    pub interrupted: bool,
}

impl PullRun {
    /// Pairs that were never attempted.
    pub fn skipped(&self) -> usize {
        self.planned.saturating_sub(self.results.len())
    }
}
