//! OCTA GST remote client
//!
//! - [`PullApi`] - the seam the pull loop talks to
//! - [`octa::OctaClient`] - GSTIN pre-check, fixed-count retry, fixed delay
//! - [`http::HttpTransport`] - one authenticated `POST` via reqwest
//! - [`response::classify`] - maps HTTP responses onto [`PullFailure`]

use crate::period::ReturnPeriod;
use async_trait::async_trait;
use std::fmt;

pub mod http;
pub mod octa;
pub mod response;

pub use http::{HttpTransport, PullRequest, RawResponse, Transport, TransportError};
pub use octa::OctaClient;

/// Opaque job identifier returned by a successful pull request.
pub type JobId = String;

/// Outcome of one pull: the job id, or why it failed.
pub type PullOutcome = Result<JobId, PullFailure>;

/// Anything that can start a GSTR-2A pull for one company and period.
#[async_trait]
pub trait PullApi: Send + Sync {
    /// Request a pull.
    ///
    /// # Arguments
    /// * `company_id` - normalized OCTA company id (e.g. `oc-3372`)
    /// * `gstin` - GSTIN as read from input; validated before any request
    /// * `period` - return period
    async fn pull(&self, company_id: &str, gstin: &str, period: ReturnPeriod) -> PullOutcome;
}

/// Why a single pull failed.
///
/// Failures are recorded per (company, period) pair and never stop the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PullFailure {
    /// 401/403 from the API
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The GSTIN has not completed OTP verification with the GST system
    #[error("not connected to GST system - complete OTP verification for {gstin}")]
    NotConnected {
        /// GSTIN the API refused
        gstin: String,
    },

    /// HTTP 429
    #[error("rate limit exceeded")]
    RateLimited,

    /// Request exceeded the configured timeout
    #[error("request timeout")]
    Timeout,

    /// Connection could not be established or was dropped
    #[error("connection error: {0}")]
    Connection(String),

    /// HTTP 5xx
    #[error("OCTA GST server error (HTTP {0})")]
    Server(u16),

    /// Malformed GSTIN or return period
    #[error("validation error: {0}")]
    Validation(String),

    /// Anything else
    #[error("{0}")]
    Unknown(String),
}

impl PullFailure {
    /// Discriminant used for branching and for the Error Type column.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Authentication(_) => FailureKind::Authentication,
            Self::NotConnected { .. } => FailureKind::NotConnected,
            Self::RateLimited => FailureKind::RateLimit,
            Self::Timeout => FailureKind::Timeout,
            Self::Connection(_) => FailureKind::Connection,
            Self::Server(_) => FailureKind::Server,
            Self::Validation(_) => FailureKind::Validation,
            Self::Unknown(_) => FailureKind::Unknown,
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout | Self::Connection(_) | Self::Server(_)
        )
    }
}

/// Failure category without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Bad credentials or no access to the company
    Authentication,
    /// GSTIN not linked to the GST system
    NotConnected,
    /// Throttled by the API
    RateLimit,
    /// Network timeout
    Timeout,
    /// Network connection failure
    Connection,
    /// Server-side error
    Server,
    /// Bad GSTIN or period
    Validation,
    /// Unclassified
    Unknown,
}

impl FailureKind {
    /// Label written to result sheets.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Authentication => "AuthenticationError",
            Self::NotConnected => "NotConnectedError",
            Self::RateLimit => "RateLimitError",
            Self::Timeout => "TimeoutError",
            Self::Connection => "ConnectionError",
            Self::Server => "ServerError",
            Self::Validation => "ValidationError",
            Self::Unknown => "UnknownError",
        }
    }

    /// Remediation hint shown next to failures in the console summary.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Authentication => "Verify the API key, secret, and company permissions",
            Self::NotConnected => "Complete OTP verification for this GSTIN in OCTA GST",
            Self::RateLimit => "Increase --pull-delay-secs or --retry-delay-secs",
            Self::Timeout => "Check network connectivity or increase --timeout-secs",
            Self::Connection => "Verify internet connectivity and DNS resolution",
            Self::Server => "OCTA GST may be having issues, try again later",
            Self::Validation => "Check the GSTIN column and the requested period range",
            Self::Unknown => "Inspect the log file for the full response",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors building the HTTP client itself (not per-pull failures)
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// reqwest client construction failed
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}
