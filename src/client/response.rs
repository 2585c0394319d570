//! Classification of pull endpoint responses

use serde::Deserialize;

use super::http::{PullRequest, RawResponse, TransportError};
use super::{JobId, PullFailure, PullOutcome};

/// Provider error code: GSTIN not connected to the GST system.
pub const ERROR_CODE_NOT_CONNECTED: &str = "2000";

/// Provider error code: malformed return period.
pub const ERROR_CODE_INVALID_PERIOD: &str = "100";

/// Longest body excerpt copied into an error message.
const BODY_EXCERPT_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
struct PullResponse {
    #[serde(rename = "jobId", alias = "job_id", default)]
    job_id: Option<serde_json::Value>,
}

/// Map a raw HTTP response onto a job id or a [`PullFailure`].
pub fn classify(response: &RawResponse, request: &PullRequest) -> PullOutcome {
    match response.status {
        200 => parse_job_id(&response.body),
        400 => Err(classify_bad_request(response, request)),
        401 => Err(PullFailure::Authentication(
            "check API credentials (HTTP 401)".to_string(),
        )),
        403 => Err(PullFailure::Authentication(
            "access denied - check company permissions (HTTP 403)".to_string(),
        )),
        429 => Err(PullFailure::RateLimited),
        status if (500..600).contains(&status) => Err(PullFailure::Server(status)),
        status => Err(PullFailure::Unknown(format!(
            "HTTP {}: {}",
            status,
            excerpt(&response.body)
        ))),
    }
}

/// Map a transport failure onto a [`PullFailure`].
pub fn classify_transport(error: &TransportError) -> PullFailure {
    match error {
        TransportError::Timeout => PullFailure::Timeout,
        TransportError::Connect(msg) => PullFailure::Connection(msg.clone()),
        TransportError::Other(msg) => PullFailure::Connection(msg.clone()),
    }
}

fn parse_job_id(body: &str) -> Result<JobId, PullFailure> {
    let parsed: PullResponse = serde_json::from_str(body)
        .map_err(|_| PullFailure::Unknown("invalid JSON response".to_string()))?;

    match parsed.job_id {
        Some(serde_json::Value::String(id)) if !id.trim().is_empty() => Ok(id),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(PullFailure::Unknown("no job ID in response".to_string())),
    }
}

fn classify_bad_request(response: &RawResponse, request: &PullRequest) -> PullFailure {
    let code = response.error_code.as_deref().unwrap_or("Unknown");
    let message = response.error_message.as_deref().unwrap_or("Bad Request");

    match code {
        ERROR_CODE_NOT_CONNECTED => PullFailure::NotConnected {
            gstin: request.body.gstin.clone(),
        },
        ERROR_CODE_INVALID_PERIOD => PullFailure::Validation(format!(
            "invalid period format: {}",
            request.body.return_period
        )),
        _ => PullFailure::Unknown(format!("Error {code}: {message}")),
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
