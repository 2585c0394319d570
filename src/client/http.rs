//! HTTP transport for the pull endpoint
//!
//! The transport performs exactly one request per call; retry policy lives
//! in [`super::octa::OctaClient`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::ClientError;
use crate::config::PullConfig;

/// Header carrying the target company id.
pub const COMPANY_HEADER: &str = "Octa-Company";

/// Header carrying the provider's numeric error code on 400 responses.
pub const ERROR_CODE_HEADER: &str = "Octa-ErrorCode";

/// Header carrying the provider's error text on 400 responses.
pub const ERROR_MESSAGE_HEADER: &str = "Octa-ErrorMessage";

/// JSON body of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullBody {
    /// GSTIN to pull for
    pub gstin: String,
    /// `YYYY-MM`
    #[serde(rename = "returnPeriod")]
    pub return_period: String,
}

/// One pull request as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Value of the `Octa-Company` header
    pub company_id: String,
    /// JSON body
    pub body: PullBody,
}

/// The parts of an HTTP response the classifier needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// `Octa-ErrorCode` header
    pub error_code: Option<String>,
    /// `Octa-ErrorMessage` header
    pub error_message: Option<String>,
    /// Response body text
    pub body: String,
}

impl RawResponse {
    /// Response with status and body only
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            ..Self::default()
        }
    }

    /// Attach provider error headers
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self.error_message = Some(message.into());
        self
    }
}

/// Failures below HTTP: no response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Timed out
    #[error("request timeout")]
    Timeout,

    /// Could not connect
    #[error("connection error: {0}")]
    Connect(String),

    /// Anything else reqwest reports
    #[error("request failed: {0}")]
    Other(String),
}

/// Sends a single pull request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request and return the raw response.
    async fn send(&self, request: &PullRequest) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport with basic auth.
pub struct HttpTransport {
    client: Client,
    url: String,
    api_key: String,
    api_secret: String,
}

impl HttpTransport {
    /// Build a transport from the run configuration.
    pub fn new(config: &PullConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("gstr2a-puller/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            url: config.pull_url(),
            api_key: config.credentials.api_key.clone(),
            api_secret: config.credentials.api_secret.clone(),
        })
    }

    /// Endpoint this transport posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &PullRequest) -> Result<RawResponse, TransportError> {
        debug!(
            "POST {} company={} gstin={} period={}",
            self.url, request.company_id, request.body.gstin, request.body.return_period
        );

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header(COMPANY_HEADER, &request.company_id)
            .json(&request.body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let error_code = header(ERROR_CODE_HEADER);
        let error_message = header(ERROR_MESSAGE_HEADER);

        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!("Response status {} ({} bytes)", status, body.len());

        Ok(RawResponse {
            status,
            error_code,
            error_message,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
