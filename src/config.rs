//! Run configuration
//!
//! Every knob the client and the pull loop need lives in [`PullConfig`],
//! built once at startup and passed down explicitly.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// OCTA GST API root.
pub const DEFAULT_BASE_URL: &str = "https://app.octagst.com/api";

/// Path of the GSTR-2A pull endpoint below the API root.
pub const PULL_ENDPOINT: &str = "/gstr2a/pull";

/// Per-request network timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Total attempts per pull, first try included.
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Upper bound accepted for the retry count.
pub const MAX_RETRY_COUNT: u32 = 20;

/// Sleep between attempts of one pull.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Sleep between consecutive (company, period) pulls.
pub const DEFAULT_PULL_DELAY_SECS: u64 = 1;

/// Default tracing verbosity for this crate.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Credentials shorter than this are treated as unconfigured.
const MIN_CREDENTIAL_LEN: usize = 10;

const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "NOT_CONFIGURED",
    "YOUR_API_KEY_HERE",
    "YOUR_API_SECRET_HERE",
];

/// API key/secret pair used for HTTP basic auth.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// OCTA API key
    pub api_key: String,
    /// OCTA API secret
    pub api_secret: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Reject empty, too short, or template placeholder values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("API key", &self.api_key), ("API secret", &self.api_secret)] {
            let value = value.trim();
            if value.len() < MIN_CREDENTIAL_LEN || PLACEHOLDER_CREDENTIALS.contains(&value) {
                return Err(ConfigError::MissingCredentials(name));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{visible}***")
}

/// Configuration shared by the remote client and the pull loop.
#[derive(Debug, Clone)]
pub struct PullConfig {
    /// API credentials
    pub credentials: Credentials,
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Total attempts per pull (at least 1)
    pub retry_count: u32,
    /// Sleep between attempts of one pull
    pub retry_delay: Duration,
    /// Sleep between consecutive pulls
    pub pull_delay: Duration,
    /// Tracing level for this crate
    pub log_level: String,
    /// Where input spreadsheets are looked up
    pub input_dir: PathBuf,
    /// Where result workbooks are written
    pub output_dir: PathBuf,
    /// Where per-run log files are written
    pub log_dir: PathBuf,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            pull_delay: Duration::from_secs(DEFAULT_PULL_DELAY_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl PullConfig {
    /// Full URL of the pull endpoint.
    pub fn pull_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PULL_ENDPOINT)
    }

    /// Retry count clamped to at least one attempt.
    pub fn attempts(&self) -> u32 {
        self.retry_count.clamp(1, MAX_RETRY_COUNT)
    }

    /// Check everything a pull run needs before touching the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credentials.validate()?;

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue("timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Credential missing or still a placeholder
    #[error("{0} not configured: set OCTA_API_KEY / OCTA_API_SECRET or pass --api-key / --api-secret")]
    MissingCredentials(&'static str),

    /// Out-of-range or malformed option
    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}
