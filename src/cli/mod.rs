//! CLI command implementations

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    Credentials, PullConfig, DEFAULT_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_PULL_DELAY_SECS,
    DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY_SECS, DEFAULT_TIMEOUT_SECS, MAX_RETRY_COUNT,
};

pub mod error;
pub mod prompt;
pub mod pull;
pub mod validate;

pub use error::CliError;
pub use pull::{PullCommand, PullJob, PullReport};
pub use validate::ValidateCommand;

/// GSTR-2A bulk puller CLI
#[derive(Parser, Debug)]
#[command(name = "gstr2a-puller")]
#[command(about = "Request GSTR-2A pulls from OCTA GST for many companies and months", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// OCTA API key
    #[arg(long, global = true, env = "OCTA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OCTA API secret
    #[arg(long, global = true, env = "OCTA_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// API root URL
    #[arg(long, global = true, env = "OCTA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Total attempts per pull, first try included (range: 1-20)
    #[arg(long, global = true, default_value_t = DEFAULT_RETRY_COUNT,
          value_parser = clap::value_parser!(u32).range(1..=MAX_RETRY_COUNT as i64))]
    pub retry_count: u32,

    /// Seconds to wait between attempts of one pull
    #[arg(long, global = true, default_value_t = DEFAULT_RETRY_DELAY_SECS)]
    pub retry_delay_secs: u64,

    /// Seconds to wait between consecutive pulls
    #[arg(long, global = true, default_value_t = DEFAULT_PULL_DELAY_SECS)]
    pub pull_delay_secs: u64,

    /// Log level for this tool (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "GSTR2A_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Directory searched for input spreadsheets
    #[arg(long, global = true, default_value = "input")]
    pub input_dir: PathBuf,

    /// Directory result files are written to
    #[arg(long, global = true, default_value = "output")]
    pub output_dir: PathBuf,

    /// Directory per-run log files are written to
    #[arg(long, global = true, default_value = "logs")]
    pub log_dir: PathBuf,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Request GSTR-2A pulls for every company and period
    Pull(PullCommand),

    /// Check a GSTIN or an input file without calling the API
    Validate(ValidateCommand),
}

impl Cli {
    /// Build the run configuration from global flags.
    pub fn to_config(&self) -> PullConfig {
        PullConfig {
            credentials: Credentials::new(
                self.api_key.clone().unwrap_or_default(),
                self.api_secret.clone().unwrap_or_default(),
            ),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            retry_count: self.retry_count,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            pull_delay: Duration::from_secs(self.pull_delay_secs),
            log_level: self.log_level.clone(),
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}
