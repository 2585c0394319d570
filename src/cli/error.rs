//! CLI error types and conversions

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::identifier::GstinError;
use crate::input::InputError;
use crate::output::OutputError;
use crate::puller::PullError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Input file could not be used
    #[error("input error: {0}")]
    InputError(#[from] InputError),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// HTTP client could not be built
    #[error("client error: {0}")]
    ClientError(#[from] ClientError),

    /// Nothing to pull
    #[error("pull error: {0}")]
    PullError(#[from] PullError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Bad GSTIN
    #[error("GSTIN error: {0}")]
    GstinError(#[from] GstinError),

    /// Terminal IO failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// User quit at a prompt
    #[error("cancelled by user")]
    Cancelled,

    /// Ctrl+C stopped the run; partial results were written
    #[error("interrupted after {completed} of {planned} pulls")]
    Interrupted {
        /// Pairs attempted before the interrupt
        completed: usize,
        /// Pairs planned
        planned: usize,
    },
}
