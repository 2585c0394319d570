//! Tracing setup
//!
//! Console output follows `LOG_FORMAT` (`json` for structured lines, plain
//! text otherwise). Every run also gets a plain-text log file under the log
//! directory so a finished run can be audited after the console is gone.

use chrono::{DateTime, Local};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Tracing target of this crate, used in filter directives.
pub const CRATE_TARGET: &str = "gstr2a_puller";

/// Log file name for a run started at `at`.
pub fn log_file_name(at: DateTime<Local>) -> String {
    format!("gstr2a_puller_{}.log", at.format("%Y%m%d_%H%M%S"))
}

/// Whether `LOG_FORMAT=json` is set.
pub fn json_requested() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Filter from `RUST_LOG` if set, else `gstr2a_puller=<level>`.
///
/// An unparseable level falls back to `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{CRATE_TARGET}={}", level.trim().to_lowercase())))
        .unwrap_or_else(|_| EnvFilter::new(format!("{CRATE_TARGET}=info")))
}

/// Console-only tracing for commands that do not write a log file.
pub fn init_console(level: &str) {
    let filter = env_filter(level);
    if json_requested() {
        let _ = tracing_subscriber::fmt().json().with_env_filter(filter).try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

/// Install console and file logging. Returns the log file path.
pub fn init_tracing(level: &str, log_dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(log_file_name(Local::now()));
    let file = File::create(&path)?;

    let console = if json_requested() {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    tracing::info!("Logging to {}", path.display());
    Ok(path)
}
