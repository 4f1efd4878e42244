//! Audit log setup.
//!
//! Progress lines and diagnostics are written to a single log file that is
//! truncated at the start of every run.

use std::fs::File;
use std::path::Path;

use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

use crate::error::{SetupError, SetupResult};

/// Install the global `tracing` subscriber writing to `path`.
///
/// `default_filter` is used when `RUST_LOG` is unset. The returned guard
/// must be held until the process exits so buffered lines are flushed.
pub fn init_file_logging(path: &Path, default_filter: &str) -> SetupResult<WorkerGuard> {
    let file = File::create(path).map_err(|e| SetupError::LoggingInit {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| SetupError::LoggingInit {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(timer)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| SetupError::LoggingInit {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(guard)
}
