//! CLI error type.

use std::fmt;
use std::io;

use fluttersetup::SetupError;

/// Errors that end the CLI before or outside a setup session.
///
/// Failures inside a session are reported in the progress log instead.
#[derive(Debug)]
pub enum CliError {
    /// Library setup failed (logging, HTTP client).
    Setup(SetupError),
    /// The terminal could not be prepared, drawn or read.
    Terminal(io::Error),
    /// The setup worker thread could not be started.
    Worker(io::Error),
    /// The setup worker thread panicked.
    WorkerPanicked,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Setup(e) => write!(f, "{}", e),
            CliError::Terminal(e) => write!(f, "Terminal error: {}", e),
            CliError::Worker(e) => write!(f, "Failed to start setup worker: {}", e),
            CliError::WorkerPanicked => write!(f, "Setup worker stopped unexpectedly"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Setup(e) => Some(e),
            CliError::Terminal(e) | CliError::Worker(e) => Some(e),
            CliError::WorkerPanicked => None,
        }
    }
}

impl From<SetupError> for CliError {
    fn from(e: SetupError) -> Self {
        CliError::Setup(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Terminal(e)
    }
}
