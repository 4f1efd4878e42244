//! Error types for Flutter setup.
//!
//! Every failure the installer can surface is one variant of [`SetupError`],
//! and every variant belongs to exactly one [`ErrorKind`]. The setup session
//! is the single place where errors are turned into user-facing text.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;

/// Broad classification of setup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A system command required by the installer failed.
    Command,
    /// Fetching or decoding remote data failed.
    Network,
    /// A downloaded artifact did not match its published checksum.
    Integrity,
    /// Reading, writing or extracting local files failed.
    Filesystem,
}

impl ErrorKind {
    /// Message shown to the user when a setup run ends with this kind of error.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Command => "Setup could not run a required system command",
            Self::Network => "Setup could not retrieve the Flutter release",
            Self::Integrity => "The downloaded Flutter archive failed verification",
            Self::Filesystem => "Setup could not write the Flutter installation",
        }
    }
}

/// Errors that can occur while installing Flutter.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A command exited unsuccessfully where no fallback exists.
    #[error("command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// The release manifest could not be fetched.
    #[error("failed to fetch release manifest from {url}: {reason}")]
    ManifestFetchFailed { url: String, reason: String },

    /// The release manifest could not be decoded.
    #[error("failed to parse release manifest from {url}: {reason}")]
    ManifestParseFailed { url: String, reason: String },

    /// The release manifest has no stable entry.
    #[error("no stable release listed in {url}")]
    NoStableRelease { url: String },

    /// The archive download failed in transit.
    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Checksum verification failed.
    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or directory.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Archive extraction failed.
    #[error("failed to extract {}: {reason}", .path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// The archive format could not be determined.
    #[error("unsupported archive format: {}", .path.display())]
    UnsupportedArchive { path: PathBuf },

    /// The user's home directory could not be determined.
    #[error("home directory could not be determined")]
    HomeDirUnavailable,

    /// The audit log could not be opened.
    #[error("failed to initialise logging at {}: {reason}", .path.display())]
    LoggingInit { path: PathBuf, reason: String },
}

impl SetupError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CommandFailed { .. } => ErrorKind::Command,
            Self::HttpClient(_)
            | Self::ManifestFetchFailed { .. }
            | Self::ManifestParseFailed { .. }
            | Self::NoStableRelease { .. }
            | Self::DownloadFailed { .. } => ErrorKind::Network,
            Self::ChecksumMismatch { .. } => ErrorKind::Integrity,
            Self::ReadFailed { .. }
            | Self::WriteFailed { .. }
            | Self::CreateDirFailed { .. }
            | Self::ExtractionFailed { .. }
            | Self::UnsupportedArchive { .. }
            | Self::HomeDirUnavailable
            | Self::LoggingInit { .. } => ErrorKind::Filesystem,
        }
    }

    /// One-line message for the progress log: kind headline plus details.
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.kind().headline(), self)
    }
}
