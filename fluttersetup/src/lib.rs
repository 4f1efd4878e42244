//! Flutter setup - installs the Flutter SDK with ordered fallbacks.
//!
//! This library provides the installer core: package-manager attempts, a
//! verified manual download from the Flutter release feed, extraction, and
//! PATH configuration. Progress is reported through an explicit
//! [`progress::Reporter`] passed to every component.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fluttersetup::{FlutterInstaller, MemorySink, Reporter, SetupConfig};
//!
//! let installer = FlutterInstaller::new(SetupConfig::default())?;
//! let sink = Arc::new(MemorySink::new());
//! let reporter = Reporter::new().with_shared_sink(sink.clone());
//!
//! let outcome = fluttersetup::run_session(&installer, std::env::consts::OS, &reporter);
//! println!("{:?}: {} lines", outcome, sink.lines().len());
//! ```

pub mod command;
pub mod config;
pub mod download;
pub mod environment;
pub mod error;
pub mod extractor;
pub mod http;
pub mod installer;
pub mod logging;
pub mod platform;
pub mod progress;
pub mod release;
pub mod session;

/// Crate version, shown by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::SetupConfig;
pub use error::{ErrorKind, SetupError, SetupResult};
pub use installer::{FlutterInstaller, InstallOutcome, Strategy};
pub use platform::Platform;
pub use progress::{ChannelSink, MemorySink, ProgressEvent, ProgressSink, Reporter, TracingSink};
pub use session::{run_session, SessionOutcome, SetupWorker};
