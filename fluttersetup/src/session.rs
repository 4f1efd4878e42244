//! Setup session: one complete run of the installer.
//!
//! The session is the single place where chain errors are handled. Each
//! error is logged once as `<headline>: <details>` and the run ends; nothing
//! is rolled back.
//!
//! [`SetupWorker`] runs a session on a background thread. The worker talks
//! to the UI only through the reporter's channel sink and a final
//! [`ProgressEvent::Finished`]; the UI drains the channel from its own loop.

use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::ErrorKind;
use crate::installer::{FlutterInstaller, Strategy};
use crate::platform::Platform;
use crate::progress::{ProgressEvent, Reporter};

/// Line that closes every session.
pub const SESSION_COMPLETE: &str = "Setup complete. Review log for details.";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Flutter was installed by the given strategy.
    Installed(Strategy),
    /// The chain ended with an error of the given kind.
    Failed(ErrorKind),
    /// The host OS has no automated install chain.
    UnsupportedPlatform,
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

/// Run the install chain for the OS named `os` (an `std::env::consts::OS` value).
pub fn run_session(installer: &FlutterInstaller, os: &str, reporter: &Reporter) -> SessionOutcome {
    let outcome = match Platform::from_os(os) {
        None => {
            reporter.log(format!("Detected platform: {}", os));
            reporter.log("Unsupported OS for automated setup. Please install Flutter manually.");
            SessionOutcome::UnsupportedPlatform
        }
        Some(platform) => {
            reporter.log(format!("Detected platform: {}", platform));
            match installer.install(platform, reporter) {
                Ok(outcome) => {
                    tracing::info!(strategy = %outcome.strategy, "Flutter setup succeeded");
                    SessionOutcome::Installed(outcome.strategy)
                }
                Err(e) => {
                    tracing::error!(kind = ?e.kind(), error = %e, "Flutter setup failed");
                    reporter.log(e.user_message());
                    SessionOutcome::Failed(e.kind())
                }
            }
        }
    };

    reporter.log(SESSION_COMPLETE);
    outcome
}

/// Handle to a session running on a background thread.
#[derive(Debug)]
pub struct SetupWorker {
    handle: JoinHandle<SessionOutcome>,
}

impl SetupWorker {
    /// Start a session on a new thread.
    ///
    /// `reporter` should include a sink feeding `events`; the worker adds a
    /// [`ProgressEvent::Finished`] once the session ends.
    pub fn spawn(
        installer: Arc<FlutterInstaller>,
        os: impl Into<String>,
        reporter: Reporter,
        events: Sender<ProgressEvent>,
    ) -> io::Result<Self> {
        let os = os.into();
        let handle = thread::Builder::new()
            .name("flutter-setup-worker".to_string())
            .spawn(move || {
                let outcome = run_session(&installer, &os, &reporter);
                let _ = events.send(ProgressEvent::Finished(outcome));
                outcome
            })?;

        Ok(Self { handle })
    }

    /// Whether the session has ended.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the session to end. `None` if the worker panicked.
    pub fn join(self) -> Option<SessionOutcome> {
        self.handle.join().ok()
    }
}
