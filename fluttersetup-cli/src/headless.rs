//! Headless mode for non-TTY environments.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use fluttersetup::{
    ChannelSink, FlutterInstaller, ProgressEvent, Reporter, SessionOutcome, SetupWorker,
    TracingSink,
};

use crate::error::CliError;

/// Run one session immediately, printing progress lines to stdout.
pub fn run_headless(installer: Arc<FlutterInstaller>, os: &str) -> Result<SessionOutcome, CliError> {
    let (tx, rx) = mpsc::channel();
    let reporter = Reporter::new()
        .with_sink(TracingSink)
        .with_sink(ChannelSink::new(tx.clone()));

    let worker = SetupWorker::spawn(installer, os, reporter, tx).map_err(CliError::Worker)?;

    let stdout = io::stdout();
    let printed = print_events(&rx, &mut stdout.lock())?;

    let outcome = worker.join().ok_or(CliError::WorkerPanicked)?;
    if printed.is_none() {
        tracing::warn!("Worker ended without a completion event");
    }
    Ok(outcome)
}

/// Print line events until the session finishes or the channel closes.
fn print_events(
    rx: &Receiver<ProgressEvent>,
    out: &mut impl Write,
) -> io::Result<Option<SessionOutcome>> {
    for event in rx.iter() {
        match event {
            ProgressEvent::Line(line) => {
                writeln!(out, "{}", line)?;
                out.flush()?;
            }
            ProgressEvent::Finished(outcome) => return Ok(Some(outcome)),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluttersetup::SetupConfig;

    #[test]
    fn test_print_events_stops_at_finished() {
        let (tx, rx) = mpsc::channel();
        tx.send(ProgressEvent::Line("one".to_string())).unwrap();
        tx.send(ProgressEvent::Line("two".to_string())).unwrap();
        tx.send(ProgressEvent::Finished(SessionOutcome::UnsupportedPlatform))
            .unwrap();
        tx.send(ProgressEvent::Line("after".to_string())).unwrap();

        let mut out = Vec::new();
        let outcome = print_events(&rx, &mut out).unwrap();

        assert_eq!(outcome, Some(SessionOutcome::UnsupportedPlatform));
        assert_eq!(String::from_utf8(out).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_print_events_closed_channel() {
        let (tx, rx) = mpsc::channel();
        tx.send(ProgressEvent::Line("only".to_string())).unwrap();
        drop(tx);

        let mut out = Vec::new();
        assert_eq!(print_events(&rx, &mut out).unwrap(), None);
    }

    #[test]
    fn test_headless_unsupported_platform() {
        let installer = Arc::new(FlutterInstaller::new(SetupConfig::default()).unwrap());
        let outcome = run_headless(installer, "plan9").unwrap();
        assert_eq!(outcome, SessionOutcome::UnsupportedPlatform);
    }
}
