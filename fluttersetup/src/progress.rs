//! Progress reporting for setup runs.
//!
//! A [`Reporter`] is built once per run and passed by reference to every
//! component. Each line it receives is forwarded to all of its sinks: the
//! audit log (through `tracing`), the UI channel, or an in-memory buffer in
//! tests.
//!
//! ```text
//! components ──► Reporter ──┬──► TracingSink ──► flutter_setup.log
//!                           ├──► ChannelSink ──► UI thread (mpsc)
//!                           └──► MemorySink  ──► tests
//! ```

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::session::SessionOutcome;

/// Destination for human-readable progress lines.
pub trait ProgressSink: Send + Sync {
    /// Accept one line of progress output.
    fn emit(&self, line: &str);
}

/// Events sent from the setup worker to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A progress line to append to the log view.
    Line(String),
    /// The setup run has ended.
    Finished(SessionOutcome),
}

/// Fan-out reporter handed to every setup component.
#[derive(Clone, Default)]
pub struct Reporter {
    sinks: Vec<Arc<dyn ProgressSink>>,
}

impl Reporter {
    /// Create a reporter with no sinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn with_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add a shared sink, keeping a handle for the caller.
    pub fn with_shared_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Report one progress line.
    pub fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        for sink in &self.sinks {
            sink.emit(message);
        }
    }

    /// Report captured command output as one trimmed entry; blank output is skipped.
    pub fn log_output(&self, output: &str) {
        let trimmed = output.trim();
        if !trimmed.is_empty() {
            self.log(trimmed);
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// Writes progress lines to the `tracing` pipeline (the audit log file).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "fluttersetup::progress", "{}", line);
    }
}

/// Sends progress lines to the UI thread.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<ProgressEvent>,
}

impl ChannelSink {
    /// Wrap the sending half of the UI channel.
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, line: &str) {
        // A closed receiver means the UI has gone away; the audit log still has the line.
        let _ = self.sender.send(ProgressEvent::Line(line.to_string()));
    }
}

/// Collects progress lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Number of received lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl ProgressSink for MemorySink {
    fn emit(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
