//! Log viewer state.

use std::ops::Range;

use fluttersetup::{ProgressEvent, SessionOutcome};

/// First line shown before any session has run.
pub const WELCOME_LINE: &str = "Press Enter to start Flutter setup.";

/// Where the viewer is in its session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished(SessionOutcome),
}

/// Lines received so far plus scroll position and run phase.
///
/// `scroll_back` counts lines above the tail; zero means the view follows
/// new output.
#[derive(Debug, Clone)]
pub struct LogViewState {
    lines: Vec<String>,
    scroll_back: usize,
    phase: Phase,
}

impl Default for LogViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl LogViewState {
    pub fn new() -> Self {
        Self {
            lines: vec![WELCOME_LINE.to_string()],
            scroll_back: 0,
            phase: Phase::Idle,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Whether the start button accepts input.
    pub fn can_start(&self) -> bool {
        !self.is_running()
    }

    /// Enter the running phase. Returns `false` if a run is already active.
    pub fn start(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// Apply an event from the worker channel.
    pub fn apply(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Line(line) => self.push_line(line),
            ProgressEvent::Finished(outcome) => self.phase = Phase::Finished(outcome),
        }
    }

    pub fn push_line(&mut self, line: String) {
        self.lines.push(line);
        // Keep a scrolled-back view anchored on the same lines.
        if self.scroll_back > 0 {
            self.scroll_back += 1;
        }
    }

    pub fn scroll_up(&mut self, amount: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_back = (self.scroll_back + amount).min(max);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(amount);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_back = self.lines.len().saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }

    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    /// Indices of the lines visible in a pane `height` rows tall.
    pub fn visible_range(&self, height: usize) -> Range<usize> {
        let total = self.lines.len();
        let max_back = total.saturating_sub(height);
        let end = total - self.scroll_back.min(max_back);
        end.saturating_sub(height)..end
    }

    /// Short status text for the footer.
    pub fn status_text(&self) -> &'static str {
        match self.phase {
            Phase::Idle => "Ready",
            Phase::Running => "Running...",
            Phase::Finished(outcome) if outcome.is_success() => "Finished",
            Phase::Finished(_) => "Finished with errors",
        }
    }
}
