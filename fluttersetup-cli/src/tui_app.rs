//! Interactive log viewer application.
//!
//! The UI thread owns the terminal and the [`LogViewState`]. Pressing the
//! start button spawns a [`SetupWorker`]; its progress arrives over an mpsc
//! channel that the event loop drains with `try_recv` before every draw, so
//! the worker never touches the terminal.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use fluttersetup::{
    ChannelSink, FlutterInstaller, ProgressEvent, Reporter, SetupWorker, TracingSink,
};

use crate::error::CliError;
use crate::ui::{LogView, LogViewState, TerminalGuard};

const TICK_RATE: Duration = Duration::from_millis(50);

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    None,
    Start,
    Quit,
}

/// Map a key to a state change or loop action. `page` is the log pane height.
fn handle_key(code: KeyCode, state: &mut LogViewState, page: usize) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Enter | KeyCode::Char('s') if state.start() => KeyAction::Start,
        KeyCode::Up => {
            state.scroll_up(1);
            KeyAction::None
        }
        KeyCode::Down => {
            state.scroll_down(1);
            KeyAction::None
        }
        KeyCode::PageUp => {
            state.scroll_up(page.max(1));
            KeyAction::None
        }
        KeyCode::PageDown => {
            state.scroll_down(page.max(1));
            KeyAction::None
        }
        KeyCode::Home => {
            state.scroll_to_top();
            KeyAction::None
        }
        KeyCode::End => {
            state.scroll_to_bottom();
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Move every pending worker event into the view state.
fn drain_events(rx: &Receiver<ProgressEvent>, state: &mut LogViewState) {
    loop {
        match rx.try_recv() {
            Ok(event) => state.apply(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
}

/// Run the log viewer until the user quits.
pub fn run_tui(installer: Arc<FlutterInstaller>) -> Result<(), CliError> {
    let mut guard = TerminalGuard::new()?;
    let (tx, rx) = mpsc::channel();
    let mut state = LogViewState::new();
    let mut worker: Option<SetupWorker> = None;

    loop {
        drain_events(&rx, &mut state);

        if worker.as_ref().is_some_and(SetupWorker::is_finished) {
            if let Some(finished) = worker.take() {
                let outcome = finished.join();
                tracing::debug!(?outcome, "Setup worker joined");
                if outcome.is_none() {
                    return Err(CliError::WorkerPanicked);
                }
            }
        }

        let mut page = 0;
        guard.terminal.draw(|frame| {
            let area = frame.area();
            // Borders plus the footer take five rows.
            page = area.height.saturating_sub(5) as usize;
            frame.render_widget(LogView::new(&state), area);
        })?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(key.code, &mut state, page) {
            KeyAction::Quit => break,
            KeyAction::Start => {
                tracing::info!("Setup started from log viewer");
                let reporter = Reporter::new()
                    .with_sink(TracingSink)
                    .with_sink(ChannelSink::new(tx.clone()));
                let spawned = SetupWorker::spawn(
                    Arc::clone(&installer),
                    std::env::consts::OS,
                    reporter,
                    tx.clone(),
                )
                .map_err(CliError::Worker)?;
                worker = Some(spawned);
            }
            KeyAction::None => {}
        }
    }

    if worker.is_some() {
        tracing::warn!("Log viewer closed while setup was still running");
    }
    Ok(())
}
