//! Terminal UI for the setup log viewer.

mod log_view;
mod state;
mod terminal;

pub use log_view::LogView;
pub use state::{LogViewState, Phase};
pub use terminal::TerminalGuard;
