//! Flutter setup CLI
//!
//! Installs the Flutter SDK on the current machine. In a terminal the setup
//! runs behind a log viewer with a start button; elsewhere (or with
//! `--headless`) it starts immediately and prints progress to stdout.

mod error;
mod headless;
mod tui_app;
mod ui;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fluttersetup::config::DEFAULT_LOG_FILE;
use fluttersetup::logging::init_file_logging;
use fluttersetup::{FlutterInstaller, SetupConfig};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "flutter-setup")]
#[command(version = fluttersetup::VERSION)]
#[command(about = "Install the Flutter SDK using the best available method", long_about = None)]
struct Cli {
    /// Run without the interactive log viewer
    #[arg(long)]
    headless: bool,

    /// Audit log file, overwritten on each run
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,

    /// HTTP timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

impl Cli {
    fn setup_config(&self) -> SetupConfig {
        let config = SetupConfig::new().with_log_file(self.log_file.clone());
        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    fn interactive(&self) -> bool {
        !self.headless && atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stdin)
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, CliError> {
    let config = cli.setup_config();
    let _log_guard = init_file_logging(&config.log_file, &cli.log_level)?;
    tracing::info!(
        version = fluttersetup::VERSION,
        log_file = %config.log_file.display(),
        "flutter-setup starting"
    );

    let installer = Arc::new(FlutterInstaller::new(config)?);

    if cli.interactive() {
        tui_app::run_tui(installer)?;
        Ok(0)
    } else {
        let outcome = headless::run_headless(installer, std::env::consts::OS)?;
        Ok(if outcome.is_success() { 0 } else { 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_plain_run() {
        let cli = Cli::parse_from(["flutter-setup"]);
        assert!(!cli.headless);
        assert_eq!(cli.log_file, PathBuf::from("flutter_setup.log"));
        assert_eq!(cli.log_level, "info");

        let config = cli.setup_config();
        assert!(config.timeout.is_none());
        assert_eq!(config.log_file, PathBuf::from("flutter_setup.log"));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "flutter-setup",
            "--headless",
            "--log-file",
            "/tmp/setup.log",
            "--log-level",
            "debug",
            "--timeout",
            "30",
        ]);
        assert!(cli.headless);
        assert!(!cli.interactive());

        let config = cli.setup_config();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.log_file, PathBuf::from("/tmp/setup.log"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
