//! Linux and macOS chain: system package manager, then manual download.

use super::{ChainState, FlutterInstaller, InstallOutcome, Strategy};
use crate::command::CommandSpec;
use crate::environment::append_shell_export;
use crate::error::SetupResult;
use crate::platform::Platform;
use crate::progress::Reporter;

fn primary(platform: Platform) -> (Strategy, CommandSpec) {
    match platform {
        Platform::MacOs => (
            Strategy::Homebrew,
            CommandSpec::new("brew").args(["install", "--cask", "flutter"]),
        ),
        _ => (
            Strategy::Snap,
            CommandSpec::new("sudo").args(["snap", "install", "flutter", "--classic"]),
        ),
    }
}

pub(super) fn install(
    installer: &FlutterInstaller,
    platform: Platform,
    reporter: &Reporter,
) -> SetupResult<InstallOutcome> {
    let mut state = ChainState::TryPrimary;

    loop {
        tracing::debug!(?state, %platform, "Unix install chain");
        state = match state {
            ChainState::TryPrimary => {
                let (strategy, command) = primary(platform);
                if installer.try_package_manager(strategy, &command, reporter) {
                    return Ok(InstallOutcome::package_manager(strategy));
                }
                reporter.log(format!(
                    "{} install failed; attempting manual download",
                    strategy
                ));
                ChainState::TryManual
            }
            // No secondary package manager on these platforms.
            ChainState::TrySecondary => ChainState::TryManual,
            ChainState::TryManual => {
                let config = &installer.config;
                let home = config.resolve_home()?;
                let install_dir = config.resolve_unix_install_dir()?;
                let startup_file = config.resolve_shell_startup_file()?;

                let bin_dir = installer.install_manual(platform, &install_dir, reporter)?;
                append_shell_export(&startup_file, &bin_dir, &home)?;
                reporter.log(format!(
                    "Added Flutter to PATH in {}",
                    startup_file.display()
                ));
                reporter.log("Manual installation completed; reload your shell to use flutter.");
                return Ok(InstallOutcome::manual(bin_dir));
            }
        };
    }
}
