//! Windows chain: winget, then Chocolatey, then manual download.

use super::{ChainState, FlutterInstaller, InstallOutcome, Strategy};
use crate::command::CommandSpec;
use crate::environment::persist_user_path;
use crate::error::SetupResult;
use crate::platform::Platform;
use crate::progress::Reporter;

/// Official Chocolatey bootstrap, run when `choco` is not on PATH.
const CHOCOLATEY_BOOTSTRAP: &str = "Set-ExecutionPolicy Bypass -Scope Process -Force;\
[System.Net.ServicePointManager]::SecurityProtocol = [System.Net.SecurityProtocolType]::Tls12;\
iex ((New-Object System.Net.WebClient).DownloadString('https://community.chocolatey.org/install.ps1'))";

fn winget_install() -> CommandSpec {
    CommandSpec::new("winget").args(["install", "-e", "--id=Flutter.Flutter"])
}

fn chocolatey_install() -> CommandSpec {
    CommandSpec::new("choco").args(["install", "flutter", "--pre", "-y"])
}

fn chocolatey_bootstrap() -> CommandSpec {
    CommandSpec::new("powershell")
        .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"])
        .arg(CHOCOLATEY_BOOTSTRAP)
}

pub(super) fn install(
    installer: &FlutterInstaller,
    reporter: &Reporter,
) -> SetupResult<InstallOutcome> {
    let mut state = ChainState::TryPrimary;

    loop {
        tracing::debug!(?state, "Windows install chain");
        state = match state {
            ChainState::TryPrimary => {
                if installer.try_package_manager(Strategy::Winget, &winget_install(), reporter) {
                    return Ok(InstallOutcome::package_manager(Strategy::Winget));
                }
                reporter.log("winget install failed; attempting Chocolatey");
                ChainState::TrySecondary
            }
            ChainState::TrySecondary => {
                if !installer.runner.is_available("choco") {
                    // A failed bootstrap surfaces as a failed `choco install` below.
                    installer.runner.run(&chocolatey_bootstrap(), reporter);
                }
                if installer.try_package_manager(
                    Strategy::Chocolatey,
                    &chocolatey_install(),
                    reporter,
                ) {
                    return Ok(InstallOutcome::package_manager(Strategy::Chocolatey));
                }
                reporter.log("Chocolatey install failed; attempting manual download");
                ChainState::TryManual
            }
            ChainState::TryManual => {
                let root = installer.config.windows_install_root.clone();
                let bin_dir = installer.install_manual(Platform::Windows, &root, reporter)?;
                persist_user_path(installer.runner.as_ref(), &bin_dir, reporter)?;
                reporter.log("Manual installation completed; please restart terminal to use flutter.");
                return Ok(InstallOutcome::manual(bin_dir));
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manager_commands() {
        assert_eq!(
            winget_install().to_string(),
            "winget install -e --id=Flutter.Flutter"
        );
        assert_eq!(
            chocolatey_install().to_string(),
            "choco install flutter --pre -y"
        );
    }

    #[test]
    fn test_bootstrap_downloads_official_script() {
        let command = chocolatey_bootstrap();
        assert_eq!(command.program(), "powershell");
        let script = command.arguments().last().unwrap();
        assert!(script.contains("https://community.chocolatey.org/install.ps1"));
        assert!(script.starts_with("Set-ExecutionPolicy Bypass -Scope Process -Force;"));
    }
}
