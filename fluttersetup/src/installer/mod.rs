//! Flutter installer with per-platform fallback chains.
//!
//! Each platform tries its install strategies strictly in order and stops
//! at the first success:
//!
//! ```text
//! Windows:  winget ──fail──► Chocolatey ──fail──► manual download
//! Linux:    snap   ──fail──────────────────────► manual download
//! macOS:    brew   ──fail──────────────────────► manual download
//! ```
//!
//! A failing package-manager command moves the chain forward. The manual
//! download is the last resort; any error inside it ends the chain and is
//! returned to the caller.

mod unix;
mod windows;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::command::{CommandRunner, CommandSpec, SystemCommandRunner};
use crate::config::SetupConfig;
use crate::download::{verify_checksum, ArtifactDownloader, HttpDownloader};
use crate::environment::sdk_bin_dir;
use crate::error::SetupResult;
use crate::extractor::{ArchiveExtractor, NativeExtractor};
use crate::platform::Platform;
use crate::progress::Reporter;
use crate::release::{HttpReleaseResolver, ReleaseSource};

/// Position in a platform's fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    TryPrimary,
    TrySecondary,
    TryManual,
}

/// How Flutter ended up installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Winget,
    Chocolatey,
    Homebrew,
    Snap,
    ManualDownload,
}

impl Strategy {
    /// Name used in progress messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Winget => "winget",
            Self::Chocolatey => "Chocolatey",
            Self::Homebrew => "Homebrew",
            Self::Snap => "snap",
            Self::ManualDownload => "manual download",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a successful installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// The strategy that succeeded.
    pub strategy: Strategy,
    /// Directory added to PATH, for manual installs.
    pub sdk_bin_dir: Option<PathBuf>,
}

impl InstallOutcome {
    fn package_manager(strategy: Strategy) -> Self {
        Self {
            strategy,
            sdk_bin_dir: None,
        }
    }

    fn manual(bin_dir: PathBuf) -> Self {
        Self {
            strategy: Strategy::ManualDownload,
            sdk_bin_dir: Some(bin_dir),
        }
    }
}

/// Installs Flutter using the fallback chain of the target platform.
pub struct FlutterInstaller {
    config: SetupConfig,
    runner: Box<dyn CommandRunner>,
    releases: Box<dyn ReleaseSource>,
    downloader: Box<dyn ArtifactDownloader>,
    extractor: Box<dyn ArchiveExtractor>,
}

impl FlutterInstaller {
    /// Create an installer backed by system commands and the HTTP release feed.
    pub fn new(config: SetupConfig) -> SetupResult<Self> {
        let releases = HttpReleaseResolver::new(config.clone())?;
        let downloader = HttpDownloader::new(&config)?;
        Ok(Self::with_components(
            config,
            Box::new(SystemCommandRunner::new()),
            Box::new(releases),
            Box::new(downloader),
            Box::new(NativeExtractor::new()),
        ))
    }

    /// Create an installer from explicit components.
    pub fn with_components(
        config: SetupConfig,
        runner: Box<dyn CommandRunner>,
        releases: Box<dyn ReleaseSource>,
        downloader: Box<dyn ArtifactDownloader>,
        extractor: Box<dyn ArchiveExtractor>,
    ) -> Self {
        Self {
            config,
            runner,
            releases,
            downloader,
            extractor,
        }
    }

    /// The configuration this installer runs with.
    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// Run the fallback chain for `platform`.
    pub fn install(&self, platform: Platform, reporter: &Reporter) -> SetupResult<InstallOutcome> {
        match platform {
            Platform::Windows => windows::install(self, reporter),
            Platform::Linux | Platform::MacOs => unix::install(self, platform, reporter),
        }
    }

    /// Try one package-manager strategy. Returns `true` when it succeeded.
    fn try_package_manager(
        &self,
        strategy: Strategy,
        command: &CommandSpec,
        reporter: &Reporter,
    ) -> bool {
        let result = self.runner.run(command, reporter);
        tracing::debug!(%strategy, status = ?result.status, "Package manager attempt finished");
        if result.is_success() {
            reporter.log(format!("Flutter installed via {}.", strategy));
        }
        result.is_success()
    }

    /// Resolve, download, verify and extract the latest stable release.
    ///
    /// # Returns
    ///
    /// The SDK `bin` directory inside `install_dir`.
    fn install_manual(
        &self,
        platform: Platform,
        install_dir: &Path,
        reporter: &Reporter,
    ) -> SetupResult<PathBuf> {
        let release = self.releases.latest_stable(platform, reporter)?;

        let staging = self.config.create_run_staging_dir()?;
        tracing::debug!(dir = %staging.display(), "Created staging directory");

        let archive = self.downloader.download_verified(
            &release.download_url,
            &release.sha256,
            &staging,
            reporter,
        )?;

        // The extractor reopens the archive by path; it must still be the verified file.
        verify_checksum(&archive, &release.sha256)?;

        reporter.log(format!(
            "Extracting {} to {}",
            archive.display(),
            install_dir.display()
        ));
        let files = self.extractor.extract(&archive, install_dir)?;
        reporter.log("Extraction complete");
        tracing::info!(version = %release.version, files, dir = %install_dir.display(), "Flutter SDK extracted");

        Ok(sdk_bin_dir(install_dir))
    }
}

impl fmt::Debug for FlutterInstaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlutterInstaller")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::Winget.to_string(), "winget");
        assert_eq!(Strategy::Chocolatey.to_string(), "Chocolatey");
        assert_eq!(Strategy::Snap.to_string(), "snap");
        assert_eq!(Strategy::ManualDownload.name(), "manual download");
    }

    #[test]
    fn test_outcome_constructors() {
        let pm = InstallOutcome::package_manager(Strategy::Homebrew);
        assert!(pm.sdk_bin_dir.is_none());

        let manual = InstallOutcome::manual(PathBuf::from("/home/dev/flutter/bin"));
        assert_eq!(manual.strategy, Strategy::ManualDownload);
        assert_eq!(
            manual.sdk_bin_dir,
            Some(PathBuf::from("/home/dev/flutter/bin"))
        );
    }

    #[test]
    fn test_default_installer_builds() {
        let installer = FlutterInstaller::new(SetupConfig::default()).unwrap();
        assert!(format!("{:?}", installer).contains("FlutterInstaller"));
    }
}
