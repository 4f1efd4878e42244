//! Configuration for Flutter setup.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{SetupError, SetupResult};
use crate::platform::Platform;

/// Location of the per-platform release manifests.
pub const DEFAULT_RELEASE_FEED: &str =
    "https://storage.googleapis.com/flutter_infra_release/releases";

/// Base URL that manifest `archive` paths are relative to.
pub const DEFAULT_STORAGE_BASE: &str =
    "https://storage.googleapis.com/flutter_infra_release/releases/";

/// Name prefix of per-run staging directories.
pub const STAGING_DIR_PREFIX: &str = "flutter-setup-";

/// Audit log written in the working directory.
pub const DEFAULT_LOG_FILE: &str = "flutter_setup.log";

/// Configuration for a setup run.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Directory holding `releases_<platform>.json`.
    pub release_feed_url: String,

    /// Base URL prepended to each release's archive path.
    pub storage_base_url: String,

    /// Parent of the per-run staging directories holding downloaded archives.
    ///
    /// Each manual install creates a fresh private directory here; it is
    /// left in place after installation.
    pub staging_dir: PathBuf,

    /// Directory the Windows archive is extracted into.
    pub windows_install_root: PathBuf,

    /// Directory the Linux/macOS archive is extracted into.
    ///
    /// `None` means `<home>/flutter`.
    pub unix_install_dir: Option<PathBuf>,

    /// Home directory override. `None` resolves the current user's home.
    pub home_dir: Option<PathBuf>,

    /// Shell startup file override. `None` picks one from `$SHELL`.
    pub shell_startup_file: Option<PathBuf>,

    /// HTTP request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Audit log path, truncated at the start of each run.
    pub log_file: PathBuf,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            release_feed_url: DEFAULT_RELEASE_FEED.to_string(),
            storage_base_url: DEFAULT_STORAGE_BASE.to_string(),
            staging_dir: std::env::temp_dir(),
            windows_install_root: PathBuf::from("C:\\src"),
            unix_install_dir: None,
            home_dir: None,
            shell_startup_file: None,
            timeout: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl SetupConfig {
    /// Create a configuration with default endpoints and locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the release feed base URL.
    pub fn with_release_feed(mut self, url: impl Into<String>) -> Self {
        self.release_feed_url = url.into();
        self
    }

    /// Set the archive storage base URL.
    pub fn with_storage_base(mut self, url: impl Into<String>) -> Self {
        self.storage_base_url = url.into();
        self
    }

    /// Set the parent of the per-run staging directories.
    pub fn with_staging_dir(mut self, path: PathBuf) -> Self {
        self.staging_dir = path;
        self
    }

    /// Set the Windows extraction root.
    pub fn with_windows_install_root(mut self, path: PathBuf) -> Self {
        self.windows_install_root = path;
        self
    }

    /// Set the Linux/macOS extraction directory.
    pub fn with_unix_install_dir(mut self, path: PathBuf) -> Self {
        self.unix_install_dir = Some(path);
        self
    }

    /// Override the home directory.
    pub fn with_home_dir(mut self, path: PathBuf) -> Self {
        self.home_dir = Some(path);
        self
    }

    /// Override the shell startup file.
    pub fn with_shell_startup_file(mut self, path: PathBuf) -> Self {
        self.shell_startup_file = Some(path);
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the audit log path.
    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = path;
        self
    }

    /// URL of the release manifest for a platform.
    pub fn manifest_url(&self, platform: Platform) -> String {
        format!(
            "{}/releases_{}.json",
            self.release_feed_url.trim_end_matches('/'),
            platform.manifest_name()
        )
    }

    /// Create a fresh staging directory for one run under `staging_dir`.
    ///
    /// The directory has a random name and, on Unix, mode `0700`.
    pub fn create_run_staging_dir(&self) -> SetupResult<PathBuf> {
        fs::create_dir_all(&self.staging_dir).map_err(|e| SetupError::CreateDirFailed {
            path: self.staging_dir.clone(),
            source: e,
        })?;

        let dir = tempfile::Builder::new()
            .prefix(STAGING_DIR_PREFIX)
            .tempdir_in(&self.staging_dir)
            .map_err(|e| SetupError::CreateDirFailed {
                path: self.staging_dir.clone(),
                source: e,
            })?;

        Ok(dir.keep())
    }

    /// Resolve the home directory.
    pub fn resolve_home(&self) -> SetupResult<PathBuf> {
        match &self.home_dir {
            Some(home) => Ok(home.clone()),
            None => dirs::home_dir().ok_or(SetupError::HomeDirUnavailable),
        }
    }

    /// Resolve the Linux/macOS extraction directory.
    pub fn resolve_unix_install_dir(&self) -> SetupResult<PathBuf> {
        match &self.unix_install_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.resolve_home()?.join("flutter")),
        }
    }

    /// Resolve the shell startup file that receives the PATH export.
    pub fn resolve_shell_startup_file(&self) -> SetupResult<PathBuf> {
        if let Some(path) = &self.shell_startup_file {
            return Ok(path.clone());
        }
        let shell = std::env::var("SHELL").ok();
        Ok(startup_file_for_shell(
            &self.resolve_home()?,
            shell.as_deref(),
        ))
    }
}

/// Pick the startup file for a login shell path such as `/bin/zsh`.
pub fn startup_file_for_shell(home: &Path, shell: Option<&str>) -> PathBuf {
    match shell {
        Some(shell) if shell.ends_with("zsh") => home.join(".zshrc"),
        _ => home.join(".bashrc"),
    }
}
