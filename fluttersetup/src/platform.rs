//! Host platform detection.

use std::fmt;

/// Operating systems with an automated install chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Map an `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &str) -> Option<Self> {
        match os.to_lowercase().as_str() {
            "windows" => Some(Self::Windows),
            "linux" => Some(Self::Linux),
            "macos" | "darwin" => Some(Self::MacOs),
            _ => None,
        }
    }

    /// Platform of the running process, if supported.
    pub fn current() -> Option<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Name used in the release feed (`releases_<name>.json`).
    pub fn manifest_name(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "macos",
        }
    }

    /// Preferred `dart_sdk_arch` when the feed lists several builds per version.
    ///
    /// Only macOS publishes more than one architecture.
    pub fn preferred_arch(&self) -> Option<&'static str> {
        match self {
            Self::MacOs if std::env::consts::ARCH == "aarch64" => Some("arm64"),
            Self::MacOs => Some("x64"),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_name())
    }
}
