//! Release feed lookup.
//!
//! The Flutter release feed publishes one JSON manifest per platform. Each
//! manifest lists releases newest first; the resolver picks the first entry
//! on the stable channel and turns its archive path into a download URL.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::SetupConfig;
use crate::error::{SetupError, SetupResult};
use crate::http::build_client;
use crate::platform::Platform;
use crate::progress::Reporter;

/// Channel name of production releases.
pub const STABLE_CHANNEL: &str = "stable";

/// A platform release manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseManifest {
    pub releases: Vec<ReleaseEntry>,
}

/// One entry of a release manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEntry {
    pub channel: String,
    pub version: String,
    /// Archive path relative to the storage base URL.
    pub archive: String,
    /// Lowercase hex SHA-256 of the archive.
    pub sha256: String,
    /// Target architecture, published only where several builds exist.
    #[serde(default)]
    pub dart_sdk_arch: Option<String>,
}

/// The release selected for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub version: String,
    pub download_url: String,
    pub sha256: String,
}

/// Pick the newest stable release from a manifest.
///
/// When `arch` is given, entries that declare a different architecture are
/// skipped; entries without an architecture always qualify.
pub fn select_latest_stable(
    manifest: &ReleaseManifest,
    storage_base: &str,
    arch: Option<&str>,
) -> Option<ReleaseDescriptor> {
    manifest
        .releases
        .iter()
        .filter(|entry| entry.channel == STABLE_CHANNEL)
        .find(|entry| match (arch, entry.dart_sdk_arch.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        })
        .map(|entry| ReleaseDescriptor {
            version: entry.version.clone(),
            download_url: format!("{}{}", storage_base, entry.archive),
            sha256: entry.sha256.clone(),
        })
}

/// Source of the latest stable release for a platform.
pub trait ReleaseSource: Send + Sync {
    /// Resolve the newest stable release. Performs a fresh lookup on every call.
    fn latest_stable(&self, platform: Platform, reporter: &Reporter)
        -> SetupResult<ReleaseDescriptor>;
}

/// Resolves releases from the HTTP release feed.
#[derive(Debug)]
pub struct HttpReleaseResolver {
    client: Client,
    config: SetupConfig,
}

impl HttpReleaseResolver {
    /// Create a resolver using the feed and timeout from `config`.
    pub fn new(config: SetupConfig) -> SetupResult<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Create a resolver with a preconfigured client.
    pub fn with_client(client: Client, config: SetupConfig) -> Self {
        Self { client, config }
    }

    fn fetch_manifest(&self, url: &str) -> SetupResult<ReleaseManifest> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SetupError::ManifestFetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let body = response
            .bytes()
            .map_err(|e| SetupError::ManifestFetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        serde_json::from_slice(&body).map_err(|e| SetupError::ManifestParseFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl ReleaseSource for HttpReleaseResolver {
    fn latest_stable(
        &self,
        platform: Platform,
        reporter: &Reporter,
    ) -> SetupResult<ReleaseDescriptor> {
        let url = self.config.manifest_url(platform);
        reporter.log(format!("Fetching release info from {}", url));

        let manifest = self.fetch_manifest(&url)?;
        tracing::debug!(url = %url, releases = manifest.releases.len(), "Fetched release manifest");

        let release = select_latest_stable(
            &manifest,
            &self.config.storage_base_url,
            platform.preferred_arch(),
        )
        .ok_or(SetupError::NoStableRelease { url })?;

        reporter.log(format!("Latest stable version: {}", release.version));
        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://storage.googleapis.com/flutter_infra_release/releases/";

    fn manifest(json: &str) -> ReleaseManifest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_selects_first_stable_entry() {
        let manifest = manifest(
            r#"{
                "base_url": "https://storage.googleapis.com/flutter_infra_release/releases",
                "releases": [
                    {"channel": "beta", "version": "3.20.0-1.2.pre", "archive": "beta/linux/b.tar.xz", "sha256": "bbb"},
                    {"channel": "stable", "version": "3.19.0", "archive": "stable/linux/flutter_linux_3.19.0-stable.tar.xz", "sha256": "abc123", "hash": "deadbeef"},
                    {"channel": "stable", "version": "3.16.9", "archive": "stable/linux/old.tar.xz", "sha256": "old"}
                ]
            }"#,
        );

        let release = select_latest_stable(&manifest, BASE, None).unwrap();
        assert_eq!(release.version, "3.19.0");
        assert_eq!(
            release.download_url,
            format!("{}stable/linux/flutter_linux_3.19.0-stable.tar.xz", BASE)
        );
        assert_eq!(release.sha256, "abc123");
    }

    #[test]
    fn test_no_stable_entry() {
        let manifest = manifest(
            r#"{"releases": [{"channel": "dev", "version": "1", "archive": "a", "sha256": "x"}]}"#,
        );
        assert!(select_latest_stable(&manifest, BASE, None).is_none());

        let empty = manifest_empty();
        assert!(select_latest_stable(&empty, BASE, None).is_none());
    }

    fn manifest_empty() -> ReleaseManifest {
        ReleaseManifest {
            releases: Vec::new(),
        }
    }

    #[test]
    fn test_arch_preference() {
        let manifest = manifest(
            r#"{"releases": [
                {"channel": "stable", "version": "3.19.0", "archive": "stable/macos/x64.zip", "sha256": "x64sum", "dart_sdk_arch": "x64"},
                {"channel": "stable", "version": "3.19.0", "archive": "stable/macos/arm64.zip", "sha256": "armsum", "dart_sdk_arch": "arm64"}
            ]}"#,
        );

        let arm = select_latest_stable(&manifest, BASE, Some("arm64")).unwrap();
        assert_eq!(arm.sha256, "armsum");

        let x64 = select_latest_stable(&manifest, BASE, Some("x64")).unwrap();
        assert_eq!(x64.sha256, "x64sum");

        let any = select_latest_stable(&manifest, BASE, None).unwrap();
        assert_eq!(any.sha256, "x64sum");
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let result: Result<ReleaseManifest, _> =
            serde_json::from_str(r#"{"releases": [{"channel": "stable", "version": "1"}]}"#);
        assert!(result.is_err());
    }
}
