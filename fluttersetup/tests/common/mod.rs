//! Shared fixtures for installer integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fluttersetup::command::{CommandResult, CommandRunner, CommandSpec, CommandStatus};
use fluttersetup::download::ArtifactDownloader;
use fluttersetup::extractor::ArchiveExtractor;
use fluttersetup::release::{ReleaseDescriptor, ReleaseSource};
use fluttersetup::{MemorySink, Platform, Reporter, SetupError, SetupResult};

// ============================================================================
// Reporter
// ============================================================================

/// Reporter writing into a shared in-memory buffer.
pub fn memory_reporter() -> (Reporter, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Reporter::new().with_shared_sink(sink.clone()), sink)
}

// ============================================================================
// Command runner
// ============================================================================

/// Command runner with scripted exit statuses per program.
///
/// Programs without a script behave as if they were not installed.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    statuses: HashMap<String, CommandStatus>,
    available: Vec<String>,
    invocations: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the status `program` exits with. Scripted programs are on PATH.
    pub fn with_status(mut self, program: &str, status: CommandStatus) -> Self {
        self.statuses.insert(program.to_string(), status);
        self.available.push(program.to_string());
        self
    }

    /// Script `program` to exit with code 1.
    pub fn failing(self, program: &str) -> Self {
        self.with_status(program, CommandStatus::Failed { code: Some(1) })
    }

    /// Script `program` to exit with code 0.
    pub fn succeeding(self, program: &str) -> Self {
        self.with_status(program, CommandStatus::Success)
    }

    /// Hide `program` from `is_available` while keeping its script.
    pub fn hidden(mut self, program: &str) -> Self {
        self.available.retain(|p| p != program);
        self
    }

    /// Shared list of every command line run so far.
    pub fn invocations(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.invocations)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandSpec, reporter: &Reporter) -> CommandResult {
        reporter.log(format!("Running: {}", command));
        self.invocations.lock().unwrap().push(command.to_string());

        match self.statuses.get(command.program()) {
            Some(status) => CommandResult {
                status: *status,
                stdout: String::new(),
                stderr: String::new(),
            },
            None => {
                reporter.log(format!("Command not found: {}", command.program()));
                CommandResult::not_found()
            }
        }
    }

    fn is_available(&self, program: &str) -> bool {
        self.available.iter().any(|p| p == program)
    }
}

// ============================================================================
// Release source, downloader and extractor fakes
// ============================================================================

/// Release source returning a fixed descriptor and counting lookups.
#[derive(Clone)]
pub struct FixedReleases {
    release: ReleaseDescriptor,
    calls: Arc<Mutex<Vec<Platform>>>,
}

impl FixedReleases {
    pub fn new(version: &str, url: &str, sha256: &str) -> Self {
        Self {
            release: ReleaseDescriptor {
                version: version.to_string(),
                download_url: url.to_string(),
                sha256: sha256.to_string(),
            },
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Platform>>> {
        Arc::clone(&self.calls)
    }
}

impl ReleaseSource for FixedReleases {
    fn latest_stable(
        &self,
        platform: Platform,
        reporter: &Reporter,
    ) -> SetupResult<ReleaseDescriptor> {
        self.calls.lock().unwrap().push(platform);
        reporter.log(format!("Latest stable version: {}", self.release.version));
        Ok(self.release.clone())
    }
}

/// Bytes [`LocalDownloader`] writes for every archive.
pub const ARCHIVE_BYTES: &[u8] = b"archive";

/// How a [`LocalDownloader`] misbehaves.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum Fault {
    #[default]
    None,
    /// Report a checksum mismatch.
    Mismatch,
    /// Report success but leave different bytes on disk.
    Tamper,
}

/// Downloader that "downloads" by writing [`ARCHIVE_BYTES`] under the URL's
/// last segment in the destination directory.
#[derive(Clone, Default)]
pub struct LocalDownloader {
    fault: Fault,
}

impl LocalDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mismatching() -> Self {
        Self {
            fault: Fault::Mismatch,
        }
    }

    /// Claims success while the file on disk no longer matches.
    pub fn tampering() -> Self {
        Self {
            fault: Fault::Tamper,
        }
    }
}

impl ArtifactDownloader for LocalDownloader {
    fn download_verified(
        &self,
        url: &str,
        expected_sha256: &str,
        dest_dir: &Path,
        reporter: &Reporter,
    ) -> SetupResult<PathBuf> {
        reporter.log(format!("Downloading {}", url));
        fs::create_dir_all(dest_dir).unwrap();
        let dest = dest_dir.join(fluttersetup::download::file_name_from_url(url));
        fs::write(&dest, ARCHIVE_BYTES).unwrap();

        if self.fault == Fault::Mismatch {
            return Err(SetupError::ChecksumMismatch {
                filename: dest.file_name().unwrap().to_string_lossy().to_string(),
                expected: expected_sha256.to_string(),
                actual: "0000".to_string(),
            });
        }
        reporter.log("Checksum verified");
        if self.fault == Fault::Tamper {
            fs::write(&dest, b"swapped after verification").unwrap();
        }
        Ok(dest)
    }
}

/// Extractor that lays out `flutter/bin` under the destination.
#[derive(Clone, Default)]
pub struct LayoutExtractor {
    calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
}

impl LayoutExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<(PathBuf, PathBuf)>>> {
        Arc::clone(&self.calls)
    }
}

impl ArchiveExtractor for LayoutExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> SetupResult<usize> {
        self.calls
            .lock()
            .unwrap()
            .push((archive_path.to_path_buf(), dest_dir.to_path_buf()));
        fs::create_dir_all(dest_dir.join("flutter").join("bin")).unwrap();
        fs::write(dest_dir.join("flutter").join("bin").join("flutter"), b"").unwrap();
        Ok(1)
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Blocking client that ignores proxy settings from the environment.
pub fn loopback_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

// ============================================================================
// Archives
// ============================================================================

/// A `.tar.xz` holding `flutter/bin/flutter` and `flutter/version`.
pub fn flutter_tar_xz(version: &str) -> Vec<u8> {
    let encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    let mut builder = tar::Builder::new(encoder);

    let script = b"#!/bin/sh\necho Flutter\n";
    let mut header = tar::Header::new_gnu();
    header.set_size(script.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder
        .append_data(&mut header, "flutter/bin/flutter", &script[..])
        .unwrap();

    let version = format!("{}\n", version);
    let mut header = tar::Header::new_gnu();
    header.set_size(version.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "flutter/version", version.as_bytes())
        .unwrap();

    builder.into_inner().unwrap().finish().unwrap()
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(data))
}
