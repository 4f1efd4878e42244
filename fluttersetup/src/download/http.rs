//! HTTP downloader with inline SHA-256 verification.
//!
//! The response body is streamed to disk and hashed in the same pass. A
//! mismatching file is left where it was written; nothing is resumed or
//! retried.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use super::checksum::{checksums_match, mismatch, BUFFER_SIZE};
use crate::config::SetupConfig;
use crate::error::{SetupError, SetupResult};
use crate::http::build_client;
use crate::progress::Reporter;

/// File name used when a URL has no usable last path segment.
const FALLBACK_FILE_NAME: &str = "flutter-sdk-download";

/// Downloads an artifact and proves it matches its published checksum.
pub trait ArtifactDownloader: Send + Sync {
    /// Download `url` into `dest_dir` and verify it against `expected_sha256`.
    ///
    /// # Returns
    ///
    /// The path of the verified file.
    fn download_verified(
        &self,
        url: &str,
        expected_sha256: &str,
        dest_dir: &Path,
        reporter: &Reporter,
    ) -> SetupResult<PathBuf>;
}

/// HTTP-based artifact downloader.
#[derive(Debug)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader honouring the timeout from `config`.
    pub fn new(config: &SetupConfig) -> SetupResult<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
        })
    }

    /// Create a downloader with a preconfigured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl ArtifactDownloader for HttpDownloader {
    fn download_verified(
        &self,
        url: &str,
        expected_sha256: &str,
        dest_dir: &Path,
        reporter: &Reporter,
    ) -> SetupResult<PathBuf> {
        reporter.log(format!("Downloading {}", url));

        fs::create_dir_all(dest_dir).map_err(|e| SetupError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;
        let dest = dest_dir.join(file_name_from_url(url));

        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SetupError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let actual = write_hashed(&mut response, &dest).map_err(|e| match e {
            StreamError::Read(e) => SetupError::DownloadFailed {
                url: url.to_string(),
                reason: format!("Read error: {}", e),
            },
            StreamError::Write(e) => SetupError::WriteFailed {
                path: dest.clone(),
                source: e,
            },
        })?;

        reporter.log("Download complete; verifying checksum");
        if !checksums_match(&actual, expected_sha256) {
            tracing::warn!(path = %dest.display(), expected = expected_sha256, actual = %actual, "Checksum mismatch");
            return Err(mismatch(&dest, expected_sha256, actual));
        }

        reporter.log("Checksum verified");
        Ok(dest)
    }
}

/// Failure while streaming a body to disk.
#[derive(Debug)]
pub(crate) enum StreamError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Copy `reader` to a new file at `dest`, returning the SHA-256 of the bytes written.
///
/// Fails if anything, including a symlink, already exists at `dest`.
pub(crate) fn write_hashed(reader: &mut impl Read, dest: &Path) -> Result<String, StreamError> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(StreamError::Write)?;
    let mut writer = BufWriter::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut downloaded = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(StreamError::Read)?;
        if bytes_read == 0 {
            break;
        }

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(StreamError::Write)?;
        hasher.update(&buffer[..bytes_read]);
        downloaded += bytes_read as u64;
    }

    writer.flush().map_err(StreamError::Write)?;
    tracing::debug!(path = %dest.display(), bytes = downloaded, "Download written");

    Ok(format!("{:x}", hasher.finalize()))
}

/// Local file name for a download: the URL's last path segment.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}
