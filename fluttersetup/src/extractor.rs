//! Archive extraction for SDK installation.
//!
//! The release feed ships `.zip` archives for Windows and macOS and
//! `.tar.xz` archives for Linux. The format is taken from the file name and,
//! failing that, from the archive's leading magic bytes.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use xz2::read::XzDecoder;
use zip::ZipArchive;

use crate::error::{SetupError, SetupResult};

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarXz,
    TarGz,
}

impl ArchiveFormat {
    /// Infer the format from the file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Some(Self::TarXz)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }

    /// Infer the format from leading bytes.
    pub fn from_magic(header: &[u8]) -> Option<Self> {
        if header.starts_with(b"PK\x03\x04") {
            Some(Self::Zip)
        } else if header.starts_with(b"\xFD7zXZ\x00") {
            Some(Self::TarXz)
        } else if header.starts_with(b"\x1F\x8B") {
            Some(Self::TarGz)
        } else {
            None
        }
    }

    /// Detect the format of the archive at `path`.
    pub fn detect(path: &Path) -> SetupResult<Self> {
        if let Some(format) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_file_name)
        {
            return Ok(format);
        }

        let mut header = [0u8; 6];
        let mut file = File::open(path).map_err(|e| SetupError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let read = file.read(&mut header).map_err(|e| SetupError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_magic(&header[..read]).ok_or_else(|| SetupError::UnsupportedArchive {
            path: path.to_path_buf(),
        })
    }
}

/// Unpacks a downloaded archive.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract every entry of `archive_path` into `dest_dir`.
    ///
    /// # Returns
    ///
    /// The number of regular files now present under `dest_dir`.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> SetupResult<usize>;
}

/// Extractor built on the `zip`, `tar`, `xz2` and `flate2` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeExtractor;

impl NativeExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    fn extract_zip(&self, archive: &Path, dest_dir: &Path) -> SetupResult<()> {
        let file = open(archive)?;
        let mut zip = ZipArchive::new(file).map_err(|e| extraction_failed(archive, e))?;
        zip.extract(dest_dir)
            .map_err(|e| extraction_failed(archive, e))
    }

    fn extract_tar(&self, archive: &Path, dest_dir: &Path, reader: impl Read) -> SetupResult<()> {
        tar::Archive::new(reader)
            .unpack(dest_dir)
            .map_err(|e| extraction_failed(archive, e))
    }
}

impl ArchiveExtractor for NativeExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> SetupResult<usize> {
        let format = ArchiveFormat::detect(archive_path)?;

        fs::create_dir_all(dest_dir).map_err(|e| SetupError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        match format {
            ArchiveFormat::Zip => self.extract_zip(archive_path, dest_dir)?,
            ArchiveFormat::TarXz => {
                let decoder = XzDecoder::new(open(archive_path)?);
                self.extract_tar(archive_path, dest_dir, decoder)?
            }
            ArchiveFormat::TarGz => {
                let decoder = GzDecoder::new(open(archive_path)?);
                self.extract_tar(archive_path, dest_dir, decoder)?
            }
        }

        let count = count_files_recursive(dest_dir)?;
        tracing::debug!(archive = %archive_path.display(), ?format, files = count, "Archive extracted");
        Ok(count)
    }
}

fn open(path: &Path) -> SetupResult<File> {
    File::open(path).map_err(|e| SetupError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn extraction_failed(path: &Path, reason: impl std::fmt::Display) -> SetupError {
    SetupError::ExtractionFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Count files recursively in a directory.
fn count_files_recursive(dir: &Path) -> SetupResult<usize> {
    let mut count = 0;

    if !dir.exists() {
        return Ok(0);
    }

    let entries = fs::read_dir(dir).map_err(|e| SetupError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            count += 1;
        } else if path.is_dir() {
            count += count_files_recursive(&path)?;
        }
    }

    Ok(count)
}
