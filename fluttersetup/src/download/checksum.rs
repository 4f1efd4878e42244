//! SHA-256 checksum calculation for file verification.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{SetupError, SetupResult};

/// Buffer size for reading files during checksum calculation (64KB).
pub(crate) const BUFFER_SIZE: usize = 64 * 1024;

/// Calculate SHA-256 checksum of a file.
///
/// # Returns
///
/// The lowercase hexadecimal SHA-256 hash of the file contents.
pub fn calculate_file_checksum(path: &Path) -> SetupResult<String> {
    let mut file = File::open(path).map_err(|e| SetupError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| SetupError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare a computed digest with a published one, ignoring case and
/// surrounding whitespace in the published value.
pub fn checksums_match(actual: &str, expected: &str) -> bool {
    actual.eq_ignore_ascii_case(expected.trim())
}

/// Verify that a file matches an expected checksum.
pub fn verify_checksum(path: &Path, expected: &str) -> SetupResult<()> {
    let actual = calculate_file_checksum(path)?;
    if !checksums_match(&actual, expected) {
        return Err(mismatch(path, expected, actual));
    }
    Ok(())
}

pub(crate) fn mismatch(path: &Path, expected: &str, actual: String) -> SetupError {
    SetupError::ChecksumMismatch {
        filename: path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
        expected: expected.trim().to_string(),
        actual,
    }
}
