//! Verified artifact downloads.
//!
//! - SHA-256 checksum helpers (`checksum`)
//! - Streaming HTTP download with inline verification (`http`)
//!
//! This is the only trust boundary of the installer: the archive is accepted
//! solely on the strength of its checksum matching the release feed.

mod checksum;
mod http;

pub use checksum::{calculate_file_checksum, checksums_match, verify_checksum};
pub use http::{file_name_from_url, ArtifactDownloader, HttpDownloader};
