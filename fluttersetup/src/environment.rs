//! PATH configuration after a manual install.
//!
//! Both mutations are append-only. Running setup twice adds the entry twice,
//! and neither takes effect until a new shell session starts.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::command::{CommandRunner, CommandSpec};
use crate::error::{SetupError, SetupResult};
use crate::progress::Reporter;

/// Comment written above the export line in shell startup files.
pub const STARTUP_MARKER: &str = "# Added by flutter-setup";

/// Directory holding the `flutter` executable inside an install directory.
///
/// Release archives carry a top-level `flutter/` folder, so extracting into
/// `dir` yields `dir/flutter/bin`. A pre-flattened tree uses `dir/bin`.
pub fn sdk_bin_dir(install_dir: &Path) -> PathBuf {
    let nested = install_dir.join("flutter").join("bin");
    if nested.is_dir() {
        nested
    } else {
        install_dir.join("bin")
    }
}

/// Render `bin_dir` for a shell script, relative to `$HOME` where possible.
pub fn shell_path_entry(bin_dir: &Path, home: &Path) -> String {
    match bin_dir.strip_prefix(home) {
        Ok(relative) => {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            format!("$HOME/{}", parts.join("/"))
        }
        Err(_) => bin_dir.display().to_string(),
    }
}

/// The `export PATH=...` line for a rendered path entry.
pub fn export_line(path_entry: &str) -> String {
    format!("export PATH=\"{}:$PATH\"", path_entry)
}

/// Append the PATH export for `bin_dir` to a shell startup file.
pub fn append_shell_export(startup_file: &Path, bin_dir: &Path, home: &Path) -> SetupResult<()> {
    let line = export_line(&shell_path_entry(bin_dir, home));

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(startup_file)
        .map_err(|e| SetupError::WriteFailed {
            path: startup_file.to_path_buf(),
            source: e,
        })?;

    write!(file, "\n{}\n{}\n", STARTUP_MARKER, line).map_err(|e| SetupError::WriteFailed {
        path: startup_file.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(file = %startup_file.display(), line = %line, "Appended PATH export");
    Ok(())
}

/// PowerShell command appending `bin_dir` to the current user's persistent `Path`.
pub fn user_path_command(bin_dir: &Path) -> CommandSpec {
    let dir = bin_dir.display().to_string().replace('\'', "''");
    let script = format!(
        "[Environment]::SetEnvironmentVariable('Path', \
         [Environment]::GetEnvironmentVariable('Path', 'User') + ';{}', 'User')",
        dir
    );
    CommandSpec::new("powershell")
        .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"])
        .arg(script)
}

/// Append `bin_dir` to the user's persistent `Path` on Windows.
pub fn persist_user_path(
    runner: &dyn CommandRunner,
    bin_dir: &Path,
    reporter: &Reporter,
) -> SetupResult<()> {
    let command = user_path_command(bin_dir);
    let result = runner.run(&command, reporter);
    if result.is_success() {
        return Ok(());
    }

    Err(SetupError::CommandFailed {
        command: command.program().to_string(),
        reason: format!(
            "could not add {} to the user PATH ({:?})",
            bin_dir.display(),
            result.status
        ),
    })
}
