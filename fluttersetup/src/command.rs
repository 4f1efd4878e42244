//! External command execution.
//!
//! Commands run synchronously with stdout and stderr captured in full. A
//! program that cannot be found is an ordinary failure so the caller can
//! move on to its next fallback.

use std::fmt;
use std::io;
use std::process::Command;

use crate::progress::Reporter;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, in order.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Exit code zero.
    Success,
    /// Non-zero exit, killed by a signal (`None`), or failed to spawn.
    Failed { code: Option<i32> },
    /// The program is not installed.
    NotFound,
}

/// Outcome of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Result for a program that could not be located.
    pub fn not_found() -> Self {
        Self {
            status: CommandStatus::NotFound,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Whether the command exited with status zero.
    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}

/// Executes external commands on behalf of the installers.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion, reporting the invocation and its output.
    fn run(&self, command: &CommandSpec, reporter: &Reporter) -> CommandResult;

    /// Whether `program` can be found on the search path.
    fn is_available(&self, program: &str) -> bool;
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &CommandSpec, reporter: &Reporter) -> CommandResult {
        reporter.log(format!("Running: {}", command));

        let output = Command::new(command.program())
            .args(command.arguments())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                reporter.log(format!("Command not found: {}", command.program()));
                return CommandResult::not_found();
            }
            Err(e) => {
                tracing::warn!(program = command.program(), error = %e, "Failed to spawn command");
                reporter.log(format!("Failed to run {}: {}", command.program(), e));
                return CommandResult {
                    status: CommandStatus::Failed { code: None },
                    stdout: String::new(),
                    stderr: e.to_string(),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        reporter.log_output(&stdout);
        reporter.log_output(&stderr);

        let status = if output.status.success() {
            CommandStatus::Success
        } else {
            CommandStatus::Failed {
                code: output.status.code(),
            }
        };
        tracing::debug!(command = %command, ?status, "Command finished");

        CommandResult {
            status,
            stdout,
            stderr,
        }
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemorySink;
    use std::sync::Arc;

    fn reporter() -> (Reporter, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Reporter::new().with_shared_sink(sink.clone()), sink)
    }

    #[test]
    fn test_command_spec_display() {
        let spec = CommandSpec::new("winget")
            .arg("install")
            .args(["-e", "--id=Flutter.Flutter"]);
        assert_eq!(spec.to_string(), "winget install -e --id=Flutter.Flutter");
        assert_eq!(spec.program(), "winget");
        assert_eq!(spec.arguments().len(), 3);
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let (reporter, sink) = reporter();
        let spec = CommandSpec::new("definitely-not-a-real-program-7f3a").arg("--version");

        let result = SystemCommandRunner::new().run(&spec, &reporter);

        assert_eq!(result.status, CommandStatus::NotFound);
        assert!(!result.is_success());
        let lines = sink.lines();
        assert_eq!(
            lines[0],
            "Running: definitely-not-a-real-program-7f3a --version"
        );
        assert_eq!(
            lines[1],
            "Command not found: definitely-not-a-real-program-7f3a"
        );
    }

    #[test]
    fn test_is_available_for_missing_program() {
        assert!(!SystemCommandRunner::new().is_available("definitely-not-a-real-program-7f3a"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output_and_exit_status() {
        let (reporter, sink) = reporter();
        let runner = SystemCommandRunner::new();

        let ok = runner.run(&CommandSpec::new("sh").args(["-c", "echo hello"]), &reporter);
        assert!(ok.is_success());
        assert_eq!(ok.stdout.trim(), "hello");

        let failed = runner.run(
            &CommandSpec::new("sh").args(["-c", "echo oops >&2; exit 3"]),
            &reporter,
        );
        assert_eq!(failed.status, CommandStatus::Failed { code: Some(3) });
        assert_eq!(failed.stderr.trim(), "oops");

        assert!(sink.lines().contains(&"hello".to_string()));
        assert!(sink.lines().contains(&"oops".to_string()));
    }
}
