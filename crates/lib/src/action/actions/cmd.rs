//! External command execution.
//!
//! Commands are spawned directly (no shell) with the caller's environment, so
//! tools such as `javac` and `mvn` resolve through `PATH` and `JAVA_HOME`.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info};

use crate::action::ActionError;

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
  /// Trimmed stdout.
  pub stdout: String,
  /// Trimmed stderr.
  pub stderr: String,
}

/// Run `program` with `args` and return its trimmed stdout.
///
/// # Arguments
///
/// * `program` - The binary to execute
/// * `args` - Arguments passed verbatim
/// * `cwd` - Optional working directory (defaults to the current directory)
///
/// # Errors
///
/// `CmdFailed` with the captured stderr when the process exits unsuccessfully,
/// `Io` when it cannot be spawned.
pub async fn execute_cmd(program: &str, args: &[String], cwd: Option<&Path>) -> Result<String, ActionError> {
  Ok(execute_cmd_output(program, args, cwd).await?.stdout)
}

/// Like [`execute_cmd`], but also returns stderr.
///
/// Some tools (`javac -version` on older JDKs) report on stderr even on success.
pub async fn execute_cmd_output(program: &str, args: &[String], cwd: Option<&Path>) -> Result<CmdOutput, ActionError> {
  let cmd_line = command_line(program, args);
  info!(cmd = %cmd_line, "executing command");

  let mut command = Command::new(program);
  command.args(args);
  if let Some(cwd) = cwd {
    command.current_dir(cwd);
  }

  debug!(working_dir = ?cwd, "spawning process");

  let output = command.output().await?;
  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

  if !output.status.success() {
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }

    return Err(ActionError::CmdFailed {
      cmd: cmd_line,
      code: output.status.code(),
      stderr,
    });
  }

  if !stderr.is_empty() {
    debug!(stderr = %stderr, "command stderr");
  }
  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }

  Ok(CmdOutput { stdout, stderr })
}

/// Render a command line for logs and error messages.
pub fn command_line(program: &str, args: &[String]) -> String {
  let mut line = program.to_string();
  for arg in args {
    line.push(' ');
    if arg.is_empty() || arg.contains(char::is_whitespace) {
      line.push('\'');
      line.push_str(arg);
      line.push('\'');
    } else {
      line.push_str(arg);
    }
  }
  line
}
