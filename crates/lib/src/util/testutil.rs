//! Test utilities for bild-lib.
//!
//! Cross-platform helpers for tests that execute external commands, and
//! [`RecordingActions`], an in-memory [`Actions`] implementation for exercising
//! target bodies without javac, javadoc, maven or the network.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::action::actions::fetch::url_to_filename;
use crate::action::{
  ActionError, Actions, CompileConfig, CompileResult, DocSpec, PackageSpec, PublishResult, PublishSpec, stale,
};
use crate::platform::paths::maven_artifact_path;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("/usr/bin/touch", vec![filename.to_string()])
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  // Use PowerShell to create an empty file - more reliable than cmd.exe approaches
  (
    "powershell.exe",
    vec![
      "-NoProfile".to_string(),
      "-Command".to_string(),
      format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
    ],
  )
}

/// Returns the command and args to echo a message.
///
/// On Unix, this uses /bin/echo directly.
/// On Windows, echo is a shell builtin, so we wrap it in cmd.exe.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}

/// An [`Actions`] fake that records every call.
///
/// Calls are logged as `"<action> <detail>"` strings, with paths shown by file
/// name. `package` creates an empty output file so staleness checks see it;
/// nothing else touches the filesystem.
#[derive(Default)]
pub struct RecordingActions {
  calls: RefCell<Vec<String>>,
  packages: RefCell<Vec<PackageSpec>>,
  stale_answer: Cell<Option<bool>>,
  fail_on: RefCell<Option<String>>,
}

impl RecordingActions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Force every staleness check to return `answer` instead of consulting timestamps.
  pub fn with_stale(self, answer: bool) -> Self {
    self.stale_answer.set(Some(answer));
    self
  }

  /// Make the named action fail with `CmdFailed`.
  pub fn failing(self, action: &str) -> Self {
    *self.fail_on.borrow_mut() = Some(action.to_string());
    self
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().clone()
  }

  /// Names of the actions invoked, without details.
  pub fn actions(&self) -> Vec<String> {
    self
      .calls
      .borrow()
      .iter()
      .map(|c| c.split(' ').next().unwrap_or_default().to_string())
      .collect()
  }

  pub fn packages(&self) -> Vec<PackageSpec> {
    self.packages.borrow().clone()
  }

  fn record(&self, action: &str, detail: impl AsRef<str>) -> Result<(), ActionError> {
    let detail = detail.as_ref();
    let line = if detail.is_empty() {
      action.to_string()
    } else {
      format!("{action} {detail}")
    };
    self.calls.borrow_mut().push(line);

    if self.fail_on.borrow().as_deref() == Some(action) {
      return Err(ActionError::CmdFailed {
        cmd: action.to_string(),
        code: Some(1),
        stderr: format!("{action} failed"),
      });
    }
    Ok(())
  }
}

fn file_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| path.display().to_string())
}

impl Actions for RecordingActions {
  fn stale(&self, sources: &[PathBuf], artifact: &Path) -> bool {
    self.stale_answer.get().unwrap_or_else(|| stale::is_stale(sources, artifact))
  }

  fn compile(&self, config: &CompileConfig) -> Result<CompileResult, ActionError> {
    self.record("compile", file_name(&config.out_dir))?;
    Ok(CompileResult {
      class_count: 2,
      packages: BTreeSet::from(["org.antlr.symtab".to_string()]),
    })
  }

  fn package(&self, spec: &PackageSpec) -> Result<PathBuf, ActionError> {
    self.record("package", file_name(&spec.output))?;
    if let Some(parent) = spec.output.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&spec.output, "")?;
    self.packages.borrow_mut().push(spec.clone());
    Ok(spec.output.clone())
  }

  fn unpack(&self, archive: &Path, dest: &Path) -> Result<(), ActionError> {
    self.record("unpack", format!("{} {}", file_name(archive), file_name(dest)))
  }

  fn javadoc(&self, spec: &DocSpec) -> Result<(), ActionError> {
    self.record("javadoc", spec.packages.join(":"))
  }

  fn publish(&self, spec: &PublishSpec) -> Result<PublishResult, ActionError> {
    self.record("publish", spec.coordinates.to_string())?;
    Ok(PublishResult {
      coordinates: spec.coordinates.clone(),
      repository_path: maven_artifact_path(Path::new("/m2"), &spec.coordinates),
    })
  }

  fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ActionError> {
    self.record("fetch", url_to_filename(url))?;
    Ok(dest_dir.join(url_to_filename(url)))
  }

  fn remove_tree(&self, path: &Path) -> Result<(), ActionError> {
    self.record("remove_tree", file_name(path))
  }

  fn copy_tree(&self, src: &Path, dst: &Path) -> Result<(), ActionError> {
    self.record("copy_tree", format!("{} {}", file_name(src), file_name(dst)))
  }

  fn copy_file(&self, src: &Path, dst: &Path) -> Result<(), ActionError> {
    self.record("copy_file", format!("{} {}", file_name(src), file_name(dst)))
  }

  fn make_dir(&self, path: &Path) -> Result<(), ActionError> {
    self.record("make_dir", file_name(path))
  }

  fn remove_named(&self, dir: &Path, name: &str) -> Result<(), ActionError> {
    self.record("remove_named", format!("{} {}", file_name(dir), name))
  }

  fn java_version(&self) -> Result<String, ActionError> {
    self.record("java_version", "")?;
    Ok("1.8.0_292".to_string())
  }
}
