use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::manifest::{JarManifest, ManifestError};

/// Errors raised by collaborators invoked from target bodies.
#[derive(Debug, Error)]
pub enum ActionError {
  /// I/O error while touching the filesystem.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A required file or directory does not exist.
  #[error("path not found: {}", .0.display())]
  MissingPath(PathBuf),

  /// External command exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}{}", format_stderr(.stderr))]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// HTTP request failed during a fetch.
  #[error("fetch failed for {url}: {message}")]
  FetchFailed { url: String, message: String },

  /// Reading or writing a jar/zip archive failed.
  #[error("archive error for {}: {message}", .path.display())]
  Archive { path: PathBuf, message: String },

  /// The package manifest could not be rendered.
  #[error("manifest error: {0}")]
  Manifest(#[from] ManifestError),

  /// The async runtime backing external commands could not be created.
  #[error("runtime error: {0}")]
  Runtime(String),
}

fn format_stderr(stderr: &str) -> String {
  let stderr = stderr.trim();
  if stderr.is_empty() {
    String::new()
  } else {
    format!("\n{}", stderr)
  }
}

/// Inputs for a Java compilation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
  /// Source roots; every `.java` file beneath them is compiled.
  pub source_roots: Vec<PathBuf>,
  /// Directory receiving `.class` files.
  pub out_dir: PathBuf,
  /// Classpath entries.
  pub classpath: Vec<PathBuf>,
  /// Java source/target level, e.g. `1.8`.
  pub release: String,
  /// Extra compiler flags.
  pub args: Vec<String>,
}

/// Outcome of a compilation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileResult {
  /// Number of `.class` files present in the output directory.
  pub class_count: usize,
  /// Java packages (dotted) containing at least one class.
  pub packages: BTreeSet<String>,
}

/// Request to bundle directories into a jar/zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
  /// Archive to write. Parent directories are created.
  pub output: PathBuf,
  /// Each directory's contents are stored relative to that directory.
  pub source_dirs: Vec<PathBuf>,
  /// Written first as `META-INF/MANIFEST.MF` when present.
  pub manifest: Option<JarManifest>,
}

/// Request to generate API documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSpec {
  pub source_path: Vec<PathBuf>,
  pub out_dir: PathBuf,
  /// Root packages to document, including subpackages.
  pub packages: Vec<String>,
  /// Packages (dotted or slash separated) to leave out.
  pub exclude: Vec<String>,
}

/// Maven coordinates of a published artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coordinates {
  pub group_id: String,
  pub artifact_id: String,
  pub version: String,
}

impl fmt::Display for Coordinates {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
  }
}

/// Request to publish artifacts to a local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSpec {
  pub binary: PathBuf,
  pub sources: PathBuf,
  pub javadoc: PathBuf,
  pub coordinates: Coordinates,
}

/// Outcome of publishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
  pub coordinates: Coordinates,
  /// Where the binary artifact landed in the repository.
  pub repository_path: PathBuf,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn coordinates_display() {
    let coords = Coordinates {
      group_id: "org.antlr".to_string(),
      artifact_id: "symtab".to_string(),
      version: "1.0.1".to_string(),
    };
    assert_eq!(coords.to_string(), "org.antlr:symtab:1.0.1");
  }

  #[test]
  fn cmd_failed_includes_stderr_when_present() {
    let err = ActionError::CmdFailed {
      cmd: "javac Foo.java".to_string(),
      code: Some(1),
      stderr: "Foo.java:1: error: class expected\n".to_string(),
    };
    assert_eq!(
      err.to_string(),
      "command failed with exit code Some(1): javac Foo.java\nFoo.java:1: error: class expected"
    );

    let quiet = ActionError::CmdFailed {
      cmd: "mvn".to_string(),
      code: None,
      stderr: "  ".to_string(),
    };
    assert_eq!(quiet.to_string(), "command failed with exit code None: mvn");
  }
}
