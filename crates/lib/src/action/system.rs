//! Production implementation of [`Actions`].
//!
//! Compilation, documentation and publishing shell out to the JDK and Maven.
//! Packaging, extraction and file operations are done in-process. External
//! processes and downloads run on a Tokio runtime owned by the action set;
//! target bodies stay synchronous and block on each call.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::actions::{archive, cmd, fetch, fs};
use super::{
  ActionError, Actions, CompileConfig, CompileResult, DocSpec, PackageSpec, PublishResult, PublishSpec,
};

/// Executables used by [`SystemActions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub javac: String,
  pub javadoc: String,
  pub mvn: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      javac: "javac".to_string(),
      javadoc: "javadoc".to_string(),
      mvn: "mvn".to_string(),
    }
  }
}

/// Actions backed by the real filesystem, network, JDK and Maven.
pub struct SystemActions {
  runtime: Runtime,
  toolchain: Toolchain,
  maven_repo: PathBuf,
}

impl SystemActions {
  /// Create an action set using the default toolchain.
  ///
  /// `maven_repo` is the local repository `publish` installs into; it is used
  /// to report where artifacts land.
  pub fn new(maven_repo: PathBuf) -> Result<Self, ActionError> {
    Self::with_toolchain(Toolchain::default(), maven_repo)
  }

  pub fn with_toolchain(toolchain: Toolchain, maven_repo: PathBuf) -> Result<Self, ActionError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(|e| ActionError::Runtime(e.to_string()))?;

    Ok(Self {
      runtime,
      toolchain,
      maven_repo,
    })
  }

  fn run(&self, program: &str, args: Vec<String>) -> Result<String, ActionError> {
    self.runtime.block_on(cmd::execute_cmd(program, &args, None))
  }
}

impl Actions for SystemActions {
  fn compile(&self, config: &CompileConfig) -> Result<CompileResult, ActionError> {
    let sources = java_sources(&config.source_roots)?;
    if sources.is_empty() {
      warn!(roots = ?config.source_roots, "no java sources found");
      return Ok(CompileResult::default());
    }

    std::fs::create_dir_all(&config.out_dir)?;

    let mut args = vec![
      "-d".to_string(),
      config.out_dir.display().to_string(),
      "-source".to_string(),
      config.release.clone(),
      "-target".to_string(),
      config.release.clone(),
    ];

    if !config.classpath.is_empty() {
      args.push("-cp".to_string());
      args.push(join_path_list(&config.classpath)?);
    }

    args.extend(config.args.iter().cloned());
    args.extend(sources.iter().map(|p| p.display().to_string()));

    info!(files = sources.len(), out = %config.out_dir.display(), "compiling java sources");
    self.run(&self.toolchain.javac, args)?;

    let result = scan_classes(&config.out_dir);
    debug!(classes = result.class_count, packages = result.packages.len(), "compile finished");
    Ok(result)
  }

  fn package(&self, spec: &PackageSpec) -> Result<PathBuf, ActionError> {
    archive::package(spec)
  }

  fn unpack(&self, archive_path: &Path, dest: &Path) -> Result<(), ActionError> {
    archive::unpack(archive_path, dest)
  }

  fn javadoc(&self, spec: &DocSpec) -> Result<(), ActionError> {
    std::fs::create_dir_all(&spec.out_dir)?;

    let mut args = vec![
      "-quiet".to_string(),
      "-d".to_string(),
      spec.out_dir.display().to_string(),
      "-sourcepath".to_string(),
      join_path_list(&spec.source_path)?,
    ];

    if !spec.packages.is_empty() {
      args.push("-subpackages".to_string());
      args.push(spec.packages.join(":"));
    }

    if !spec.exclude.is_empty() {
      let exclude: Vec<String> = spec.exclude.iter().map(|p| p.replace('/', ".")).collect();
      args.push("-exclude".to_string());
      args.push(exclude.join(":"));
    }

    info!(out = %spec.out_dir.display(), "generating javadoc");
    self.run(&self.toolchain.javadoc, args)?;
    Ok(())
  }

  fn publish(&self, spec: &PublishSpec) -> Result<PublishResult, ActionError> {
    for artifact in [&spec.binary, &spec.sources, &spec.javadoc] {
      if !artifact.is_file() {
        return Err(ActionError::MissingPath(artifact.clone()));
      }
    }

    let coords = &spec.coordinates;
    let args = vec![
      "-q".to_string(),
      "install:install-file".to_string(),
      format!("-Dfile={}", spec.binary.display()),
      format!("-Dsources={}", spec.sources.display()),
      format!("-Djavadoc={}", spec.javadoc.display()),
      format!("-DgroupId={}", coords.group_id),
      format!("-DartifactId={}", coords.artifact_id),
      format!("-Dversion={}", coords.version),
      "-Dpackaging=jar".to_string(),
    ];

    info!(coordinates = %coords, "installing into local maven repository");
    self.run(&self.toolchain.mvn, args)?;

    Ok(PublishResult {
      coordinates: coords.clone(),
      repository_path: crate::platform::paths::maven_artifact_path(&self.maven_repo, coords),
    })
  }

  fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ActionError> {
    self.runtime.block_on(fetch::execute_fetch(url, dest_dir))
  }

  fn remove_tree(&self, path: &Path) -> Result<(), ActionError> {
    fs::remove_tree(path)
  }

  fn copy_tree(&self, src: &Path, dst: &Path) -> Result<(), ActionError> {
    fs::copy_tree(src, dst).map(|_| ())
  }

  fn copy_file(&self, src: &Path, dst: &Path) -> Result<(), ActionError> {
    fs::copy_file(src, dst)
  }

  fn make_dir(&self, path: &Path) -> Result<(), ActionError> {
    std::fs::create_dir_all(path)?;
    Ok(())
  }

  fn remove_named(&self, dir: &Path, name: &str) -> Result<(), ActionError> {
    let removed = fs::remove_named(dir, name)?;
    debug!(dir = %dir.display(), name = %name, removed, "removed matching files");
    Ok(())
  }

  fn java_version(&self) -> Result<String, ActionError> {
    let output = self
      .runtime
      .block_on(cmd::execute_cmd_output(&self.toolchain.javac, &["-version".to_string()], None))?;

    // JDK 8 prints the version on stderr, later releases on stdout.
    parse_javac_version(&output.stdout)
      .or_else(|| parse_javac_version(&output.stderr))
      .ok_or_else(|| ActionError::CmdFailed {
        cmd: format!("{} -version", self.toolchain.javac),
        code: Some(0),
        stderr: format!("unrecognised version output: {}", output.stderr),
      })
  }
}

/// All `.java` files under `roots`, sorted for reproducible command lines.
fn java_sources(roots: &[PathBuf]) -> Result<Vec<PathBuf>, ActionError> {
  let mut sources = Vec::new();
  for root in roots {
    if !root.is_dir() {
      return Err(ActionError::MissingPath(root.clone()));
    }
    sources.extend(
      WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "java"))
        .map(|e| e.into_path()),
    );
  }
  Ok(sources)
}

/// Count class files under `out_dir` and collect their dotted package names.
fn scan_classes(out_dir: &Path) -> CompileResult {
  let mut packages = BTreeSet::new();
  let mut class_count = 0;

  for entry in WalkDir::new(out_dir).into_iter().filter_map(Result::ok) {
    if !entry.file_type().is_file() || entry.path().extension().is_none_or(|ext| ext != "class") {
      continue;
    }
    class_count += 1;

    let package = entry
      .path()
      .parent()
      .and_then(|dir| dir.strip_prefix(out_dir).ok())
      .map(|rel| {
        rel
          .components()
          .map(|c| c.as_os_str().to_string_lossy())
          .collect::<Vec<_>>()
          .join(".")
      })
      .unwrap_or_default();

    if !package.is_empty() {
      packages.insert(package);
    }
  }

  CompileResult { class_count, packages }
}

fn join_path_list(paths: &[PathBuf]) -> Result<String, ActionError> {
  let joined: OsString = std::env::join_paths(paths)
    .map_err(|e| ActionError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;
  Ok(joined.to_string_lossy().to_string())
}

/// Extract the version from `javac -version` output such as `javac 1.8.0_292`.
fn parse_javac_version(output: &str) -> Option<String> {
  output
    .lines()
    .find_map(|line| line.trim().strip_prefix("javac "))
    .map(|version| version.trim().to_string())
    .filter(|version| !version.is_empty())
}
