//! Recipe configuration.
//!
//! Every value the symtab recipe depends on lives in [`RecipeConfig`]. Paths
//! relative to the project are resolved against `root`.

use std::path::{Path, PathBuf};

use crate::action::Coordinates;
use crate::consts::CREATED_BY;
use crate::platform::paths;

pub const JARCACHE_ENV: &str = "BILD_JARCACHE";
pub const LIB_DIR_ENV: &str = "BILD_LIB_DIR";
pub const BUILT_BY_ENV: &str = "BILD_BUILT_BY";

const DEFAULT_LIB_DIR: &str = "/usr/local/lib";

/// Configuration for building the symtab library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeConfig {
  /// Project root; `src`, `out`, `dist` and `doc` live beneath it.
  pub root: PathBuf,
  pub coordinates: Coordinates,

  pub src_dir: PathBuf,
  pub out_dir: PathBuf,
  pub dist_dir: PathBuf,
  pub doc_dir: PathBuf,

  /// Java source/target level.
  pub release: String,
  pub javac_args: Vec<String>,

  /// Compile-time dependency, downloaded into `jar_cache`.
  pub antlr_jar_url: String,
  /// Runtime sources unpacked next to our own for javadoc cross references.
  pub runtime_sources_url: String,
  pub runtime_sources_dir: PathBuf,

  pub doc_packages: Vec<String>,
  pub doc_exclude: Vec<String>,

  pub vendor: String,
  pub vendor_id: String,
  pub title: String,
  pub doc_url: String,
  pub license_url: String,
  pub symbolic_name: String,
  pub created_by: String,
  pub built_by: String,

  pub jar_cache: PathBuf,
  pub maven_repo: PathBuf,
  /// Where `install` drops a copy of the jar when the directory exists.
  pub lib_dir: PathBuf,
}

impl RecipeConfig {
  /// Defaults for a project rooted at `root`, ignoring the environment.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    let out_dir = root.join("out");

    Self {
      coordinates: Coordinates {
        group_id: "org.antlr".to_string(),
        artifact_id: "symtab".to_string(),
        version: "1.0.1".to_string(),
      },
      src_dir: root.join("src"),
      runtime_sources_dir: out_dir.join("Antlr45Runtime"),
      out_dir,
      dist_dir: root.join("dist"),
      doc_dir: root.join("doc"),
      release: "1.8".to_string(),
      javac_args: vec!["-Xlint".to_string(), "-Xlint:-serial".to_string(), "-g".to_string()],
      antlr_jar_url: "http://www.antlr.org/download/antlr-4.5-complete.jar".to_string(),
      runtime_sources_url:
        "http://search.maven.org/remotecontent?filepath=org/antlr/antlr4-runtime/4.5/antlr4-runtime-4.5-sources.jar"
          .to_string(),
      doc_packages: vec!["org.antlr.symtab".to_string()],
      doc_exclude: [
        "org/antlr/runtime",
        "org/antlr/v4",
        "org/abego",
        "org/stringtemplate",
        "org/antlr/stringtemplate",
      ]
      .into_iter()
      .map(String::from)
      .collect(),
      vendor: "ANTLR".to_string(),
      vendor_id: "org.antlr".to_string(),
      title: "ANTLR Symbol Table Library".to_string(),
      doc_url: "https://github.com/antlr/symtab".to_string(),
      license_url: "https://github.com/antlr/symtab/blob/master/LICENSE".to_string(),
      symbolic_name: "org.antlr.symtab-osgi".to_string(),
      created_by: CREATED_BY.to_string(),
      built_by: "unknown".to_string(),
      jar_cache: paths::jar_cache_dir(),
      maven_repo: paths::maven_repo(),
      lib_dir: PathBuf::from(DEFAULT_LIB_DIR),
      root,
    }
  }

  /// Defaults with environment overrides applied.
  ///
  /// - `BILD_JARCACHE`: download cache directory
  /// - `BILD_LIB_DIR`: library install directory
  /// - `BILD_BUILT_BY`: manifest `Built-By`, falling back to `USER`/`USERNAME`
  pub fn from_env(root: impl Into<PathBuf>) -> Self {
    let mut config = Self::new(root);

    if let Some(dir) = non_empty_var(JARCACHE_ENV) {
      config.jar_cache = PathBuf::from(dir);
    }
    if let Some(dir) = non_empty_var(LIB_DIR_ENV) {
      config.lib_dir = PathBuf::from(dir);
    }
    if let Some(name) = non_empty_var(BUILT_BY_ENV)
      .or_else(|| non_empty_var("USER"))
      .or_else(|| non_empty_var("USERNAME"))
    {
      config.built_by = name;
    }

    config
  }

  pub fn version(&self) -> &str {
    &self.coordinates.version
  }

  /// `dist/symtab-<version>.jar`
  pub fn jar_path(&self) -> PathBuf {
    self.artifact_path("")
  }

  /// `dist/symtab-<version>-sources.jar`
  pub fn sources_jar_path(&self) -> PathBuf {
    self.artifact_path("-sources")
  }

  /// `dist/symtab-<version>-javadoc.jar`
  pub fn javadoc_jar_path(&self) -> PathBuf {
    self.artifact_path("-javadoc")
  }

  /// Copy of `src` bundled into the sources jar.
  pub fn sources_staging_dir(&self) -> PathBuf {
    self.out_dir.join("src")
  }

  /// Generated API docs for our own packages.
  pub fn javadoc_out_dir(&self) -> PathBuf {
    self.doc_dir.join(&self.coordinates.artifact_id)
  }

  /// Directories removed by `clean`.
  pub fn output_dirs(&self) -> [&Path; 3] {
    [&self.dist_dir, &self.out_dir, &self.doc_dir]
  }

  fn artifact_path(&self, classifier: &str) -> PathBuf {
    self
      .dist_dir
      .join(format!("{}-{}{}.jar", self.coordinates.artifact_id, self.version(), classifier))
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn artifact_paths_use_version() {
    let config = RecipeConfig::new("/work/symtab");

    assert_eq!(config.jar_path(), PathBuf::from("/work/symtab/dist/symtab-1.0.1.jar"));
    assert_eq!(
      config.sources_jar_path(),
      PathBuf::from("/work/symtab/dist/symtab-1.0.1-sources.jar")
    );
    assert_eq!(
      config.javadoc_jar_path(),
      PathBuf::from("/work/symtab/dist/symtab-1.0.1-javadoc.jar")
    );
    assert_eq!(config.sources_staging_dir(), PathBuf::from("/work/symtab/out/src"));
    assert_eq!(config.javadoc_out_dir(), PathBuf::from("/work/symtab/doc/symtab"));
    assert_eq!(config.runtime_sources_dir, PathBuf::from("/work/symtab/out/Antlr45Runtime"));
  }

  #[test]
  fn output_dirs_are_dist_out_doc() {
    let config = RecipeConfig::new("/p");
    assert_eq!(
      config.output_dirs(),
      [Path::new("/p/dist"), Path::new("/p/out"), Path::new("/p/doc")]
    );
  }

  #[test]
  #[serial]
  fn from_env_applies_overrides() {
    temp_env::with_vars(
      [
        (JARCACHE_ENV, Some("/tmp/jars")),
        (LIB_DIR_ENV, Some("/opt/lib")),
        (BUILT_BY_ENV, Some("ci")),
        ("USER", Some("alice")),
      ],
      || {
        let config = RecipeConfig::from_env("/p");
        assert_eq!(config.jar_cache, PathBuf::from("/tmp/jars"));
        assert_eq!(config.lib_dir, PathBuf::from("/opt/lib"));
        assert_eq!(config.built_by, "ci");
      },
    );
  }

  #[test]
  #[serial]
  fn from_env_built_by_falls_back_to_user() {
    temp_env::with_vars(
      [
        (JARCACHE_ENV, None),
        (LIB_DIR_ENV, Some("  ")),
        (BUILT_BY_ENV, None),
        ("USER", Some("alice")),
      ],
      || {
        let config = RecipeConfig::from_env("/p");
        assert_eq!(config.built_by, "alice");
        assert_eq!(config.lib_dir, PathBuf::from(DEFAULT_LIB_DIR));
      },
    );
  }
}
