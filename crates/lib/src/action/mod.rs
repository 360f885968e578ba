//! Collaborator actions invoked from target bodies.
//!
//! Target bodies never touch compilers, archives, the network or the
//! filesystem directly. They go through the [`Actions`] capability set, so a
//! recipe can run against [`SystemActions`] in production and against an
//! in-memory fake in tests.
//!
//! # Actions
//!
//! - [`Actions::stale`] - Timestamp comparison between sources and an artifact
//! - [`Actions::compile`] - Compile Java sources with `javac`
//! - [`Actions::package`] - Write a jar/zip, optionally with a manifest
//! - [`Actions::javadoc`] - Generate API documentation
//! - [`Actions::publish`] - Install artifacts into the local Maven repository
//! - [`Actions::fetch`] - Download a URL into a cache directory
//! - [`Actions::unpack`], [`Actions::remove_tree`], [`Actions::copy_tree`],
//!   [`Actions::copy_file`], [`Actions::make_dir`], [`Actions::remove_named`] -
//!   filesystem helpers

pub mod actions;
pub mod stale;
mod system;
mod types;

pub use system::SystemActions;
pub use types::*;

use std::path::{Path, PathBuf};

/// The side-effecting operations a recipe may perform.
///
/// Every method may fail with an [`ActionError`], which aborts the target that
/// invoked it.
pub trait Actions {
  /// Returns true if `artifact` is missing or not newer than every source.
  fn stale(&self, sources: &[PathBuf], artifact: &Path) -> bool {
    stale::is_stale(sources, artifact)
  }

  fn compile(&self, config: &CompileConfig) -> Result<CompileResult, ActionError>;

  fn package(&self, spec: &PackageSpec) -> Result<PathBuf, ActionError>;

  fn unpack(&self, archive: &Path, dest: &Path) -> Result<(), ActionError>;

  fn javadoc(&self, spec: &DocSpec) -> Result<(), ActionError>;

  fn publish(&self, spec: &PublishSpec) -> Result<PublishResult, ActionError>;

  fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ActionError>;

  fn remove_tree(&self, path: &Path) -> Result<(), ActionError>;

  fn copy_tree(&self, src: &Path, dst: &Path) -> Result<(), ActionError>;

  fn copy_file(&self, src: &Path, dst: &Path) -> Result<(), ActionError>;

  fn make_dir(&self, path: &Path) -> Result<(), ActionError>;

  /// Delete every file named `name` below `dir`.
  fn remove_named(&self, dir: &Path, name: &str) -> Result<(), ActionError>;

  /// Version string of the Java toolchain, recorded in package manifests.
  fn java_version(&self) -> Result<String, ActionError>;
}
