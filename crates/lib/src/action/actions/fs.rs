//! Filesystem helpers used by target bodies.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::action::ActionError;

/// Remove a directory tree. A missing directory is not an error.
pub fn remove_tree(path: &Path) -> Result<(), ActionError> {
  if !path.exists() {
    debug!(path = %path.display(), "nothing to remove");
    return Ok(());
  }

  info!(path = %path.display(), "removing directory");
  fs::remove_dir_all(path)?;
  Ok(())
}

/// Recursively copy `src` into `dst`, creating `dst` and any missing parents.
///
/// Existing files in `dst` are overwritten. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, ActionError> {
  if !src.is_dir() {
    return Err(ActionError::MissingPath(src.to_path_buf()));
  }

  info!(src = %src.display(), dst = %dst.display(), "copying directory");
  fs::create_dir_all(dst)?;

  let mut copied = 0;
  for entry in WalkDir::new(src).min_depth(1) {
    let entry = entry.map_err(|e| ActionError::Io(e.into()))?;
    let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
    let target = dst.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target)?;
    } else {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::copy(entry.path(), &target)?;
      copied += 1;
    }
  }

  debug!(count = copied, "copy complete");
  Ok(copied)
}

/// Copy a single file, creating parent directories of `dst`.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), ActionError> {
  if !src.is_file() {
    return Err(ActionError::MissingPath(src.to_path_buf()));
  }
  if let Some(parent) = dst.parent() {
    fs::create_dir_all(parent)?;
  }

  info!(src = %src.display(), dst = %dst.display(), "copying file");
  fs::copy(src, dst)?;
  Ok(())
}

/// Delete every file named `name` below `dir`. Returns how many were removed.
pub fn remove_named(dir: &Path, name: &str) -> Result<usize, ActionError> {
  if !dir.exists() {
    return Ok(0);
  }

  let matches: Vec<_> = WalkDir::new(dir)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|e| e.file_type().is_file() && e.file_name() == name)
    .map(|e| e.into_path())
    .collect();

  for path in &matches {
    debug!(path = %path.display(), "removing file");
    fs::remove_file(path)?;
  }

  Ok(matches.len())
}
