use crate::action::Coordinates;
use crate::consts::APP_NAME;
use std::path::{Path, PathBuf};

/// Returns the user's home directory, if one is configured.
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory, if one is configured.
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the directory for cache files for the application
#[cfg(windows)]
pub fn cache_dir() -> PathBuf {
  std::env::var_os("LOCALAPPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(std::env::temp_dir)
    .join(APP_NAME)
    .join("Cache")
}

/// Returns the directory for cache files for the application
#[cfg(not(windows))]
pub fn cache_dir() -> PathBuf {
  let cache_home = std::env::var_os("XDG_CACHE_HOME")
    .map(PathBuf::from)
    .or_else(|| home_dir().map(|home| home.join(".cache")))
    .unwrap_or_else(std::env::temp_dir);
  cache_home.join(APP_NAME)
}

/// Returns the directory downloaded jars are cached in
pub fn jar_cache_dir() -> PathBuf {
  cache_dir().join("jars")
}

/// Returns the user's local Maven repository
pub fn maven_repo() -> PathBuf {
  home_dir()
    .map(|home| home.join(".m2"))
    .unwrap_or_else(|| cache_dir().join("m2"))
    .join("repository")
}

/// Path of the binary jar for `coords` inside a Maven repository laid out at `repo`.
pub fn maven_artifact_path(repo: &Path, coords: &Coordinates) -> PathBuf {
  let mut path = repo.to_path_buf();
  for segment in coords.group_id.split('.') {
    path.push(segment);
  }
  path
    .join(&coords.artifact_id)
    .join(&coords.version)
    .join(format!("{}-{}.jar", coords.artifact_id, coords.version))
}
