//! Timestamp-based staleness checks.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

/// Returns true if `artifact` must be rebuilt from `sources`.
///
/// An artifact is stale when it does not exist, or when any source file is at
/// least as new as it. Directories among `sources` are walked recursively and
/// contribute their files' timestamps. Sources that do not exist are ignored,
/// so an existing artifact with no existing sources is considered current.
pub fn is_stale<P: AsRef<Path>>(sources: &[P], artifact: &Path) -> bool {
  let Some(artifact_time) = modified(artifact) else {
    debug!(artifact = %artifact.display(), "artifact missing; stale");
    return true;
  };

  match newest_source(sources) {
    Some(source_time) if source_time >= artifact_time => {
      debug!(artifact = %artifact.display(), "artifact older than sources; stale");
      true
    }
    _ => false,
  }
}

/// Newest modification time among all files under `sources`.
pub fn newest_source<P: AsRef<Path>>(sources: &[P]) -> Option<SystemTime> {
  sources
    .iter()
    .flat_map(|source| WalkDir::new(source.as_ref()).into_iter().filter_map(Result::ok))
    .filter(|entry| entry.file_type().is_file())
    .filter_map(|entry| entry.metadata().ok()?.modified().ok())
    .max()
}

fn modified(path: &Path) -> Option<SystemTime> {
  fs::metadata(path).ok()?.modified().ok()
}
