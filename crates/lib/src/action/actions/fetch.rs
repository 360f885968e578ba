//! URL download into a cache directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::action::ActionError;

/// Download `url` into `dest_dir` and return the path of the downloaded file.
///
/// The file name is derived from the URL. If a file with that name already
/// exists in `dest_dir` it is reused without touching the network.
pub async fn execute_fetch(url: &str, dest_dir: &Path) -> Result<PathBuf, ActionError> {
  fs::create_dir_all(dest_dir).await?;

  let dest_path = dest_dir.join(url_to_filename(url));

  if fs::try_exists(&dest_path).await? {
    info!(path = %dest_path.display(), "using cached download");
    return Ok(dest_path);
  }

  info!(url = %url, "fetching URL");

  let fetch_err = |e: reqwest::Error| ActionError::FetchFailed {
    url: url.to_string(),
    message: e.to_string(),
  };

  let response = reqwest::get(url).await.map_err(fetch_err)?;

  if !response.status().is_success() {
    return Err(ActionError::FetchFailed {
      url: url.to_string(),
      message: format!("HTTP {}", response.status()),
    });
  }

  let bytes = response.bytes().await.map_err(fetch_err)?;

  // Write under a temporary name so an interrupted download is never reused.
  let partial = dest_path.with_extension("part");
  let mut file = fs::File::create(&partial).await?;
  file.write_all(&bytes).await?;
  file.flush().await?;
  drop(file);
  fs::rename(&partial, &dest_path).await?;

  info!(path = %dest_path.display(), size = bytes.len(), "download complete");
  debug!(url = %url, "fetch finished");

  Ok(dest_path)
}

/// Convert a URL to a safe filename.
///
/// Uses the last path segment, or the value of a `filepath=` query parameter
/// when the URL is a download endpoint such as Maven Central's
/// `remotecontent?filepath=...`. Characters outside `[A-Za-z0-9._-]` become `_`.
pub fn url_to_filename(url: &str) -> String {
  let (path, query) = match url.split_once('?') {
    Some((path, query)) => (path, Some(query)),
    None => (url, None),
  };

  let from_query = query.and_then(|q| {
    q.split('&')
      .find_map(|pair| pair.strip_prefix("filepath="))
      .and_then(|fp| fp.rsplit('/').next())
  });

  let candidate = from_query.or_else(|| path.rsplit('/').next()).unwrap_or_default();

  let sanitized: String = candidate
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
        c
      } else {
        '_'
      }
    })
    .collect();

  if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
    "download".to_string()
  } else {
    sanitized
  }
}
