//! Jar/zip packaging and extraction.
//!
//! Jars are plain zip archives. When a manifest is supplied it is stored first,
//! as `META-INF/MANIFEST.MF`, which is where the JVM looks for it.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::action::{ActionError, PackageSpec};

const MANIFEST_DIR: &str = "META-INF/";
const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Write the archive described by `spec` and return its path.
pub fn package(spec: &PackageSpec) -> Result<PathBuf, ActionError> {
  for dir in &spec.source_dirs {
    if !dir.is_dir() {
      return Err(ActionError::MissingPath(dir.clone()));
    }
  }

  if let Some(parent) = spec.output.parent() {
    fs::create_dir_all(parent)?;
  }

  info!(output = %spec.output.display(), "packaging archive");

  let archive_err = |e: zip::result::ZipError| ActionError::Archive {
    path: spec.output.clone(),
    message: e.to_string(),
  };

  let file = File::create(&spec.output)?;
  let mut zip = ZipWriter::new(BufWriter::new(file));
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  if let Some(manifest) = &spec.manifest {
    zip.add_directory(MANIFEST_DIR, options).map_err(archive_err)?;
    zip.start_file(MANIFEST_PATH, options).map_err(archive_err)?;
    io::Write::write_all(&mut zip, manifest.render().as_bytes())?;
  }

  let mut entries = 0usize;
  for dir in &spec.source_dirs {
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
      let entry = entry.map_err(|e| ActionError::Io(e.into()))?;
      let name = entry_name(dir, entry.path());

      // The manifest written above wins over any copy in the inputs.
      if spec.manifest.is_some() && (name == MANIFEST_PATH || name == MANIFEST_DIR.trim_end_matches('/')) {
        continue;
      }

      if entry.file_type().is_dir() {
        zip.add_directory(format!("{}/", name), options).map_err(archive_err)?;
      } else {
        zip.start_file(name, options).map_err(archive_err)?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut zip)?;
        entries += 1;
      }
    }
  }

  zip.finish().map_err(archive_err)?;
  debug!(output = %spec.output.display(), files = entries, "archive written");

  Ok(spec.output.clone())
}

/// Extract a jar/zip archive into `dest`.
pub fn unpack(archive_path: &Path, dest: &Path) -> Result<(), ActionError> {
  if !archive_path.is_file() {
    return Err(ActionError::MissingPath(archive_path.to_path_buf()));
  }

  info!(archive = %archive_path.display(), dest = %dest.display(), "unpacking archive");
  fs::create_dir_all(dest)?;

  let archive_err = |e: zip::result::ZipError| ActionError::Archive {
    path: archive_path.to_path_buf(),
    message: e.to_string(),
  };

  let file = File::open(archive_path)?;
  let mut archive = ZipArchive::new(BufReader::new(file)).map_err(archive_err)?;
  archive.extract(dest).map_err(archive_err)?;

  Ok(())
}

/// Archive entry name for `path` relative to `root`, always `/`-separated.
fn entry_name(root: &Path, path: &Path) -> String {
  let relative = path.strip_prefix(root).unwrap_or(path);
  relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
