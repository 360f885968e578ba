//! Structured JAR manifests.
//!
//! A [`JarManifest`] is an ordered list of validated main-section headers. The
//! formatter renders it in the `META-INF/MANIFEST.MF` format:
//!
//! - `Manifest-Version` is always the first header (default `1.0`)
//! - each header is written as `Name: value` and terminated by CRLF
//! - lines longer than 72 bytes continue on the next line after a single space
//! - the section ends with an empty line
//!
//! Values are never interpolated into a format string, so a value cannot inject
//! additional headers.

use std::fmt;

use thiserror::Error;

/// Header that must appear first in every manifest.
pub const MANIFEST_VERSION: &str = "Manifest-Version";

/// Maximum line length in bytes, excluding the line terminator.
const MAX_LINE: usize = 72;

/// Maximum header name length in bytes.
const MAX_NAME: usize = 70;

/// Errors raised while building a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
  #[error("invalid manifest header name: '{0}'")]
  InvalidName(String),

  #[error("invalid value for manifest header '{name}': line breaks and NUL are not allowed")]
  InvalidValue { name: String },

  #[error("duplicate manifest header: {0}")]
  Duplicate(String),
}

/// Main section of a JAR manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JarManifest {
  headers: Vec<(String, String)>,
}

impl JarManifest {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a header.
  ///
  /// # Errors
  ///
  /// Fails if the name is not a valid header name, the value contains a line
  /// break or NUL, or a header with the same name (ignoring case) exists.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), ManifestError> {
    let name = name.into();
    let value = value.into();

    validate_name(&name)?;
    if value.contains(['\r', '\n', '\0']) {
      return Err(ManifestError::InvalidValue { name });
    }
    if self.get(&name).is_some() {
      return Err(ManifestError::Duplicate(name));
    }

    self.headers.push((name, value));
    Ok(())
  }

  /// Builder-style [`insert`](Self::insert).
  pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self, ManifestError> {
    self.insert(name, value)?;
    Ok(self)
  }

  /// Look up a header value. Header names are case-insensitive.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(n, _)| n.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }

  /// Headers in insertion order.
  pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
    self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.headers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.headers.is_empty()
  }

  /// Render the manifest in `MANIFEST.MF` format.
  pub fn render(&self) -> String {
    let mut out = String::new();
    write_header(&mut out, MANIFEST_VERSION, self.get(MANIFEST_VERSION).unwrap_or("1.0"));

    for (name, value) in &self.headers {
      if name.eq_ignore_ascii_case(MANIFEST_VERSION) {
        continue;
      }
      write_header(&mut out, name, value);
    }

    out.push_str("\r\n");
    out
  }
}

impl fmt::Display for JarManifest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render())
  }
}

fn validate_name(name: &str) -> Result<(), ManifestError> {
  let mut chars = name.chars();
  let valid = name.len() <= MAX_NAME
    && chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

  if valid {
    Ok(())
  } else {
    Err(ManifestError::InvalidName(name.to_string()))
  }
}

/// Write one header, wrapping at 72 bytes without splitting a UTF-8 character.
fn write_header(out: &mut String, name: &str, value: &str) {
  let line = format!("{}: {}", name, value);
  let mut rest = line.as_str();
  let mut first = true;

  loop {
    // Continuation lines spend one byte on the leading space.
    let limit = if first { MAX_LINE } else { MAX_LINE - 1 };
    if !first {
      out.push(' ');
    }

    if rest.len() <= limit {
      out.push_str(rest);
      out.push_str("\r\n");
      return;
    }

    let mut cut = limit;
    while !rest.is_char_boundary(cut) {
      cut -= 1;
    }
    out.push_str(&rest[..cut]);
    out.push_str("\r\n");
    rest = &rest[cut..];
    first = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_version_first_and_blank_line_last() {
    let manifest = JarManifest::new()
      .with("Implementation-Vendor", "ANTLR")
      .unwrap()
      .with("Bundle-Version", "1.0.1")
      .unwrap();

    assert_eq!(
      manifest.render(),
      "Manifest-Version: 1.0\r\nImplementation-Vendor: ANTLR\r\nBundle-Version: 1.0.1\r\n\r\n"
    );
  }

  #[test]
  fn explicit_version_is_hoisted() {
    let manifest = JarManifest::new()
      .with("Created-By", "bild")
      .unwrap()
      .with("Manifest-Version", "2.0")
      .unwrap();

    let rendered = manifest.render();
    assert!(rendered.starts_with("Manifest-Version: 2.0\r\nCreated-By: bild\r\n"));
    assert_eq!(rendered.matches("Manifest-Version").count(), 1);
  }

  #[test]
  fn long_values_wrap_at_72_bytes() {
    let value = "x".repeat(150);
    let manifest = JarManifest::new().with("Export-Package", value.clone()).unwrap();

    let rendered = manifest.render();
    let lines: Vec<&str> = rendered.split("\r\n").collect();

    // Manifest-Version, then the header split over three physical lines.
    assert_eq!(lines[1].len(), 72);
    assert!(lines[2].starts_with(' '));
    assert!(lines.iter().all(|l| l.len() <= 72));

    let joined: String = lines[1..4]
      .iter()
      .enumerate()
      .map(|(i, l)| if i == 0 { *l } else { &l[1..] })
      .collect();
    assert_eq!(joined, format!("Export-Package: {}", value));
  }

  #[test]
  fn wrapping_respects_char_boundaries() {
    let value = "é".repeat(60);
    let manifest = JarManifest::new().with("Bundle-Name", value).unwrap();

    // Would panic on a bad slice; also check every line is valid and short.
    let rendered = manifest.render();
    assert!(rendered.split("\r\n").all(|l| l.len() <= 72));
  }

  #[test]
  fn rejects_line_breaks_in_values() {
    let err = JarManifest::new()
      .with("Built-By", "alice\r\nMain-Class: Evil")
      .unwrap_err();
    assert_eq!(
      err,
      ManifestError::InvalidValue {
        name: "Built-By".to_string()
      }
    );
  }

  #[test]
  fn rejects_bad_names_and_duplicates() {
    assert!(matches!(
      JarManifest::new().with("Bad Name", "x"),
      Err(ManifestError::InvalidName(_))
    ));
    assert!(matches!(JarManifest::new().with("", "x"), Err(ManifestError::InvalidName(_))));
    assert!(matches!(
      JarManifest::new().with("-Leading", "x"),
      Err(ManifestError::InvalidName(_))
    ));
    assert!(matches!(
      JarManifest::new().with("N".repeat(71), "x"),
      Err(ManifestError::InvalidName(_))
    ));

    let err = JarManifest::new()
      .with("Bundle-Name", "a")
      .unwrap()
      .with("bundle-name", "b")
      .unwrap_err();
    assert_eq!(err, ManifestError::Duplicate("bundle-name".to_string()));
  }

  #[test]
  fn get_is_case_insensitive() {
    let manifest = JarManifest::new().with("Bundle-SymbolicName", "org.antlr.symtab").unwrap();
    assert_eq!(manifest.get("bundle-symbolicname"), Some("org.antlr.symtab"));
    assert_eq!(manifest.get("Bundle-Name"), None);
    assert_eq!(manifest.len(), 1);
  }
}
