//! Implementation of `bild --list`.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::output::{OutputFormat, print_json, print_target};

#[derive(Serialize)]
struct TargetInfo<'a> {
  name: &'a str,
  description: Option<&'a str>,
}

/// Print every registered target with its description.
pub fn cmd_list(root: &Path, format: OutputFormat) -> Result<()> {
  let ctx = super::recipe_context(root, false)?;

  if format.is_json() {
    let targets: Vec<_> = ctx
      .targets()
      .iter()
      .map(|t| TargetInfo {
        name: t.name(),
        description: t.description(),
      })
      .collect();
    return print_json(&targets);
  }

  let width = ctx.targets().iter().map(|t| t.name().len()).max().unwrap_or(0);
  for target in ctx.targets() {
    print_target(target.name(), target.description().unwrap_or_default(), width);
  }

  Ok(())
}
