//! Implementation of `bild <target>`.
//!
//! Runs one root target through the build context. In text mode the trace is
//! echoed as it happens, followed by a success or failure banner. In JSON mode
//! a single run summary is printed at the end.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use bild_lib::execute::{ExecuteError, TraceEvent};

use crate::output::{OutputFormat, format_duration, print_error, print_json, print_stat, print_success, print_trace};

#[derive(Serialize)]
struct RunSummary<'a> {
  root: Option<&'a str>,
  success: bool,
  trace: &'a [TraceEvent],
  completed: &'a [String],
  error: Option<String>,
  duration_ms: u64,
}

/// Run `target` and report the outcome.
///
/// Build failures are reported here and turned into an exit code: 2 for usage
/// errors, 1 for everything else.
pub fn cmd_run(root: &Path, target: Option<&str>, debug: bool, format: OutputFormat) -> Result<ExitCode> {
  let mut ctx = super::recipe_context(root, debug)?;
  let start = Instant::now();

  let name = match ctx.select_root(target) {
    Ok(name) => name,
    Err(e) => {
      if format.is_json() {
        print_json(&RunSummary {
          root: target,
          success: false,
          trace: &[],
          completed: &[],
          error: Some(e.to_string()),
          duration_ms: 0,
        })?;
      } else {
        print_error(&e.to_string());
      }
      return Ok(exit_code(&e));
    }
  };

  if !format.is_json() {
    println!("target {}", name);
    ctx.on_trace(print_trace);
  }

  let result = ctx.run_root(&name);
  let elapsed = start.elapsed();

  if format.is_json() {
    print_json(&RunSummary {
      root: Some(&name),
      success: result.is_ok(),
      trace: ctx.trace(),
      completed: ctx.completed(),
      error: result.as_ref().err().map(|e| e.to_string()),
      duration_ms: elapsed.as_millis() as u64,
    })?;
    return Ok(result.as_ref().map_or_else(exit_code, |_| ExitCode::SUCCESS));
  }

  match result {
    Ok(()) => {
      print_success(&format!("bild succeeded ({})", format_duration(elapsed)));
      Ok(ExitCode::SUCCESS)
    }
    Err(e) => {
      if !ctx.completed().is_empty() {
        print_stat("completed", &ctx.completed().join(", "));
      }
      print_error(&e.to_string());
      print_error(&format!("bild failed ({})", format_duration(elapsed)));
      Ok(exit_code(&e))
    }
  }
}

fn exit_code(err: &ExecuteError) -> ExitCode {
  if err.is_usage() { ExitCode::from(2) } else { ExitCode::FAILURE }
}
