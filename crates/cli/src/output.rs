//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: the live build trace,
//! colored status banners, target listings and durations.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use bild_lib::execute::TraceEvent;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// Echo one trace event on stdout.
///
/// `require`/`build` lines are printed verbatim so they can be grepped; notes
/// and already-satisfied requirements are dimmed.
pub fn print_trace(event: &TraceEvent) {
  match event {
    TraceEvent::Require(_) | TraceEvent::Build(_) => println!("{}", event),
    TraceEvent::Satisfied(_) | TraceEvent::Note(_) => {
      let line = event.to_string();
      println!("{}", line.if_supports_color(Stream::Stdout, |s| s.dimmed()));
    }
  }
}

pub fn print_target(name: &str, description: &str, width: usize) {
  let padded = format!("{:<width$}", name, width = width);
  println!(
    "  {} {}  {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    padded.if_supports_color(Stream::Stdout, |s| s.bold()),
    description
  );
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
