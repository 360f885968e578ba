mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use output::{OutputFormat, print_error};

/// bild - run targets of the symtab build recipe
#[derive(Parser)]
#[command(name = "bild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging and show requirements that were already satisfied
  #[arg(short, long)]
  debug: bool,

  /// Project root containing `src` (default: current directory)
  #[arg(long, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  /// List available targets and exit
  #[arg(short, long)]
  list: bool,

  /// Target to build
  target: Option<String>,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.debug);

  match run(cli) {
    Ok(code) => code,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<ExitCode> {
  let root = match cli.root {
    Some(root) => root,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };

  if cli.list {
    cmd::cmd_list(&root, cli.format)?;
    return Ok(ExitCode::SUCCESS);
  }

  cmd::cmd_run(&root, cli.target.as_deref(), cli.debug, cli.format)
}

/// `--debug` forces debug level; otherwise `RUST_LOG` applies, defaulting to warnings.
fn init_tracing(debug: bool) {
  let filter = if debug {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
