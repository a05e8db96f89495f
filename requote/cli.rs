use std::path::PathBuf;

use anyhow::{
  Result,
  bail,
};
use clap::{
  ArgAction,
  Parser,
};

/// Where the fixed document goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
  Stdout,
  File(PathBuf),
  InPlace,
}

#[derive(Clone, Debug)]
pub struct CliOptions {
  pub verbosity:     u8,
  pub log_file:      Option<PathBuf>,
  pub log_to_stderr: bool,
  pub config_file:   Option<PathBuf>,
  pub events:        PathBuf,
  pub output:        Output,
  pub file:          PathBuf,
}

impl CliOptions {
  pub fn parse() -> Result<Self> {
    let raw = RawCli::parse();
    raw.try_into()
  }
}

/// Replays a recorded editing session against a file, fixing quotes and
/// whitespace the way the editor integration would.
#[derive(Parser, Debug)]
#[command(name = "requote", version, about, long_about = None)]
struct RawCli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Also write logs to stderr
  #[arg(long = "log-stderr")]
  log_to_stderr: bool,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// JSON event script to replay
  #[arg(short = 'e', long = "events", value_name = "FILE")]
  events: PathBuf,

  /// Write the result to FILE instead of stdout
  #[arg(short = 'o', long = "output", value_name = "FILE", conflicts_with = "in_place")]
  output: Option<PathBuf>,

  /// Overwrite the input file with the result
  #[arg(short = 'i', long = "in-place")]
  in_place: bool,

  /// Document the events are replayed against
  #[arg(value_name = "FILE")]
  file: PathBuf,
}

impl TryFrom<RawCli> for CliOptions {
  type Error = anyhow::Error;

  fn try_from(raw: RawCli) -> Result<Self> {
    let output = match (raw.output, raw.in_place) {
      (Some(path), false) => Output::File(path),
      (None, true) => Output::InPlace,
      (None, false) => Output::Stdout,
      (Some(_), true) => bail!("--output and --in-place are mutually exclusive"),
    };

    Ok(Self {
      verbosity: raw.verbosity,
      log_file: raw.log_file,
      log_to_stderr: raw.log_to_stderr,
      config_file: raw.config_file,
      events: raw.events,
      output,
      file: raw.file,
    })
  }
}
