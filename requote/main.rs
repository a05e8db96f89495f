use std::{
  fs,
  io::{
    self,
    Write,
  },
};

use anyhow::{
  Context,
  Result,
};
use requote_lib::{
  document::RopeDocument,
  session::Session,
};

use crate::{
  cli::{
    CliOptions,
    Output,
  },
  config::Config,
  replay::Replay,
};

mod cli;
mod config;
mod logging;
mod replay;

fn main() -> Result<()> {
  let args = CliOptions::parse()?;

  requote_loader::initialize_config_file(args.config_file.clone());
  requote_loader::initialize_log_file(args.log_file.clone());
  logging::setup_logging(
    args.verbosity,
    &requote_loader::log_file(),
    args.log_to_stderr,
  )
  .context("failed to initialize logging")?;

  let config = Config::load_default(args.config_file.is_some()).with_context(|| {
    format!(
      "failed to load {}",
      requote_loader::config_file().display()
    )
  })?;
  log::debug!("fixers: {:?}", config.fixers);

  let text = fs::read_to_string(&args.file)
    .with_context(|| format!("failed to read {}", args.file.display()))?;
  let events = replay::read_script(&args.events)
    .with_context(|| format!("failed to load {}", args.events.display()))?;

  let mut replay = Replay::new(RopeDocument::from(text), Session::new(config.fixers));
  let summary = replay.run(&events)?;
  log::info!(
    "replayed {} events, applied {} fixes, document version {}",
    summary.events,
    summary.fixes(),
    replay.document().version()
  );

  let fixed = replay.document().to_string();
  match &args.output {
    Output::Stdout => {
      let mut stdout = io::stdout().lock();
      stdout.write_all(fixed.as_bytes())?;
      stdout.flush()?;
    },
    Output::File(path) => {
      fs::write(path, fixed).with_context(|| format!("failed to write {}", path.display()))?;
    },
    Output::InPlace => {
      fs::write(&args.file, fixed)
        .with_context(|| format!("failed to write {}", args.file.display()))?;
    },
  }

  Ok(())
}
