use std::path::Path;

use anyhow::Result;

pub fn level_for(verbosity: u8) -> log::LevelFilter {
  match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _3_or_more => log::LevelFilter::Trace,
  }
}

/// Routes `log` records to `log_file`, and to stderr as well when asked.
pub fn setup_logging(verbosity: u8, log_file: &Path, to_stderr: bool) -> Result<()> {
  let mut base_config = fern::Dispatch::new().level(level_for(verbosity));

  let file_config = fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .chain(fern::log_file(log_file)?);
  base_config = base_config.chain(file_config);

  if to_stderr {
    let stderr_config = fern::Dispatch::new()
      .format(|out, message, record| {
        out.finish(format_args!("[{}] {}", record.level(), message))
      })
      .chain(std::io::stderr());
    base_config = base_config.chain(stderr_config);
  }

  base_config.apply()?;
  Ok(())
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_levels() {
    assert_eq!(level_for(0), log::LevelFilter::Warn);
    assert_eq!(level_for(1), log::LevelFilter::Info);
    assert_eq!(level_for(2), log::LevelFilter::Debug);
    assert_eq!(level_for(3), log::LevelFilter::Trace);
    assert_eq!(level_for(9), log::LevelFilter::Trace);
  }
}
