use std::{
  fs,
  io::{
    Error as IOError,
    ErrorKind,
  },
  path::Path,
};

use requote_lib::session::Fixers;
use requote_loader::merge_toml_values;
use serde::Deserialize;
use thiserror::Error;
use toml::{
  Value,
  de::Error as TomlError,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
  pub fixers: Fixers,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigRaw {
  pub fixers: Option<Value>,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
  #[error("bad config: {0}")]
  BadConfig(#[from] TomlError),
  #[error(transparent)]
  Error(#[from] IOError),
}

impl Config {
  /// Combines the global and workspace config files, the workspace one
  /// taking precedence key by key.
  ///
  /// A file that failed to read is skipped as long as the other one loaded.
  /// A file that failed to parse is always an error.
  pub fn load(
    global: Result<String, ConfigLoadError>,
    local: Result<String, ConfigLoadError>,
  ) -> Result<Config, ConfigLoadError> {
    let global_config: Result<ConfigRaw, ConfigLoadError> =
      global.and_then(|file| toml::from_str(&file).map_err(ConfigLoadError::BadConfig));
    let local_config: Result<ConfigRaw, ConfigLoadError> =
      local.and_then(|file| toml::from_str(&file).map_err(ConfigLoadError::BadConfig));

    let fixers = match (global_config, local_config) {
      (Ok(global), Ok(local)) => {
        match (global.fixers, local.fixers) {
          (None, None) => Fixers::default(),
          (None, Some(val)) | (Some(val), None) => val.try_into()?,
          (Some(global), Some(local)) => merge_toml_values(global, local, 3).try_into()?,
        }
      },
      (_, Err(ConfigLoadError::BadConfig(err))) | (Err(ConfigLoadError::BadConfig(err)), _) => {
        return Err(ConfigLoadError::BadConfig(err));
      },
      (Ok(config), Err(_)) | (Err(_), Ok(config)) => {
        config
          .fixers
          .map_or_else(|| Ok(Fixers::default()), |val| val.try_into())?
      },
      (Err(err), Err(_)) => return Err(err),
    };

    Ok(Config { fixers })
  }

  /// Reads and combines the global and workspace config files.
  ///
  /// When neither file exists the defaults are used, unless the global file
  /// was named explicitly: an explicit file must be readable.
  pub fn load_files(
    global: &Path,
    local: &Path,
    explicit: bool,
  ) -> Result<Config, ConfigLoadError> {
    let global_config = match fs::read_to_string(global) {
      Err(err) if explicit => return Err(ConfigLoadError::Error(err)),
      result => result.map_err(ConfigLoadError::Error),
    };
    let local_config = fs::read_to_string(local).map_err(ConfigLoadError::Error);

    match Self::load(global_config, local_config) {
      Err(ConfigLoadError::Error(err)) if err.kind() == ErrorKind::NotFound => {
        log::debug!("no config file found, using defaults");
        Ok(Config::default())
      },
      result => result,
    }
  }

  /// Loads the global config file and the config of the current workspace.
  pub fn load_default(explicit: bool) -> Result<Config, ConfigLoadError> {
    Self::load_files(
      &requote_loader::config_file(),
      &requote_loader::workspace_config_file(),
      explicit,
    )
  }
}
