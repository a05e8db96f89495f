use std::{
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

const APP_DIR: &str = "requote";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  ensure_parent_dir(&config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("REQUOTE_CONFIG_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the config directory: {err}");
      PathBuf::from(".").join(APP_DIR)
    },
  }
}

pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("REQUOTE_CACHE_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the cache directory: {err}");
      std::env::temp_dir().join(APP_DIR)
    },
  }
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE
    .get_or_init(|| {
      let path = default_config_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

/// `.requote/config.toml` of the workspace containing the current directory.
pub fn workspace_config_file() -> PathBuf {
  workspace_config_file_in(find_workspace().0)
}

pub fn workspace_config_file_in(workspace: impl AsRef<Path>) -> PathBuf {
  workspace.as_ref().join(".requote").join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("requote.log")
}

/// Merge two TOML documents, merging values from `right` onto `left`
///
/// `merge_depth` sets the nesting depth up to which tables are merged instead
/// of overridden. When a table exists in both `left` and `right`, the merged
/// table holds all keys of both, with values of `right` merged recursively
/// onto values of `left`. Arrays and scalars from `right` replace those of
/// `left`.
///
/// `merge_toml_values(global, workspace, 3)` combines
///
/// ```toml
/// [fixers]
/// quote-wrap = false
/// ```
///
/// with
///
/// ```toml
/// [fixers]
/// enter-whitespace = false
/// ```
///
/// into a table with both keys set to `false`.
pub fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) => {
      if merge_depth > 0 {
        for (rname, rvalue) in right_map {
          match left_map.remove(&rname) {
            Some(lvalue) => {
              let merged_value = merge_toml_values(lvalue, rvalue, merge_depth - 1);
              left_map.insert(rname, merged_value);
            },
            None => {
              left_map.insert(rname, rvalue);
            },
          }
        }
        Value::Table(left_map)
      } else {
        Value::Table(right_map)
      }
    },
    // Catch everything else we didn't handle, and use the right value
    (_, value) => value,
  }
}

/// Finds the current workspace folder.
///
/// This function starts searching the FS upward from the CWD and returns the
/// first directory that contains either `.git`, `.svn`, `.jj` or `.requote`.
/// If no workspace was found returns (CWD, true). Otherwise (workspace, false)
/// is returned.
pub fn find_workspace() -> (PathBuf, bool) {
  match std::env::current_dir() {
    Ok(current_dir) => find_workspace_in(current_dir),
    Err(_) => (PathBuf::new(), true),
  }
}

pub fn find_workspace_in(dir: impl AsRef<Path>) -> (PathBuf, bool) {
  let dir = dir.as_ref();
  for ancestor in dir.ancestors() {
    if ancestor.join(".git").exists()
      || ancestor.join(".svn").exists()
      || ancestor.join(".jj").exists()
      || ancestor.join(".requote").exists()
    {
      return (ancestor.to_owned(), false);
    }
  }

  (dir.to_owned(), true)
}

fn expand_tilde(path: &Path) -> PathBuf {
  match path.strip_prefix("~") {
    Ok(rest) => match etcetera::home_dir() {
      Ok(home) => home.join(rest),
      Err(_) => path.to_owned(),
    },
    Err(_) => path.to_owned(),
  }
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
  {
    std::fs::create_dir_all(parent).ok();
  }
}

#[cfg(test)]
mod merge_toml_tests {
  use toml::Value;

  use super::merge_toml_values;

  #[test]
  fn fixers_table_merges() {
    const GLOBAL: &str = r#"
        [fixers]
        quote-wrap = false
        quote-replace = false
        "#;
    const WORKSPACE: &str = r#"
        [fixers]
        enter-whitespace = false
        quote-replace = true
        "#;

    let global: Value = toml::from_str(GLOBAL).unwrap();
    let workspace: Value = toml::from_str(WORKSPACE).unwrap();

    let merged = merge_toml_values(global, workspace, 3);
    let fixers = merged.get("fixers").unwrap();
    assert_eq!(fixers.get("quote-wrap").unwrap().as_bool(), Some(false));
    assert_eq!(fixers.get("quote-replace").unwrap().as_bool(), Some(true));
    assert_eq!(
      fixers.get("enter-whitespace").unwrap().as_bool(),
      Some(false)
    );
  }

  #[test]
  fn zero_depth_overrides() {
    let left: Value = toml::from_str("[fixers]\nquote-wrap = false").unwrap();
    let right: Value = toml::from_str("[fixers]\nquote-replace = false").unwrap();

    let merged = merge_toml_values(left, right, 1);
    let fixers = merged.get("fixers").unwrap();
    assert!(fixers.get("quote-wrap").is_none());
    assert_eq!(fixers.get("quote-replace").unwrap().as_bool(), Some(false));
  }
}
