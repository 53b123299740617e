//! Application configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `IDN_AREA__*` environment variables (double underscore between
//! nesting levels, e.g. `IDN_AREA__AREA__SEARCH__VILLAGE_LIMIT=50`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use idn_area_core::config::AreaConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite database file.
  pub store_path: PathBuf,
  /// Directory holding the five source CSV files.
  pub data_dir:   PathBuf,
  pub host:       String,
  pub port:       u16,
  /// Store settings, the `[area]` table.
  pub area:       AreaConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("idn-area.db"),
      data_dir:   PathBuf::from("database/data"),
      host:       "127.0.0.1".to_owned(),
      port:       8080,
      area:       AreaConfig::default(),
    }
  }
}

impl AppConfig {
  /// Load from `path` (which need not exist) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("IDN_AREA").separator("__"))
      .build()
      .context("failed to read config file")?;

    let app: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    app.area.validate()?;
    Ok(app)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.store_path, PathBuf::from("idn-area.db"));
    assert_eq!(cfg.data_dir, PathBuf::from("database/data"));
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.area, AreaConfig::default());
  }

  #[test]
  fn file_overrides_nested_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idn-area.toml");
    std::fs::write(
      &path,
      r#"
port = 9000
data_dir = "/srv/wilayah"

[area]
table_prefix = "wil_"

[area.search]
village_limit = 10
"#,
    )
    .unwrap();

    let cfg = AppConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.data_dir, PathBuf::from("/srv/wilayah"));
    assert_eq!(cfg.area.table_prefix, "wil_");
    assert!(cfg.area.enable_foreign_keys);
    assert_eq!(cfg.area.search.village_limit, 10);
    assert!(!cfg.area.search.case_sensitive);
  }

  #[test]
  fn rejects_unsafe_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idn-area.toml");
    std::fs::write(&path, "[area]\ntable_prefix = \"a b\"\n").unwrap();

    assert!(AppConfig::load(&path).is_err());
  }
}
