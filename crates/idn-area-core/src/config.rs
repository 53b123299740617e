//! Store-level configuration.
//!
//! Deserialised as the `area` table of the application config; every field
//! has a default so an empty table is valid.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
  /// Prepended to every table name (`idn_provinces`, ...).
  pub table_prefix:        String,
  /// Whether SQLite enforces the parent-code foreign keys.
  pub enable_foreign_keys: bool,
  pub search:              SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Maximum number of villages returned by a single search.
  pub village_limit:  usize,
  /// Exact-case matching. When off, both sides are folded with full Unicode
  /// lowercasing, not SQLite's ASCII-only `lower()`.
  pub case_sensitive: bool,
}

impl Default for AreaConfig {
  fn default() -> Self {
    Self {
      table_prefix:        "idn_".to_owned(),
      enable_foreign_keys: true,
      search:              SearchConfig::default(),
    }
  }
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self { village_limit: 100, case_sensitive: false }
  }
}

impl AreaConfig {
  /// Reject prefixes that cannot be spliced into SQL as a bare identifier.
  pub fn validate(&self) -> Result<()> {
    let ok = self
      .table_prefix
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
      Ok(())
    } else {
      Err(Error::InvalidTablePrefix(self.table_prefix.clone()))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let cfg = AreaConfig::default();
    assert_eq!(cfg.table_prefix, "idn_");
    assert!(cfg.enable_foreign_keys);
    assert_eq!(cfg.search.village_limit, 100);
    assert!(!cfg.search.case_sensitive);
  }

  #[test]
  fn partial_config_fills_defaults() {
    let cfg: AreaConfig =
      serde_json::from_str(r#"{"search":{"case_sensitive":true}}"#).unwrap();
    assert_eq!(cfg.table_prefix, "idn_");
    assert!(cfg.search.case_sensitive);
    assert_eq!(cfg.search.village_limit, 100);
  }

  #[test]
  fn prefix_validation() {
    let mut cfg = AreaConfig::default();
    assert!(cfg.validate().is_ok());

    cfg.table_prefix = String::new();
    assert!(cfg.validate().is_ok());

    cfg.table_prefix = "idn; DROP TABLE x; --".into();
    assert!(matches!(cfg.validate(), Err(Error::InvalidTablePrefix(_))));
  }
}
