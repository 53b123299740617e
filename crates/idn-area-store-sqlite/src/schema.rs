//! SQL schema for the area store.
//!
//! Table names carry a configurable prefix, so the DDL is rendered at
//! connection time instead of living in a constant. Executed by
//! [`SqliteStore::migrate`](crate::SqliteStore::migrate); tracked through
//! `PRAGMA user_version`.

use idn_area_core::config::AreaConfig;

use crate::Result;

pub const SCHEMA_VERSION: i64 = 1;

/// Prefixed table names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
  pub provinces: String,
  pub regencies: String,
  pub districts: String,
  pub villages:  String,
  pub islands:   String,
}

impl Tables {
  /// Build the table names for `config`, rejecting unsafe prefixes.
  pub fn new(config: &AreaConfig) -> Result<Self> {
    config.validate()?;
    let p = &config.table_prefix;
    Ok(Self {
      provinces: format!("{p}provinces"),
      regencies: format!("{p}regencies"),
      districts: format!("{p}districts"),
      villages:  format!("{p}villages"),
      islands:   format!("{p}islands"),
    })
  }

  /// Parents before children. The importer never deviates from this.
  pub fn import_order(&self) -> [&str; 5] {
    [
      &self.provinces,
      &self.regencies,
      &self.districts,
      &self.villages,
      &self.islands,
    ]
  }

  /// Children before parents.
  pub fn clear_order(&self) -> [&str; 5] {
    [
      &self.villages,
      &self.districts,
      &self.islands,
      &self.regencies,
      &self.provinces,
    ]
  }
}

/// Connection-level pragmas, applied on every open.
pub fn pragmas(config: &AreaConfig) -> String {
  let fk = if config.enable_foreign_keys { "ON" } else { "OFF" };
  format!("PRAGMA foreign_keys = {fk};")
}

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub fn ddl(t: &Tables) -> String {
  let Tables { provinces, regencies, districts, villages, islands } = t;
  format!(
    "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS {provinces} (
    code        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT,
    updated_at  TEXT
);

CREATE TABLE IF NOT EXISTS {regencies} (
    code          TEXT PRIMARY KEY,
    province_code TEXT NOT NULL REFERENCES {provinces}(code),
    name          TEXT NOT NULL,
    created_at    TEXT,
    updated_at    TEXT
);

CREATE TABLE IF NOT EXISTS {districts} (
    code         TEXT PRIMARY KEY,
    regency_code TEXT NOT NULL REFERENCES {regencies}(code),
    name         TEXT NOT NULL,
    created_at   TEXT,
    updated_at   TEXT
);

CREATE TABLE IF NOT EXISTS {villages} (
    code          TEXT PRIMARY KEY,
    district_code TEXT NOT NULL REFERENCES {districts}(code),
    name          TEXT NOT NULL,
    created_at    TEXT,
    updated_at    TEXT
);

-- Islands are keyed by rowid; every descriptive column except name is optional.
CREATE TABLE IF NOT EXISTS {islands} (
    id                 INTEGER PRIMARY KEY,
    code               TEXT,
    coordinate         TEXT,           -- 'lat,lon' as published
    name               TEXT NOT NULL,
    is_outermost_small INTEGER NOT NULL DEFAULT 0,
    is_populated       INTEGER NOT NULL DEFAULT 0,
    regency_code       TEXT REFERENCES {regencies}(code),
    created_at         TEXT,
    updated_at         TEXT
);

CREATE INDEX IF NOT EXISTS {provinces}_name_idx     ON {provinces}(name);
CREATE INDEX IF NOT EXISTS {regencies}_parent_idx   ON {regencies}(province_code);
CREATE INDEX IF NOT EXISTS {regencies}_name_idx     ON {regencies}(name);
CREATE INDEX IF NOT EXISTS {districts}_parent_idx   ON {districts}(regency_code);
CREATE INDEX IF NOT EXISTS {districts}_name_idx     ON {districts}(name);
CREATE INDEX IF NOT EXISTS {villages}_parent_idx    ON {villages}(district_code);
CREATE INDEX IF NOT EXISTS {villages}_name_idx      ON {villages}(name);
CREATE INDEX IF NOT EXISTS {islands}_parent_idx     ON {islands}(regency_code);
CREATE INDEX IF NOT EXISTS {islands}_name_idx       ON {islands}(name);
CREATE INDEX IF NOT EXISTS {islands}_outermost_idx  ON {islands}(is_outermost_small);
CREATE INDEX IF NOT EXISTS {islands}_populated_idx  ON {islands}(is_populated);

PRAGMA user_version = {SCHEMA_VERSION};
"
  )
}
