//! Conversions between CSV/SQLite text and Rust domain types.
//!
//! Timestamps are stored as RFC 3339 strings. Island flags are stored as
//! `0`/`1` integers.

use chrono::{DateTime, Utc};
use idn_area_core::area::{District, Island, Province, Regency, Village};
use rusqlite::Row;

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Lenient flag parsing: `true`, `1`, `yes`, `on` in any case are true;
/// anything else, including a missing field, is false.
pub fn parse_flag(value: Option<&str>) -> bool {
  value.is_some_and(|v| {
    matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
  })
}

/// Missing and empty fields both become `NULL`.
pub fn nullable(value: Option<&str>) -> Option<String> {
  value.filter(|v| !v.is_empty()).map(str::to_owned)
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const PROVINCE_COLUMNS: &str = "code, name";
pub const REGENCY_COLUMNS: &str = "code, province_code, name";
pub const DISTRICT_COLUMNS: &str = "code, regency_code, name";
pub const VILLAGE_COLUMNS: &str = "code, district_code, name";
pub const ISLAND_COLUMNS: &str =
  "id, code, name, coordinate, is_outermost_small, is_populated, regency_code";

/// Qualify every column in `columns` with `alias`.
pub fn qualified(alias: &str, columns: &str) -> String {
  columns
    .split(", ")
    .map(|c| format!("{alias}.{c}"))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Row readers ─────────────────────────────────────────────────────────────
//
// Each `*_at` reader starts at column `i`, so joined rows can be decoded
// piecewise.

pub fn province_at(row: &Row<'_>, i: usize) -> rusqlite::Result<Province> {
  Ok(Province { code: row.get(i)?, name: row.get(i + 1)? })
}

pub fn regency_at(row: &Row<'_>, i: usize) -> rusqlite::Result<Regency> {
  Ok(Regency {
    code:          row.get(i)?,
    province_code: row.get(i + 1)?,
    name:          row.get(i + 2)?,
  })
}

pub fn district_at(row: &Row<'_>, i: usize) -> rusqlite::Result<District> {
  Ok(District {
    code:         row.get(i)?,
    regency_code: row.get(i + 1)?,
    name:         row.get(i + 2)?,
  })
}

pub fn village_at(row: &Row<'_>, i: usize) -> rusqlite::Result<Village> {
  Ok(Village {
    code:          row.get(i)?,
    district_code: row.get(i + 1)?,
    name:          row.get(i + 2)?,
  })
}

/// Decode a `LEFT JOIN`ed record starting at column `i`. A `NULL` code means
/// the joined row does not exist.
pub fn optional_at<T>(
  row:  &Row<'_>,
  i:    usize,
  read: fn(&Row<'_>, usize) -> rusqlite::Result<T>,
) -> rusqlite::Result<Option<T>> {
  match row.get::<_, Option<String>>(i)? {
    Some(_) => read(row, i).map(Some),
    None => Ok(None),
  }
}

pub fn read_province(row: &Row<'_>) -> rusqlite::Result<Province> {
  province_at(row, 0)
}

pub fn read_regency(row: &Row<'_>) -> rusqlite::Result<Regency> {
  regency_at(row, 0)
}

pub fn read_district(row: &Row<'_>) -> rusqlite::Result<District> {
  district_at(row, 0)
}

pub fn read_village(row: &Row<'_>) -> rusqlite::Result<Village> {
  village_at(row, 0)
}

pub fn read_island(row: &Row<'_>) -> rusqlite::Result<Island> {
  Ok(Island {
    id:                 row.get(0)?,
    code:               row.get(1)?,
    name:               row.get(2)?,
    coordinate:         row.get(3)?,
    is_outermost_small: row.get(4)?,
    is_populated:       row.get(5)?,
    regency_code:       row.get(6)?,
  })
}
