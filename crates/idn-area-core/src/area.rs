//! Administrative area records and code-based kind dispatch.
//!
//! Provinces, regencies, districts and villages are keyed by hierarchical
//! string codes (`"32"`, `"32.04"`, `"32.04.01"`, `"32.04.01.2001"`). The
//! length of a code alone identifies its level; see [`AreaKind::from_code`].
//! Islands hang off regencies but use a surrogate integer id.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
  pub code: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regency {
  pub code:          String,
  pub province_code: String,
  pub name:          String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
  pub code:         String,
  pub regency_code: String,
  pub name:         String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
  pub code:          String,
  pub district_code: String,
  pub name:          String,
}

/// An island. Every field except `id`, `name` and the two flags may be
/// missing for islands that have not been mapped to a regency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
  pub id:                 i64,
  pub code:               Option<String>,
  pub name:               String,
  /// `"lat,lon"` as published; never parsed.
  pub coordinate:         Option<String>,
  pub is_outermost_small: bool,
  pub is_populated:       bool,
  pub regency_code:       Option<String>,
}

// ─── Kind dispatch ───────────────────────────────────────────────────────────

/// The code-addressable administrative levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
  Province,
  Regency,
  District,
  Village,
}

/// Code length → kind. Islands have no entry; they are keyed by id.
const CODE_LENGTHS: [(usize, AreaKind); 4] = [
  (2, AreaKind::Province),
  (5, AreaKind::Regency),
  (8, AreaKind::District),
  (13, AreaKind::Village),
];

impl AreaKind {
  /// Determine the level of `code` from its length alone.
  pub fn from_code(code: &str) -> Result<Self> {
    CODE_LENGTHS
      .iter()
      .find(|(len, _)| *len == code.len())
      .map(|(_, kind)| *kind)
      .ok_or_else(|| Error::InvalidCodeFormat(code.to_owned()))
  }

  pub fn as_str(self) -> &'static str {
    match self {
      AreaKind::Province => "province",
      AreaKind::Regency => "regency",
      AreaKind::District => "district",
      AreaKind::Village => "village",
    }
  }
}

impl fmt::Display for AreaKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A code whose length has been checked against [`AreaKind`].
///
/// Only the length is validated. A well-formed code may still refer to no
/// row at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AreaCode {
  kind: AreaKind,
  code: String,
}

impl AreaCode {
  pub fn parse(code: &str) -> Result<Self> {
    let kind = AreaKind::from_code(code)?;
    Ok(Self { kind, code: code.to_owned() })
  }

  pub fn kind(&self) -> AreaKind { self.kind }

  pub fn as_str(&self) -> &str { &self.code }
}

impl fmt::Display for AreaCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.code)
  }
}

// ─── Resolved area ───────────────────────────────────────────────────────────

/// Any code-addressable record, tagged with its level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Area {
  Province(Province),
  Regency(Regency),
  District(District),
  Village(Village),
}

impl Area {
  pub fn kind(&self) -> AreaKind {
    match self {
      Area::Province(_) => AreaKind::Province,
      Area::Regency(_) => AreaKind::Regency,
      Area::District(_) => AreaKind::District,
      Area::Village(_) => AreaKind::Village,
    }
  }

  pub fn code(&self) -> &str {
    match self {
      Area::Province(p) => &p.code,
      Area::Regency(r) => &r.code,
      Area::District(d) => &d.code,
      Area::Village(v) => &v.code,
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Area::Province(p) => &p.name,
      Area::Regency(r) => &r.name,
      Area::District(d) => &d.name,
      Area::Village(v) => &v.name,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn code_length_dispatch() {
    assert_eq!(AreaKind::from_code("32").unwrap(), AreaKind::Province);
    assert_eq!(AreaKind::from_code("32.04").unwrap(), AreaKind::Regency);
    assert_eq!(AreaKind::from_code("32.04.01").unwrap(), AreaKind::District);
    assert_eq!(
      AreaKind::from_code("32.04.01.2001").unwrap(),
      AreaKind::Village
    );
  }

  #[test]
  fn any_other_length_is_invalid() {
    for code in ["", "x", "320", "32.0", "32.04.01.200", "32.04.01.20011"] {
      let err = AreaKind::from_code(code).unwrap_err();
      assert!(matches!(err, Error::InvalidCodeFormat(ref c) if c == code));
    }
  }

  #[test]
  fn only_length_is_checked() {
    let code = AreaCode::parse("abcde").unwrap();
    assert_eq!(code.kind(), AreaKind::Regency);
    assert_eq!(code.as_str(), "abcde");
  }

  #[test]
  fn area_serializes_with_type_tag() {
    let area = Area::Province(Province {
      code: "32".into(),
      name: "JAWA BARAT".into(),
    });
    let json = serde_json::to_value(&area).unwrap();
    assert_eq!(json["type"], "province");
    assert_eq!(json["data"]["code"], "32");
    assert_eq!(area.kind(), AreaKind::Province);
    assert_eq!(area.name(), "JAWA BARAT");
  }
}
