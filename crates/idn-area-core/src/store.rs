//! The `AreaStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `idn-area-store-sqlite`).
//! Higher layers (`idn-area-api`, `idn-area-cli`) depend on this abstraction,
//! not on any concrete backend. Every operation is read-only.

use std::{fmt, future::Future, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  area::{Area, AreaCode, District, Island, Province, Regency, Village},
  hierarchy::{Lineage, ProvinceNode, Statistics},
};

// ─── Search ──────────────────────────────────────────────────────────────────

/// Which record kinds a [`AreaStore::search`] call covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchKind {
  #[default]
  All,
  Province,
  Regency,
  District,
  Village,
  Island,
}

impl SearchKind {
  pub fn includes(self, other: SearchKind) -> bool {
    self == SearchKind::All || self == other
  }
}

impl FromStr for SearchKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "all" => Ok(SearchKind::All),
      "province" | "provinces" => Ok(SearchKind::Province),
      "regency" | "regencies" => Ok(SearchKind::Regency),
      "district" | "districts" => Ok(SearchKind::District),
      "village" | "villages" => Ok(SearchKind::Village),
      "island" | "islands" => Ok(SearchKind::Island),
      _ => Err(Error::InvalidSearchKind(s.to_owned())),
    }
  }
}

impl fmt::Display for SearchKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SearchKind::All => "all",
      SearchKind::Province => "provinces",
      SearchKind::Regency => "regencies",
      SearchKind::District => "districts",
      SearchKind::Village => "villages",
      SearchKind::Island => "islands",
    })
  }
}

/// Matches per kind. A field is `None` when its kind was not searched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub provinces: Option<Vec<Province>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub regencies: Option<Vec<Regency>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub districts: Option<Vec<District>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub villages:  Option<Vec<Village>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub islands:   Option<Vec<Island>>,
}

// ─── Island query ────────────────────────────────────────────────────────────

/// Parameters for [`AreaStore::list_islands`]. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct IslandQuery {
  pub regency_code:    Option<String>,
  pub populated:       Option<bool>,
  pub outermost_small: Option<bool>,
  pub limit:           Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only access to the seeded administrative hierarchy.
///
/// Unknown codes are never errors: single lookups return `None` and child
/// listings return an empty `Vec`. Listings are ordered by name, ties broken
/// by code (or id for islands).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AreaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Provinces ─────────────────────────────────────────────────────────

  fn list_provinces(
    &self,
  ) -> impl Future<Output = Result<Vec<Province>, Self::Error>> + Send + '_;

  fn get_province<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Province>, Self::Error>> + Send + 'a;

  // ── Regencies ─────────────────────────────────────────────────────────

  fn get_regency<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Regency>, Self::Error>> + Send + 'a;

  fn list_regencies_by_province<'a>(
    &'a self,
    province_code: &'a str,
  ) -> impl Future<Output = Result<Vec<Regency>, Self::Error>> + Send + 'a;

  // ── Districts ─────────────────────────────────────────────────────────

  fn get_district<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<District>, Self::Error>> + Send + 'a;

  fn list_districts_by_regency<'a>(
    &'a self,
    regency_code: &'a str,
  ) -> impl Future<Output = Result<Vec<District>, Self::Error>> + Send + 'a;

  // ── Villages ──────────────────────────────────────────────────────────

  fn get_village<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Village>, Self::Error>> + Send + 'a;

  fn list_villages_by_district<'a>(
    &'a self,
    district_code: &'a str,
  ) -> impl Future<Output = Result<Vec<Village>, Self::Error>> + Send + 'a;

  // ── Islands ───────────────────────────────────────────────────────────

  /// General island listing; the three helpers below are fixed filters.
  fn list_islands<'a>(
    &'a self,
    query: &'a IslandQuery,
  ) -> impl Future<Output = Result<Vec<Island>, Self::Error>> + Send + 'a;

  fn list_islands_by_regency<'a>(
    &'a self,
    regency_code: &'a str,
  ) -> impl Future<Output = Result<Vec<Island>, Self::Error>> + Send + 'a;

  fn list_outermost_small_islands(
    &self,
  ) -> impl Future<Output = Result<Vec<Island>, Self::Error>> + Send + '_;

  fn list_populated_islands(
    &self,
  ) -> impl Future<Output = Result<Vec<Island>, Self::Error>> + Send + '_;

  fn list_unpopulated_islands(
    &self,
  ) -> impl Future<Output = Result<Vec<Island>, Self::Error>> + Send + '_;

  // ── Cross-cutting reads ───────────────────────────────────────────────

  /// Substring search over `name`. Village matches are capped by the
  /// store's configured limit; other kinds are returned in full.
  fn search<'a>(
    &'a self,
    query: &'a str,
    kind: SearchKind,
  ) -> impl Future<Output = Result<SearchResults, Self::Error>> + Send + 'a;

  /// Province with nested regencies and districts, plus villages under each
  /// district when `include_villages` is set. `None` if the province is
  /// unknown.
  fn build_hierarchy<'a>(
    &'a self,
    province_code: &'a str,
    include_villages: bool,
  ) -> impl Future<Output = Result<Option<ProvinceNode>, Self::Error>> + Send + 'a;

  fn statistics(
    &self,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;

  /// Look up whichever record `code` addresses. The level was already fixed
  /// by [`AreaCode::parse`]; `None` means no such row.
  fn resolve_by_code<'a>(
    &'a self,
    code: &'a AreaCode,
  ) -> impl Future<Output = Result<Option<Area>, Self::Error>> + Send + 'a;

  /// The record `code` addresses together with all of its ancestors.
  fn lineage<'a>(
    &'a self,
    code: &'a AreaCode,
  ) -> impl Future<Output = Result<Option<Lineage>, Self::Error>> + Send + 'a;
}
