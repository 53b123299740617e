//! Handlers for `/provinces` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/provinces` | Name-ordered |
//! | `GET`  | `/provinces/:code` | 404 if not found |
//! | `GET`  | `/provinces/:code/regencies` | 404 if the province is unknown |
//! | `GET`  | `/provinces/:code/hierarchy` | Optional `?include_villages=true` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use idn_area_core::{
  area::{Province, Regency},
  hierarchy::ProvinceNode,
  store::AreaStore,
};
use serde::Deserialize;

use crate::error::ApiError;

fn not_found(code: &str) -> ApiError {
  ApiError::NotFound(format!("province {code} not found"))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /provinces`
pub async fn list<S: AreaStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Province>>, ApiError> {
  let provinces = store.list_provinces().await.map_err(ApiError::store)?;
  Ok(Json(provinces))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /provinces/:code`
pub async fn get_one<S: AreaStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Province>, ApiError> {
  store
    .get_province(&code)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found(&code))
}

// ─── Children ─────────────────────────────────────────────────────────────────

/// `GET /provinces/:code/regencies`
pub async fn regencies<S: AreaStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Vec<Regency>>, ApiError> {
  if store.get_province(&code).await.map_err(ApiError::store)?.is_none() {
    return Err(not_found(&code));
  }
  let regencies = store
    .list_regencies_by_province(&code)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(regencies))
}

// ─── Hierarchy ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct HierarchyParams {
  /// Attach every district's villages. Off by default; a province can hold
  /// several thousand.
  #[serde(default)]
  pub include_villages: bool,
}

/// `GET /provinces/:code/hierarchy[?include_villages=true]`
pub async fn hierarchy<S: AreaStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
  Query(params): Query<HierarchyParams>,
) -> Result<Json<ProvinceNode>, ApiError> {
  store
    .build_hierarchy(&code, params.include_villages)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found(&code))
}
