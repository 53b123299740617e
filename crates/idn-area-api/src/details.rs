//! Handlers for `GET /details/:code` and `GET /statistics`.
//!
//! `details` picks the level from the code's length, so `32`, `32.04`,
//! `32.04.01` and `32.04.01.2001` all resolve without a type hint.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use idn_area_core::{
  area::{Area, AreaCode},
  hierarchy::{Lineage, Statistics},
  store::AreaStore,
};
use serde::Serialize;

use crate::error::ApiError;

/// Body of `GET /details/:code`: `{"type": ..., "data": ..., "lineage": ...}`.
#[derive(Debug, Serialize)]
pub struct Details {
  #[serde(flatten)]
  pub area:    Area,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lineage: Option<Lineage>,
}

/// `GET /details/:code`, 400 on a code of no known length, 404 if no record
/// carries it. Missing ancestors never turn a found record into a 404.
pub async fn handler<S: AreaStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Details>, ApiError> {
  let code = AreaCode::parse(&code)?;
  let area = store
    .resolve_by_code(&code)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("{} {code} not found", code.kind())))?;
  let lineage = store.lineage(&code).await.map_err(ApiError::store)?;

  Ok(Json(Details { area, lineage }))
}

/// `GET /statistics`
pub async fn statistics<S: AreaStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Statistics>, ApiError> {
  let stats = store.statistics().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
