//! Handlers for `/regencies/:code/*` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use idn_area_core::{
  area::{District, Island},
  store::AreaStore,
};

use crate::error::ApiError;

async fn require_regency<S: AreaStore>(store: &S, code: &str) -> Result<(), ApiError> {
  match store.get_regency(code).await.map_err(ApiError::store)? {
    Some(_) => Ok(()),
    None => Err(ApiError::NotFound(format!("regency {code} not found"))),
  }
}

/// `GET /regencies/:code/districts`
pub async fn districts<S: AreaStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Vec<District>>, ApiError> {
  require_regency(store.as_ref(), &code).await?;
  let districts = store
    .list_districts_by_regency(&code)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(districts))
}

/// `GET /regencies/:code/islands`
pub async fn islands<S: AreaStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Vec<Island>>, ApiError> {
  require_regency(store.as_ref(), &code).await?;
  let islands = store
    .list_islands_by_regency(&code)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(islands))
}
