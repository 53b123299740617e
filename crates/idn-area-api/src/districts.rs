//! Handler for `GET /districts/:code/villages`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use idn_area_core::{area::Village, store::AreaStore};

use crate::error::ApiError;

/// `GET /districts/:code/villages`, 404 if the district is unknown.
pub async fn villages<S: AreaStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Vec<Village>>, ApiError> {
  if store.get_district(&code).await.map_err(ApiError::store)?.is_none() {
    return Err(ApiError::NotFound(format!("district {code} not found")));
  }
  let villages = store
    .list_villages_by_district(&code)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(villages))
}
