//! Handler for `GET /islands`.
//!
//! Query params map directly to [`IslandQuery`] fields; absent ones do not
//! filter.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use idn_area_core::{
  area::Island,
  store::{AreaStore, IslandQuery},
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct IslandParams {
  pub regency_code:    Option<String>,
  pub populated:       Option<bool>,
  pub outermost_small: Option<bool>,
  pub limit:           Option<usize>,
}

impl From<IslandParams> for IslandQuery {
  fn from(p: IslandParams) -> Self {
    IslandQuery {
      regency_code:    p.regency_code,
      populated:       p.populated,
      outermost_small: p.outermost_small,
      limit:           p.limit,
    }
  }
}

/// `GET /islands[?regency_code=...][&populated=...][&outermost_small=...][&limit=...]`
pub async fn list<S: AreaStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<IslandParams>,
) -> Result<Json<Vec<Island>>, ApiError> {
  let islands = store
    .list_islands(&params.into())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(islands))
}
