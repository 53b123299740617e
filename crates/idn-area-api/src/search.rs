//! Handler for `GET /search`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use idn_area_core::store::{AreaStore, SearchKind, SearchResults};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Name substring to look for.
  pub q:    Option<String>,
  /// `all` (default), or one of `provinces`, `regencies`, `districts`,
  /// `villages`, `islands`.
  #[serde(rename = "type")]
  pub kind: Option<String>,
}

/// `GET /search?q=...[&type=...]`
pub async fn handler<S: AreaStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
  let query = params.q.unwrap_or_default();
  if query.trim().is_empty() {
    return Err(ApiError::BadRequest("query parameter `q` is required".into()));
  }

  let kind = match params.kind.as_deref() {
    Some(k) => k.parse::<SearchKind>()?,
    None => SearchKind::All,
  };

  let results = store.search(&query, kind).await.map_err(ApiError::store)?;
  Ok(Json(results))
}
