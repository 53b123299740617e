//! JSON REST API over the Indonesian administrative area hierarchy.
//!
//! Exposes an axum [`Router`] backed by any [`idn_area_core::store::AreaStore`].
//! Every endpoint is a read; TLS and rate limiting are the caller's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/idn-area", idn_area_api::api_router(store.clone()))
//! ```

pub mod details;
pub mod districts;
pub mod error;
pub mod islands;
pub mod provinces;
pub mod regencies;
pub mod search;

use std::sync::Arc;

use axum::{Router, routing::get};
use idn_area_core::store::AreaStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AreaStore + 'static,
{
  Router::new()
    // Provinces
    .route("/provinces", get(provinces::list::<S>))
    .route("/provinces/{code}", get(provinces::get_one::<S>))
    .route("/provinces/{code}/regencies", get(provinces::regencies::<S>))
    .route("/provinces/{code}/hierarchy", get(provinces::hierarchy::<S>))
    // Regencies
    .route("/regencies/{code}/districts", get(regencies::districts::<S>))
    .route("/regencies/{code}/islands", get(regencies::islands::<S>))
    // Districts
    .route("/districts/{code}/villages", get(districts::villages::<S>))
    // Islands
    .route("/islands", get(islands::list::<S>))
    // Lookup
    .route("/search", get(search::handler::<S>))
    .route("/statistics", get(details::statistics::<S>))
    .route("/details/{code}", get(details::handler::<S>))
    .with_state(store)
}
